use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::math::Vec3;

/// Opaque handle to a host object that a gaze ray can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u64);

bitflags! {
    /// What a hit object can do. Interactability is decided against these bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        const GAZE_BUTTON = 1 << 0;
        const SPAWNED_SHAPE = 1 << 1;
        const STATIC = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub target: TargetId,
    pub capabilities: Capabilities,
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
}

/// Host physics seam: nearest collider along a ray, occluders included.
pub trait Raycaster: Send + Sync {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

pub trait InteractableFilter: Send + Sync {
    fn is_interactable(&self, hit: &RayHit) -> bool;
}

/// A capability set matches hits carrying every required bit.
impl InteractableFilter for Capabilities {
    fn is_interactable(&self, hit: &RayHit) -> bool {
        !self.is_empty() && hit.capabilities.contains(*self)
    }
}

impl<F> InteractableFilter for F
where
    F: Fn(&RayHit) -> bool + Send + Sync,
{
    fn is_interactable(&self, hit: &RayHit) -> bool {
        self(hit)
    }
}

#[derive(Debug, Clone)]
struct SphereCollider {
    target: TargetId,
    center: Vec3,
    radius: f32,
    capabilities: Capabilities,
}

/// Minimal raycaster over sphere colliders, for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct SphereScene {
    colliders: Vec<SphereCollider>,
}

impl SphereScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sphere(
        mut self,
        target: TargetId,
        center: Vec3,
        radius: f32,
        capabilities: Capabilities,
    ) -> Self {
        self.add_sphere(target, center, radius, capabilities);
        self
    }

    pub fn add_sphere(
        &mut self,
        target: TargetId,
        center: Vec3,
        radius: f32,
        capabilities: Capabilities,
    ) {
        self.colliders.push(SphereCollider {
            target,
            center,
            radius,
            capabilities,
        });
    }
}

impl Raycaster for SphereScene {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let dir = direction.normalized()?;

        self.colliders
            .iter()
            .filter_map(|collider| {
                let distance = intersect_sphere(origin, dir, collider.center, collider.radius)?;
                if distance > max_distance {
                    return None;
                }
                let point = origin + dir * distance;
                let normal = (point - collider.center).normalized().unwrap_or(-dir);
                Some(RayHit {
                    target: collider.target,
                    capabilities: collider.capabilities,
                    point,
                    normal,
                    distance,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Distance along the unit ray `dir` to the first surface crossing, if in front of `origin`.
fn intersect_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let near = -b - root;
    let far = -b + root;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        // Origin inside the sphere.
        Some(far)
    } else {
        None
    }
}
