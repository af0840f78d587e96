use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use crate::hooks::HostHooks;

use super::math::Vec3;
use super::scene::{InteractableFilter, Raycaster, TargetId};

/// Selection produced when gaze lands on a new interactable target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusEvent {
    pub target: TargetId,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GazeState {
    pub current: Option<TargetId>,
    pub previous: Option<TargetId>,
    pub enabled: bool,
}

/// Where a host should draw its cursor after the last tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorSample {
    pub position: Vec3,
    pub normal: Vec3,
    pub hit: bool,
}

impl Default for CursorSample {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            normal: Vec3::FORWARD,
            hit: false,
        }
    }
}

/// Shared on/off switch for focus events. Starts disabled.
#[derive(Debug, Clone, Default)]
pub struct GazeSwitch(Arc<AtomicBool>);

impl GazeSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn disable(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Focused {
    target: TargetId,
    interactable: bool,
}

/// Continuous-scan gaze raycaster. One `tick` per frame; at most one
/// `FocusEvent` per tick.
pub struct PointerTracker {
    raycaster: Arc<dyn Raycaster>,
    hooks: Arc<dyn HostHooks>,
    switch: GazeSwitch,
    current: Option<Focused>,
    previous: Option<Focused>,
    cursor: CursorSample,
}

impl PointerTracker {
    pub fn new(raycaster: Arc<dyn Raycaster>, hooks: Arc<dyn HostHooks>) -> Self {
        Self::with_switch(raycaster, hooks, GazeSwitch::new())
    }

    /// Tracker gated by a switch the host already hands to other components.
    pub fn with_switch(
        raycaster: Arc<dyn Raycaster>,
        hooks: Arc<dyn HostHooks>,
        switch: GazeSwitch,
    ) -> Self {
        Self {
            raycaster,
            hooks,
            switch,
            current: None,
            previous: None,
            cursor: CursorSample::default(),
        }
    }

    /// Handle used by the coordinator to enable or disable selection.
    pub fn switch(&self) -> GazeSwitch {
        self.switch.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.switch.is_enabled()
    }

    pub fn state(&self) -> GazeState {
        GazeState {
            current: self.current.map(|f| f.target),
            previous: self.previous.map(|f| f.target),
            enabled: self.switch.is_enabled(),
        }
    }

    pub fn cursor(&self) -> CursorSample {
        self.cursor
    }

    /// One frame. The cursor always follows the ray; focus only moves while
    /// the switch is on, so the first enabled frame on a target selects it.
    pub fn tick(
        &mut self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: &dyn InteractableFilter,
    ) -> Option<FocusEvent> {
        let hit = self.raycaster.cast(origin, direction, max_distance);
        self.cursor = match &hit {
            Some(hit) => CursorSample {
                position: hit.point,
                normal: hit.normal,
                hit: true,
            },
            None => CursorSample {
                position: origin + direction * max_distance,
                normal: direction,
                hit: false,
            },
        };

        if !self.switch.is_enabled() {
            self.release_focus();
            return None;
        }

        self.previous = self.current;
        self.current = hit.map(|hit| Focused {
            target: hit.target,
            interactable: filter.is_interactable(&hit),
        });

        let previous_target = self.previous.map(|f| f.target);
        let current_target = self.current.map(|f| f.target);
        if previous_target == current_target {
            return None;
        }

        if let Some(old) = self.previous.filter(|f| f.interactable) {
            self.hooks.on_focus_changed(old.target, false);
        }

        let new = self.current.filter(|f| f.interactable)?;
        self.hooks.on_focus_changed(new.target, true);
        Some(FocusEvent {
            target: new.target,
            timestamp: Utc::now(),
        })
    }

    /// Drops focus while disabled; a target focused before the switch went
    /// off gets its emphasis removed.
    fn release_focus(&mut self) {
        self.previous = None;
        if let Some(old) = self.current.take().filter(|f| f.interactable) {
            debug!("gaze disabled; releasing {:?}", old.target);
            self.hooks.on_focus_changed(old.target, false);
        }
    }
}
