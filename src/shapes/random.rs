use std::sync::Mutex;

use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::models::{ShapeId, SHAPE_KIND_COUNT};

use super::{ProviderError, ShapeProvider};

/// Offline stand-in for the shape endpoint: uniform over all shape kinds.
pub struct RandomShapeProvider {
    rng: Mutex<StdRng>,
}

impl RandomShapeProvider {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic sequence, for reproducible demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomShapeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShapeProvider for RandomShapeProvider {
    async fn request_next_shape(&self) -> Result<ShapeId, ProviderError> {
        let value = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| ProviderError::Transport("random source poisoned".into()))?;
            rng.gen_range(0..SHAPE_KIND_COUNT)
        };
        ShapeId::new(value as i64).map_err(|source| ProviderError::MalformedResponse {
            body: value.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stays_in_range_and_is_reproducible() {
        let a = RandomShapeProvider::seeded(42);
        let b = RandomShapeProvider::seeded(42);
        for _ in 0..50 {
            let x = a.request_next_shape().await.unwrap();
            let y = b.request_next_shape().await.unwrap();
            assert_eq!(x, y);
            assert!(x.value() < SHAPE_KIND_COUNT);
        }
    }
}
