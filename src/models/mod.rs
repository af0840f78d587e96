mod shape;

pub use shape::{spawn_label, ShapeError, ShapeId, ShapeKind, SpawnOrigin, SHAPE_KIND_COUNT};
