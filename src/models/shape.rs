use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of shape kinds a `ShapeId` may name.
pub const SHAPE_KIND_COUNT: u8 = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    Cube,
    Sphere,
    Cylinder,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Cube => "Cube",
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Cylinder => "Cylinder",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("shape id {0} is not a known shape kind")]
    OutOfRange(i64),
    #[error("'{0}' is not a decimal shape id")]
    NotANumber(String),
}

/// Identifier of a shape kind, always within `[0, SHAPE_KIND_COUNT)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "i64", into = "u8")]
pub struct ShapeId(u8);

impl ShapeId {
    pub const CUBE: ShapeId = ShapeId(0);
    pub const SPHERE: ShapeId = ShapeId(1);
    pub const CYLINDER: ShapeId = ShapeId(2);

    pub fn new(value: i64) -> Result<Self, ShapeError> {
        if (0..SHAPE_KIND_COUNT as i64).contains(&value) {
            Ok(ShapeId(value as u8))
        } else {
            Err(ShapeError::OutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn kind(self) -> ShapeKind {
        match self.0 {
            0 => ShapeKind::Cube,
            1 => ShapeKind::Sphere,
            _ => ShapeKind::Cylinder,
        }
    }

    /// Parses a single decimal token. Surrounding whitespace is ignored.
    pub fn parse(token: &str) -> Result<Self, ShapeError> {
        let trimmed = token.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| ShapeError::NotANumber(trimmed.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<i64> for ShapeId {
    type Error = ShapeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        ShapeId::new(value)
    }
}

impl From<ShapeId> for u8 {
    fn from(id: ShapeId) -> Self {
        id.0
    }
}

impl From<ShapeKind> for ShapeId {
    fn from(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Cube => ShapeId::CUBE,
            ShapeKind::Sphere => ShapeId::SPHERE,
            ShapeKind::Cylinder => ShapeId::CYLINDER,
        }
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a spawn comes from a live selection or from replaying a stored session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SpawnOrigin {
    Fresh,
    Replay,
}

impl SpawnOrigin {
    pub fn is_replay(self) -> bool {
        matches!(self, SpawnOrigin::Replay)
    }
}

/// Status line shown by hosts when a shape appears, e.g. `New: Cube`.
pub fn spawn_label(shape: ShapeId, origin: SpawnOrigin) -> String {
    let prefix = match origin {
        SpawnOrigin::Fresh => "New: ",
        SpawnOrigin::Replay => "Storage: ",
    };
    format!("{prefix}{}", shape.kind())
}
