//! "Give me the next shape": the remote call behind each gaze selection.

pub mod http;
pub mod random;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ShapeError, ShapeId};

pub use http::HttpShapeProvider;
pub use random::RandomShapeProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("shape request failed: {0}")]
    Transport(String),

    #[error("shape endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("shape request timed out after {0}ms")]
    Timeout(u64),

    #[error("malformed shape response '{body}': {source}")]
    MalformedResponse {
        body: String,
        #[source]
        source: ShapeError,
    },

    #[error("a shape request is already in flight")]
    Busy,
}

impl ProviderError {
    /// Network-level failures, as opposed to a reachable but misbehaving endpoint.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ProviderError::Transport(_) | ProviderError::Status { .. } | ProviderError::Timeout(_)
        )
    }
}

#[async_trait]
pub trait ShapeProvider: Send + Sync {
    /// Fetch the next shape. Implementations allow one outstanding call at a
    /// time and fail overlapping calls with `ProviderError::Busy`.
    async fn request_next_shape(&self) -> Result<ShapeId, ProviderError>;
}

/// Parses a response body holding a single decimal shape id.
pub fn parse_shape_response(body: &str) -> Result<ShapeId, ProviderError> {
    ShapeId::parse(body).map_err(|source| ProviderError::MalformedResponse {
        body: body.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_padded_bodies() {
        assert_eq!(parse_shape_response("2").unwrap(), ShapeId::CYLINDER);
        assert_eq!(parse_shape_response(" 0\r\n").unwrap(), ShapeId::CUBE);
    }

    #[test]
    fn garbage_and_out_of_range_are_malformed() {
        for body in ["", "cube", "1.5", "3", "-1", "\"1\""] {
            match parse_shape_response(body) {
                Err(ProviderError::MalformedResponse { body: echoed, .. }) => {
                    assert_eq!(echoed, body)
                }
                other => panic!("expected malformed response for {body:?}, got {other:?}"),
            }
        }
    }
}
