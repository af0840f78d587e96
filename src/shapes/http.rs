use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use tokio::time::{self, Duration};

use crate::models::ShapeId;

use super::{parse_shape_response, ProviderError, ShapeProvider};

/// Fetches shape ids with a plain GET against a fixed endpoint.
#[derive(Debug)]
pub struct HttpShapeProvider {
    client: Client,
    endpoint: String,
    timeout: Duration,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the request finishes, however it finishes.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl HttpShapeProvider {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self::with_client(Client::new(), endpoint, timeout)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn try_begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| InFlight(&self.in_flight))
    }

    async fn fetch_body(&self) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl ShapeProvider for HttpShapeProvider {
    async fn request_next_shape(&self) -> Result<ShapeId, ProviderError> {
        let Some(_guard) = self.try_begin() else {
            warn!("shape request rejected: previous request still in flight");
            return Err(ProviderError::Busy);
        };

        let body = match time::timeout(self.timeout, self.fetch_body()).await {
            Ok(result) => result?,
            Err(_) => return Err(ProviderError::Timeout(self.timeout.as_millis() as u64)),
        };

        debug!("shape endpoint answered {:?}", body);
        parse_shape_response(&body)
    }
}
