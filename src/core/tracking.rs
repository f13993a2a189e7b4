use reqwest::Client;

use crate::domain::ports::TrackingProvider;
use crate::utils::error::Result;

/// Tracking code client for the carrier's HTTP endpoint.
///
/// One POST mints one code. The endpoint is rate limited, so callers must
/// await each call before issuing the next; the transform stage honors that
/// by never requesting codes in parallel.
#[derive(Debug, Clone)]
pub struct HttpTrackingProvider {
    client: Client,
    endpoint: String,
}

impl HttpTrackingProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl TrackingProvider for HttpTrackingProvider {
    async fn fetch_code(&self) -> Result<String> {
        tracing::debug!("Requesting tracking code from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        // The carrier wraps the token in a JSON string; accept a bare token
        // too so alternative providers keep working.
        let code = match serde_json::from_str::<String>(&body) {
            Ok(code) => code,
            Err(_) => body.trim().to_string(),
        };

        tracing::debug!("Tracking code received: {}", code);
        Ok(code)
    }
}
