use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{WebhookError, WebhookNotifier};
use crate::domain::ResultEnvelope;

/// POSTs the result envelope as JSON with a bounded timeout. Delivery
/// failures are reported to the caller, never retried here.
pub struct HttpWebhookNotifier {
    client: reqwest::Client,
}

impl HttpWebhookNotifier {
    pub fn new(timeout: Duration) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WebhookError::RequestFailed(format!("client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookNotifier for HttpWebhookNotifier {
    async fn notify(&self, url: &str, envelope: &ResultEnvelope) -> Result<(), WebhookError> {
        let response = self
            .client
            .post(url)
            .json(envelope)
            .send()
            .await
            .map_err(|e| WebhookError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WebhookError::BadStatus(response.status().as_u16()));
        }
        Ok(())
    }
}
