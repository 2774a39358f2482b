use async_trait::async_trait;

use crate::domain::ResultEnvelope;

/// Outbound delivery of a result envelope to a client-supplied URL.
#[async_trait]
pub trait WebhookNotifier: Send + Sync {
    async fn notify(&self, url: &str, envelope: &ResultEnvelope) -> Result<(), WebhookError>;
}

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("webhook endpoint returned status {0}")]
    BadStatus(u16),
}
