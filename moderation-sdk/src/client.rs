use crate::{error::ModerationError, types::ModerationVerdict};
use async_trait::async_trait;

/// Core trait for moderation clients
#[async_trait]
pub trait ModerationClient: Send + Sync {
    /// Classify one piece of user text
    async fn moderate(&self, input: &str) -> Result<ModerationVerdict, ModerationError>;

    /// Get provider name (e.g., "openai")
    fn provider_name(&self) -> &str;

    /// Get model name (e.g., "omni-moderation-latest")
    fn model_name(&self) -> &str;
}
