use crate::domain::{Quote, QuoteDraft, QuoteId, QuotePatch};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Remote quote collection (the REST backend).
///
/// Every failure, whether transport, status or body, comes back as an
/// [`AppError`] for which [`AppError::is_remote_failure`] holds.
#[async_trait]
pub trait QuoteRemote: Send + Sync {
    /// Full collection in server order.
    async fn list(&self) -> Result<Vec<Quote>, AppError>;

    /// Creates a quote and returns the committed record with its server id and timestamp.
    async fn create(&self, draft: &QuoteDraft) -> Result<Quote, AppError>;

    /// Applies a full or partial update and returns the server's representation.
    async fn update(&self, id: &QuoteId, patch: &QuotePatch) -> Result<Quote, AppError>;

    async fn delete(&self, id: &QuoteId) -> Result<(), AppError>;

    /// Liveness probe. `Ok` only when the backing store is reachable.
    async fn health(&self) -> Result<(), AppError>;
}
