use crate::domain::Quote;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Source of remote change signals for the sync loop.
///
/// Polling implementations wake up on a timer and fetch on demand; a push
/// transport can instead wake up when the server announces a change.
#[async_trait]
pub trait ChangeFeed: Send {
    /// Waits until the remote side may have new state. `false` closes the feed.
    async fn ready(&mut self) -> bool;

    /// Current remote collection.
    async fn snapshot(&mut self) -> Result<Vec<Quote>, AppError>;
}
