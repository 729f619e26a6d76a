use crate::domain::Quote;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Local persistent copy of the collection, kept under a single key.
#[async_trait]
pub trait QuoteCache: Send + Sync {
    /// Reads the stored collection. An empty cache yields an empty list.
    async fn load(&self) -> Result<Vec<Quote>, AppError>;

    /// Overwrites the stored collection.
    async fn save(&self, quotes: &[Quote]) -> Result<(), AppError>;
}
