use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{application::ports::QuoteCache, domain::Quote, shared::AppError};

/// Process-local cache for ephemeral runs and tests.
#[derive(Default)]
pub struct MemoryQuoteCache {
    quotes: RwLock<Vec<Quote>>,
    writes: AtomicUsize,
}

impl MemoryQuoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the cache without counting it as a write.
    pub async fn preload(&self, quotes: Vec<Quote>) {
        *self.quotes.write().await = quotes;
    }

    pub async fn snapshot(&self) -> Vec<Quote> {
        self.quotes.read().await.clone()
    }

    /// Number of `save` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteCache for MemoryQuoteCache {
    async fn load(&self) -> Result<Vec<Quote>, AppError> {
        Ok(self.snapshot().await)
    }

    async fn save(&self, quotes: &[Quote]) -> Result<(), AppError> {
        *self.quotes.write().await = quotes.to_vec();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
