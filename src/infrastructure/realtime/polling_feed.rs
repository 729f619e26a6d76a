use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::application::ports::{ChangeFeed, QuoteRemote};
use crate::domain::Quote;
use crate::shared::error::AppError;

/// Change feed that wakes up on a fixed interval and fetches the full collection.
pub struct PollingFeed {
    remote: Arc<dyn QuoteRemote>,
    interval: Interval,
}

impl PollingFeed {
    /// The first tick fires one full `period` after construction.
    pub fn new(remote: Arc<dyn QuoteRemote>, period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { remote, interval }
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

#[async_trait]
impl ChangeFeed for PollingFeed {
    async fn ready(&mut self) -> bool {
        self.interval.tick().await;
        true
    }

    async fn snapshot(&mut self) -> Result<Vec<Quote>, AppError> {
        self.remote.list().await
    }
}
