use super::change_detector::has_changed;
use super::record_store::RecordStore;
use super::sync_context::SyncContext;
use crate::application::ports::{ChangeFeed, Notice, QuoteRemote};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    Idle,
    Polling,
    Suppressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Offline or a mutation was in flight; nothing fetched or overwritten.
    Suppressed,
    Unchanged,
    /// Remote state diverged and replaced the store; carries the new record count.
    Replaced(usize),
    FetchFailed,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SyncStatus {
    pub state: PollState,
    pub last_sync: Option<i64>,
    pub last_change: Option<i64>,
    pub fetch_errors: u32,
}

pub struct SyncService {
    ctx: SyncContext,
    remote: Arc<dyn QuoteRemote>,
    status: Arc<RwLock<SyncStatus>>,
}

impl SyncService {
    pub fn new(ctx: SyncContext, remote: Arc<dyn QuoteRemote>) -> Self {
        Self {
            ctx,
            remote,
            status: Arc::new(RwLock::new(SyncStatus {
                state: PollState::Idle,
                last_sync: None,
                last_change: None,
                fetch_errors: 0,
            })),
        }
    }

    pub async fn get_status(&self) -> SyncStatus {
        self.status.read().await.clone()
    }

    pub async fn state(&self) -> PollState {
        self.status.read().await.state
    }

    /// One reconciliation pass against the feed's current remote snapshot.
    pub async fn run_cycle<F>(&self, feed: &mut F) -> CycleOutcome
    where
        F: ChangeFeed + ?Sized,
    {
        if !self.ctx.flags.is_online() {
            self.ctx.refresh_connectivity(self.remote.as_ref()).await;
        }
        if !self.ctx.flags.poll_allowed() {
            tracing::debug!(
                "Poll tick suppressed (online: {}, in flight: {})",
                self.ctx.flags.is_online(),
                self.ctx.flags.in_flight()
            );
            self.set_state(PollState::Suppressed).await;
            return CycleOutcome::Suppressed;
        }

        self.set_state(PollState::Polling).await;
        let remote = match feed.snapshot().await {
            Ok(quotes) => RecordStore::from_quotes(quotes),
            Err(e) => {
                if e.is_remote_failure() {
                    tracing::debug!("Poll fetch failed, skipping cycle: {}", e);
                } else {
                    tracing::warn!("Poll feed error, skipping cycle: {}", e);
                }
                let mut status = self.status.write().await;
                status.fetch_errors += 1;
                status.state = PollState::Idle;
                return CycleOutcome::FetchFailed;
            }
        };

        let outcome = {
            let mut store = self.ctx.store.write().await;
            // A mutation may have started while the fetch was pending.
            if !self.ctx.flags.poll_allowed() {
                CycleOutcome::Suppressed
            } else if !has_changed(store.get_all(), remote.get_all()) {
                CycleOutcome::Unchanged
            } else {
                *store = remote;
                let count = store.len();
                self.ctx.publish(store).await;
                CycleOutcome::Replaced(count)
            }
        };

        let now = chrono::Utc::now().timestamp();
        let mut status = self.status.write().await;
        match outcome {
            CycleOutcome::Suppressed => {
                status.state = PollState::Suppressed;
                return outcome;
            }
            CycleOutcome::Replaced(count) => {
                tracing::info!("Remote changes pulled, {} quotes now", count);
                status.last_change = Some(now);
                self.ctx.observer.notify(Notice::data_updated());
            }
            CycleOutcome::Unchanged | CycleOutcome::FetchFailed => {}
        }
        status.last_sync = Some(now);
        status.state = PollState::Idle;
        outcome
    }

    /// Drives `feed` until it closes or `shutdown` flips to `true`.
    pub async fn run<F>(&self, mut feed: F, mut shutdown: watch::Receiver<bool>)
    where
        F: ChangeFeed,
    {
        tracing::info!("Realtime sync started");
        loop {
            if *shutdown.borrow() {
                break;
            }
            let ready = tokio::select! {
                _ = shutdown.changed() => false,
                ready = feed.ready() => ready,
            };
            if !ready || *shutdown.borrow() {
                break;
            }

            let outcome = self.run_cycle(&mut feed).await;
            tracing::debug!("Poll cycle finished: {:?}", outcome);
        }
        self.set_state(PollState::Idle).await;
        tracing::info!("Realtime sync stopped");
    }

    pub fn spawn<F>(self: &Arc<Self>, feed: F, shutdown: watch::Receiver<bool>) -> JoinHandle<()>
    where
        F: ChangeFeed + 'static,
    {
        let service = Arc::clone(self);
        tokio::spawn(async move { service.run(feed, shutdown).await })
    }

    async fn set_state(&self, state: PollState) {
        self.status.write().await.state = state;
    }
}
