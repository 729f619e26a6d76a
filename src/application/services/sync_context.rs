use super::record_store::RecordStore;
use crate::application::ports::{QuoteCache, QuoteRemote, StateObserver};
use crate::domain::Quote;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Mutex, RwLock, RwLockWriteGuard};

/// Connectivity and mutation flags shared by the mutator and the poll loop.
#[derive(Debug, Default)]
pub struct SyncFlags {
    online: AtomicBool,
    submitting: AtomicBool,
    in_flight: AtomicUsize,
}

impl SyncFlags {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
            ..Default::default()
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Stores the probe result and returns the previous value.
    pub fn set_online(&self, online: bool) -> bool {
        self.online.swap(online, Ordering::SeqCst)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Whether a poll cycle may fetch and overwrite the store right now.
    pub fn poll_allowed(&self) -> bool {
        self.is_online() && !self.is_submitting() && self.in_flight() == 0
    }

    /// Claims the create/update submission slot. `None` while another submission runs.
    pub fn try_begin_submit(self: &Arc<Self>) -> Option<SubmitGuard> {
        self.submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| SubmitGuard {
                flags: Arc::clone(self),
            })
    }

    /// Marks a mutation as in flight until the guard drops.
    pub fn begin_mutation(self: &Arc<Self>) -> MutationGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        MutationGuard {
            flags: Arc::clone(self),
        }
    }
}

#[must_use]
pub struct SubmitGuard {
    flags: Arc<SyncFlags>,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.flags.submitting.store(false, Ordering::SeqCst);
    }
}

#[must_use]
pub struct MutationGuard {
    flags: Arc<SyncFlags>,
}

impl Drop for MutationGuard {
    fn drop(&mut self) {
        self.flags.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// State shared by every component of one running client.
#[derive(Clone)]
pub struct SyncContext {
    pub store: Arc<RwLock<RecordStore>>,
    pub cache: Arc<dyn QuoteCache>,
    pub observer: Arc<dyn StateObserver>,
    pub flags: Arc<SyncFlags>,
    cache_turn: Arc<Mutex<()>>,
}

impl SyncContext {
    pub fn new(cache: Arc<dyn QuoteCache>, observer: Arc<dyn StateObserver>) -> Self {
        Self {
            store: Arc::new(RwLock::new(RecordStore::new())),
            cache,
            observer,
            flags: Arc::new(SyncFlags::default()),
            cache_turn: Arc::new(Mutex::new(())),
        }
    }

    /// Persists the store to the local cache, then hands it to the observer.
    ///
    /// The store lock is released before the cache write starts. Writes still
    /// land in the order their store locks were taken. Cache failures are
    /// logged and otherwise ignored.
    pub async fn publish(&self, store: RwLockWriteGuard<'_, RecordStore>) {
        let quotes = store.get_all().to_vec();
        let _turn = self.cache_turn.lock().await;
        drop(store);

        if let Err(e) = self.cache.save(&quotes).await {
            tracing::warn!("Failed to persist quote cache: {}", e);
        }
        self.observer.render(&quotes);
    }

    /// Cached collection, or empty when the cache cannot be read.
    pub async fn load_cached(&self) -> Vec<Quote> {
        match self.cache.load().await {
            Ok(quotes) => quotes,
            Err(e) => {
                tracing::warn!("Failed to read quote cache, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Runs the liveness probe, stores the result and reports transitions.
    pub async fn refresh_connectivity(&self, remote: &dyn QuoteRemote) -> bool {
        let online = match remote.health().await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("Liveness probe failed: {}", e);
                false
            }
        };

        if self.flags.set_online(online) != online {
            if online {
                tracing::info!("Remote store reachable, leaving offline mode");
            } else {
                tracing::warn!("Remote store unreachable, switching to offline mode");
            }
            self.observer.connection_changed(online);
        }
        online
    }

    pub async fn snapshot(&self) -> Vec<Quote> {
        self.store.read().await.get_all().to_vec()
    }
}
