use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::application::ports::{QuoteCache, QuoteRemote, StateObserver};
use crate::application::services::{QuoteService, SyncContext, SyncService};
use crate::infrastructure::realtime::PollingFeed;
use crate::infrastructure::remote::HttpQuoteRemote;
use crate::infrastructure::storage::FileQuoteCache;
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;

/// Everything one running client owns, created at start and dropped at shutdown.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub context: SyncContext,
    pub remote: Arc<dyn QuoteRemote>,
    pub quote_service: Arc<QuoteService>,
    pub sync_service: Arc<SyncService>,
}

impl AppState {
    /// Wires the HTTP remote and the file cache described by `config`.
    pub async fn new(config: AppConfig, observer: Arc<dyn StateObserver>) -> Result<Self, AppError> {
        config.validate()?;

        let remote: Arc<dyn QuoteRemote> = Arc::new(HttpQuoteRemote::new(&config.remote)?);
        let cache: Arc<dyn QuoteCache> = Arc::new(
            FileQuoteCache::new(config.storage.data_path(), &config.storage.cache_key).await?,
        );
        tracing::info!(
            api_url = %config.remote.api_url,
            data_dir = %config.storage.data_dir,
            "Quote sync state initialised"
        );

        Ok(Self::with_components(config, remote, cache, observer))
    }

    pub fn with_components(
        config: AppConfig,
        remote: Arc<dyn QuoteRemote>,
        cache: Arc<dyn QuoteCache>,
        observer: Arc<dyn StateObserver>,
    ) -> Self {
        let context = SyncContext::new(cache, observer);
        let quote_service = Arc::new(QuoteService::new(context.clone(), Arc::clone(&remote)));
        let sync_service = Arc::new(SyncService::new(context.clone(), Arc::clone(&remote)));

        Self {
            config,
            context,
            remote,
            quote_service,
            sync_service,
        }
    }

    pub fn polling_feed(&self) -> PollingFeed {
        PollingFeed::new(
            Arc::clone(&self.remote),
            Duration::from_millis(self.config.sync.poll_interval_ms),
        )
    }

    /// Starts the poll loop unless sync is disabled in the configuration.
    pub fn start_realtime_sync(&self, shutdown: watch::Receiver<bool>) -> Option<JoinHandle<()>> {
        if !self.config.sync.enabled {
            tracing::info!("Realtime sync disabled by configuration");
            return None;
        }
        Some(self.sync_service.spawn(self.polling_feed(), shutdown))
    }
}
