//! Optimistic mutation and polling reconciliation for the freight quote tracker.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use application::ports::{ChangeFeed, Notice, NoticeKind, QuoteCache, QuoteRemote, StateObserver};
pub use application::services::{
    CycleOutcome, LoadSource, MutationOutcome, PollState, QuoteService, RecordStore, SyncContext,
    SyncFlags, SyncService, SyncStatus, has_changed,
};
pub use domain::{
    MonthPeriod, NOT_INFORMED, Quote, QuoteDraft, QuoteFilter, QuoteId, QuotePatch, StatusFilter,
};
pub use infrastructure::observer::TracingObserver;
pub use infrastructure::realtime::PollingFeed;
pub use infrastructure::remote::HttpQuoteRemote;
pub use infrastructure::storage::{FileQuoteCache, MemoryQuoteCache};
pub use shared::{AppConfig, AppError, ConfigError};
pub use state::AppState;

/// Installs the global `tracing` subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cotacoes_frete=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
