pub mod change_detector;
pub mod quote_service;
pub mod record_store;
pub mod sync_context;
pub mod sync_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use change_detector::has_changed;
pub use quote_service::{LoadSource, MutationOutcome, QuoteService};
pub use record_store::RecordStore;
pub use sync_context::{MutationGuard, SubmitGuard, SyncContext, SyncFlags};
pub use sync_service::{CycleOutcome, PollState, SyncService, SyncStatus};
