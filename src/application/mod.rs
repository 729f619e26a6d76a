pub mod ports;
pub mod services;

pub use services::{
    CycleOutcome, LoadSource, MutationOutcome, PollState, QuoteService, RecordStore,
    SyncContext, SyncFlags, SyncService, has_changed,
};
