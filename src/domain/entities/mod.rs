pub mod quote;
pub mod quote_filter;
pub mod quote_patch;

pub use quote::{NOT_INFORMED, Quote, QuoteDraft, sort_for_display};
pub use quote_filter::{QuoteFilter, StatusFilter};
pub use quote_patch::QuotePatch;
