pub mod entities;
pub mod value_objects;

pub use entities::{
    NOT_INFORMED, Quote, QuoteDraft, QuoteFilter, QuotePatch, StatusFilter, sort_for_display,
};
pub use value_objects::{MonthPeriod, QuoteId};
