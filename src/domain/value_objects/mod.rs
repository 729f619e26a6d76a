pub mod month_period;
pub mod quote_id;

pub use month_period::MonthPeriod;
pub use quote_id::{QuoteId, TEMPORARY_ID_PREFIX};
