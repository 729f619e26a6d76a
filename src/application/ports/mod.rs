pub mod change_feed;
pub mod quote_cache;
pub mod quote_remote;
pub mod state_observer;

pub use change_feed::ChangeFeed;
pub use quote_cache::QuoteCache;
pub use quote_remote::QuoteRemote;
pub use state_observer::{Notice, NoticeKind, StateObserver};
