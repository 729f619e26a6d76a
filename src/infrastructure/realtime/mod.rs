pub mod polling_feed;

pub use polling_feed::PollingFeed;
