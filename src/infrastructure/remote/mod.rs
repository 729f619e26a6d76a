pub mod http_quote_remote;

pub use http_quote_remote::HttpQuoteRemote;
