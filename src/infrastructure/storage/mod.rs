pub mod file_quote_cache;
pub mod memory_quote_cache;

pub use file_quote_cache::FileQuoteCache;
pub use memory_quote_cache::MemoryQuoteCache;
