pub mod config;
pub mod error;

pub use config::{AppConfig, ConfigError};
pub use error::{AppError, Result};
