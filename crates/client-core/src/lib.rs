//! Core types, configuration, and utilities for the NeuroScan client.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{Config, DEFAULT_API_URL, DEFAULT_LOG_LEVEL};
pub use config::{CALL_TIMEOUT_SECS, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, parse_level};
pub use paths::Paths;
