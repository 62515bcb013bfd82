//! Shared utilities for Charter.

pub mod logging;

pub use logging::{init_logging, LogFormat, UnknownLogFormat};
