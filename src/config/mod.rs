//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, buffer sizes, default headers, status allow-list)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{LogFormat, LogLevel, Opt};
