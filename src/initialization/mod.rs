//! Initialization of shared infrastructure.
//!
//! This module provides:
//! - Per-request HTTP client construction
//! - Logger setup for the CLI and for embedding applications

mod client;
mod logger;

// Re-export public API
pub use client::{build_client, transport_budget};
pub use logger::init_logger_with;
