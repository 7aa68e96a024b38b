//! Error classification and dispatch.
//!
//! This module provides:
//! - The fixed error taxonomy ([`ErrorKind`]) and the classified [`RequestError`]
//! - Categorization of transport errors
//! - The dual-mode dispatcher (return the error, or hand it to a session callback)
//!
//! Nothing here retries; a caller that wants a retry re-runs the whole request.

mod categorization;
mod dispatch;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, classify_reqwest_error};
pub(crate) use dispatch::ErrorDispatcher;
pub use dispatch::{error_chain_messages, ErrorCallback};
pub use types::{BoxError, ErrorKind, InitializationError, RequestError};
