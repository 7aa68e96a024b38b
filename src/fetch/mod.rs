//! Transport execution.
//!
//! This module provides:
//! - [`race_response`]: the response wait, raced against timer and cancellation
//! - [`execute`]: client construction, send, status policy and hand-off to decoding
//! - [`RequestState`]: the lifecycle states a response can report

mod executor;
mod race;
mod state;

// Re-export public API
pub use executor::{execute, is_non_error_status};
pub use race::{race_response, RaceOutcome};
pub use state::RequestState;
