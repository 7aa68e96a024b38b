//! Request lifecycle state.

use std::fmt;

/// Where a request attempt ended up.
///
/// `Sending` is transient. A finished attempt is `Completed`, or one of the
/// three empty outcomes carried by a sentinel response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestState {
    Sending,
    /// A response was received and decoded
    Completed,
    /// The executor timer won the race, or a transport timeout was suppressed
    TimedOut,
    /// Cancellation was requested before dispatch
    Cancelled,
    /// The error went to the session callback instead of the caller
    Faulted,
}

impl RequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestState::Sending => "sending",
            RequestState::Completed => "completed",
            RequestState::TimedOut => "timed_out",
            RequestState::Cancelled => "cancelled",
            RequestState::Faulted => "faulted",
        }
    }

    /// Whether this is a terminal state.
    pub fn is_finished(&self) -> bool {
        !matches!(self, RequestState::Sending)
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!RequestState::Sending.is_finished());
        for state in [
            RequestState::Completed,
            RequestState::TimedOut,
            RequestState::Cancelled,
            RequestState::Faulted,
        ] {
            assert!(state.is_finished(), "{state} should be terminal");
        }
    }
}
