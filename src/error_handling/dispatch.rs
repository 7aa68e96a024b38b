//! Dual-mode error delivery.
//!
//! A classified error is either returned to the caller or, when the caller
//! opted in and the session has a callback registered, handed to that
//! callback. In the callback case the request attempt is over: the caller
//! receives a `Faulted` sentinel response and nothing past the failure point
//! runs.

use std::error::Error as StdError;
use std::fmt::Write as _;
use std::sync::Arc;

use super::types::RequestError;
use crate::cookies::SharedCookieJar;
use crate::fetch::RequestState;
use crate::response::ResponseRecord;

/// Callback receiving classified errors for a session.
///
/// Requests issued concurrently through one session share the callback, so
/// implementations must be safe to call from several tasks at once.
pub type ErrorCallback = Arc<dyn Fn(&RequestError) + Send + Sync>;

/// Renders an error and its `source()` chain, one message per line, outermost first.
pub fn error_chain_messages(error: &(dyn StdError + 'static)) -> String {
    let mut out = String::new();
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(err) = current {
        let _ = writeln!(out, "{err}");
        current = err.source();
    }
    out
}

/// Routes a classified error according to the dispatch policy of one request.
pub(crate) struct ErrorDispatcher<'a> {
    callback: Option<&'a ErrorCallback>,
}

impl<'a> ErrorDispatcher<'a> {
    /// `use_callback` is the request's opt-in; `callback` the session's registration.
    /// Both must be present for callback delivery.
    pub(crate) fn new(use_callback: bool, callback: Option<&'a ErrorCallback>) -> Self {
        Self {
            callback: callback.filter(|_| use_callback),
        }
    }

    /// Delivers `error` and decides what the caller observes.
    ///
    /// Without a callback the error is returned as `Err`. With one, the
    /// callback runs and the caller gets a `Faulted` sentinel bound to `jar`.
    pub(crate) fn dispatch(
        &self,
        error: RequestError,
        jar: SharedCookieJar,
    ) -> Result<ResponseRecord, RequestError> {
        log::error!(
            "Request failed ({} error callback): {}",
            if self.callback.is_some() {
                "using"
            } else {
                "no"
            },
            error_chain_messages(&error).trim_end()
        );

        match self.callback {
            Some(callback) => {
                callback(&error);
                Ok(ResponseRecord::sentinel(jar, RequestState::Faulted))
            }
            None => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::MemoryCookieJar;
    use crate::error_handling::ErrorKind;
    use std::sync::Mutex;

    fn jar() -> SharedCookieJar {
        Arc::new(MemoryCookieJar::new())
    }

    #[test]
    fn test_dispatch_without_callback_returns_error() {
        let dispatcher = ErrorDispatcher::new(true, None);
        let result = dispatcher.dispatch(RequestError::status(500), jar());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HttpStatusCodeError);
        assert_eq!(err.status_code(), Some(500));
    }

    #[test]
    fn test_dispatch_with_callback_returns_faulted_sentinel() {
        let seen: Arc<Mutex<Vec<ErrorKind>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ErrorCallback = Arc::new(move |e: &RequestError| {
            sink.lock().unwrap().push(e.kind());
        });

        let dispatcher = ErrorDispatcher::new(true, Some(&callback));
        let record = dispatcher
            .dispatch(
                RequestError::new(ErrorKind::UrlParseError, "bad url"),
                jar(),
            )
            .unwrap();

        assert_eq!(record.status_code(), 0);
        assert!(record.content().is_empty());
        assert_eq!(record.state(), RequestState::Faulted);
        assert_eq!(*seen.lock().unwrap(), vec![ErrorKind::UrlParseError]);
    }

    #[test]
    fn test_callback_ignored_when_request_opts_out() {
        let callback: ErrorCallback = Arc::new(|_: &RequestError| {
            panic!("callback must not run when the request opted out");
        });
        let dispatcher = ErrorDispatcher::new(false, Some(&callback));
        let result = dispatcher.dispatch(RequestError::new(ErrorKind::Other, "boom"), jar());
        assert!(result.is_err());
    }

    #[test]
    fn test_error_chain_messages_lists_every_level() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        let err = RequestError::with_source(ErrorKind::HttpRequestError, "send failed", io);
        let rendered = error_chain_messages(&err);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, vec!["HTTPRequestError: send failed", "connection reset"]);
    }
}
