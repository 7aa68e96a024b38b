//! Configuration constants.
//!
//! This module defines the defaults applied to every request configuration
//! and the fixed policy tables used by the executor.

/// Default executor timeout in milliseconds (time allowed for response headers)
pub const DEFAULT_TIMEOUT_MS: u64 = 1500;

/// Default chunk size used when buffering a response body
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// Default `Accept` header, injected only when the caller supplied none.
pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,application/json;q=0.9,*/*;q=0.8";

/// Default `Accept-Language` header, injected only when the caller supplied none.
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Default User-Agent string for HTTP requests.
///
/// Users can override it through the `User-Agent` known header, a custom
/// header of the same name, or the `-H` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Status codes that never count as errors, even with `throw_on_error_status`.
///
/// Informational 100, the 2xx family up to Partial Content, and the redirect
/// codes a transport can surface when it does not follow the redirect itself.
pub const NON_ERROR_STATUS_CODES: &[u16] = &[
    100, // Continue
    200, 201, 202, 203, 204, 205, 206, // Success family
    300, 301, 302, 303, 304, // Multiple Choices .. Not Modified
    307, 308, // Temporary / Permanent Redirect
];

/// Upper bound on header lines accepted from a raw transcript.
/// Protects the parser from pathological pastes (header bombs).
pub const MAX_TRANSCRIPT_HEADERS: usize = 256;

