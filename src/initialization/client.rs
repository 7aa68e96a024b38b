//! HTTP client initialization.
//!
//! One client is built per request so that proxy, certificate policy and
//! cookie jar are exactly the ones that request was configured with.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::cookies::JarCookieStore;
use crate::error_handling::{ErrorKind, RequestError};
use crate::request::RequestConfig;

/// Transport-level timeout for a request.
///
/// The transport budget must be shorter than the executor timer, or the
/// timer always wins and transport timeouts are never observed. Without an
/// explicit budget, half of `timeout_millis` (at least 1 ms) bounds the
/// connect only.
pub fn transport_budget(config: &RequestConfig) -> Duration {
    let millis = config
        .transport_timeout_millis
        .unwrap_or(config.timeout_millis / 2)
        .max(1);
    Duration::from_millis(millis)
}

/// Builds the transport client for one request.
///
/// The client is configured with:
/// - a connect timeout of [`transport_budget`], plus the same read timeout
///   when `transport_timeout_millis` is set
/// - the request's proxy, if any
/// - certificate verification as decided by session and request together
/// - a cookie provider bound to the request's jar
///
/// # Errors
///
/// `UrlParseError` for a malformed proxy URL, `HttpRequestError` if the
/// client itself cannot be built.
pub fn build_client(
    config: &RequestConfig,
    verify_tls_certificate: bool,
) -> Result<reqwest::Client, RequestError> {
    let budget = transport_budget(config);
    let mut builder = ClientBuilder::new()
        .connect_timeout(budget)
        .cookie_provider(Arc::new(JarCookieStore::new(config.cookie_jar.clone())));

    if config.transport_timeout_millis.is_some() {
        builder = builder.read_timeout(budget);
    }

    if !verify_tls_certificate {
        log::debug!("Certificate verification disabled for this request");
        builder = builder.danger_accept_invalid_certs(true);
    }

    if let Some(proxy) = config.proxy.as_deref() {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| {
            RequestError::with_source(
                ErrorKind::UrlParseError,
                format!("Invalid proxy URL '{proxy}'"),
                e,
            )
        })?;
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(|e| {
        RequestError::with_source(
            ErrorKind::HttpRequestError,
            "Failed to build HTTP client",
            e,
        )
    })
}
