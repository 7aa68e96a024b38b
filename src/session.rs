//! Sessions: the owner of per-caller request state.
//!
//! A [`Session`] holds the error callback and the certificate-verification
//! switch. Nothing is process-wide; two sessions never see each other's
//! settings, and a session can be cloned cheaply into concurrent tasks.

use std::fmt;
use std::sync::Arc;

use reqwest::Method;

use crate::error_handling::{ErrorCallback, ErrorDispatcher, RequestError};
use crate::fetch::{execute, RequestState};
use crate::request::{
    assemble_request, compose_url, encode_body, method_allows_body, PostBodyKind, RequestConfig,
};
use crate::response::ResponseRecord;
use crate::xhr::parse_raw_request;

/// Entry point for issuing requests.
///
/// # Examples
///
/// ```no_run
/// use reqkit::{RequestConfig, Session};
///
/// # async fn run() -> Result<(), reqkit::RequestError> {
/// let session = Session::new();
/// let mut config = RequestConfig::new().with_param("q", "rust");
/// let response = session.get("https://example.com/search", &mut config).await?;
/// println!("{} {}", response.status_code(), response.text());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Session {
    error_callback: Option<ErrorCallback>,
    verify_tls_certificate: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            error_callback: None,
            verify_tls_certificate: true,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("error_callback", &self.error_callback.is_some())
            .field("verify_tls_certificate", &self.verify_tls_certificate)
            .finish()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for requests whose config keeps `use_error_callback` on.
    pub fn with_error_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&RequestError) + Send + Sync + 'static,
    {
        self.error_callback = Some(Arc::new(callback));
        self
    }

    pub fn set_error_callback(&mut self, callback: ErrorCallback) {
        self.error_callback = Some(callback);
    }

    pub fn clear_error_callback(&mut self) {
        self.error_callback = None;
    }

    pub fn has_error_callback(&self) -> bool {
        self.error_callback.is_some()
    }

    /// Stops verifying TLS certificates for every later request made through
    /// this session. Other sessions are unaffected.
    pub fn disable_certificate_verification(&mut self) {
        log::warn!("TLS certificate verification disabled for this session");
        self.verify_tls_certificate = false;
    }

    pub fn verifies_certificates(&self) -> bool {
        self.verify_tls_certificate
    }

    /// Runs the full pipeline for one request.
    ///
    /// `config` is borrowed mutably only to memoize its resolved body kind.
    ///
    /// A token that is already cancelled yields a `Cancelled` sentinel
    /// without touching the network. Timer expiry yields a `TimedOut`
    /// sentinel. Other failures are returned as `Err`, or handed to the
    /// error callback (yielding a `Faulted` sentinel) when one is registered
    /// and `config.use_error_callback` is set.
    ///
    /// # Errors
    ///
    /// Any classified [`RequestError`] not routed to the callback.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        config: &mut RequestConfig,
    ) -> Result<ResponseRecord, RequestError> {
        if config.is_cancelled() {
            log::debug!("Request to {url} cancelled before dispatch");
            return Ok(ResponseRecord::sentinel(
                config.cookie_jar.clone(),
                RequestState::Cancelled,
            ));
        }

        match self.try_request(method, url, config).await {
            Ok(response) => Ok(response),
            Err(error) => self.dispatcher(config).dispatch(error, config.cookie_jar.clone()),
        }
    }

    pub async fn get(
        &self,
        url: &str,
        config: &mut RequestConfig,
    ) -> Result<ResponseRecord, RequestError> {
        self.request(Method::GET, url, config).await
    }

    pub async fn post(
        &self,
        url: &str,
        config: &mut RequestConfig,
    ) -> Result<ResponseRecord, RequestError> {
        self.request(Method::POST, url, config).await
    }

    pub async fn put(
        &self,
        url: &str,
        config: &mut RequestConfig,
    ) -> Result<ResponseRecord, RequestError> {
        self.request(Method::PUT, url, config).await
    }

    pub async fn delete(
        &self,
        url: &str,
        config: &mut RequestConfig,
    ) -> Result<ResponseRecord, RequestError> {
        self.request(Method::DELETE, url, config).await
    }

    pub async fn patch(
        &self,
        url: &str,
        config: &mut RequestConfig,
    ) -> Result<ResponseRecord, RequestError> {
        self.request(Method::PATCH, url, config).await
    }

    pub async fn head(
        &self,
        url: &str,
        config: &mut RequestConfig,
    ) -> Result<ResponseRecord, RequestError> {
        self.request(Method::HEAD, url, config).await
    }

    /// Parses a raw request transcript and sends it.
    ///
    /// Parse failures follow the same dispatch policy as pipeline failures.
    ///
    /// # Errors
    ///
    /// `UrlParseError` for an unusable transcript, then anything
    /// [`request`](Self::request) can return.
    pub async fn send_raw(&self, transcript: &str) -> Result<ResponseRecord, RequestError> {
        match parse_raw_request(transcript) {
            Ok(raw) => {
                let mut config = raw.config;
                self.request(raw.method, raw.url.as_str(), &mut config).await
            }
            Err(error) => {
                let config = RequestConfig::new();
                self.dispatcher(&config).dispatch(error, config.cookie_jar.clone())
            }
        }
    }

    async fn try_request(
        &self,
        method: Method,
        url: &str,
        config: &mut RequestConfig,
    ) -> Result<ResponseRecord, RequestError> {
        let kind = config.resolve_post_body_kind(&method);
        let target = compose_url(url, &method, &config.query_params)?;
        let body = if method_allows_body(&method) {
            encode_body(config, kind)?
        } else {
            // Form parameters already went into the query string.
            if !matches!(kind, PostBodyKind::None | PostBodyKind::FormUrlEncoded) {
                log::warn!("{method} carries no body; the {kind} body is not sent");
            }
            None
        };
        let wire = assemble_request(method, target, config, body)?;

        let verify = self.verify_tls_certificate && config.verify_tls_certificate;
        execute(wire, config, verify).await
    }

    fn dispatcher<'a>(&'a self, config: &RequestConfig) -> ErrorDispatcher<'a> {
        ErrorDispatcher::new(config.use_error_callback, self.error_callback.as_ref())
    }
}
