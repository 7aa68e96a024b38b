//! Request configuration.
//!
//! [`RequestConfig`] is the full set of options for one request. It is built
//! by the caller (directly or through the `with_*` setters) or produced by
//! the raw transcript parser, and is borrowed by the pipeline for the
//! duration of a single request.

use std::collections::HashMap;

use encoding_rs::Encoding;
use reqwest::Method;
use tokio_util::sync::CancellationToken;

use super::body::resolve_post_body_kind;
use super::headers::KnownHeader;
use super::multipart::MultipartForm;
use crate::config::{DEFAULT_READ_BUFFER_SIZE, DEFAULT_TIMEOUT_MS};
use crate::cookies::{MemoryCookieJar, SharedCookieJar};

/// The single strategy used to encode a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostBodyKind {
    /// A pre-built body handle ([`ExternalContent`])
    ExternalContent,
    /// `application/json`
    Json,
    /// `application/x-www-form-urlencoded` built from the query parameters
    FormUrlEncoded,
    /// `multipart/form-data`
    Multipart,
    /// Raw bytes, sent unchanged
    Raw,
    /// No body
    None,
}

impl PostBodyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostBodyKind::ExternalContent => "external_content",
            PostBodyKind::Json => "json",
            PostBodyKind::FormUrlEncoded => "x_www_form_urlencoded",
            PostBodyKind::Multipart => "form_data",
            PostBodyKind::Raw => "raw",
            PostBodyKind::None => "none",
        }
    }
}

impl std::fmt::Display for PostBodyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A body prepared outside the library: bytes plus the content type that
/// describes them. Its length becomes the request's Content-Length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalContent {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

impl ExternalContent {
    pub fn new(data: impl Into<Vec<u8>>, content_type: Option<String>) -> Self {
        Self {
            data: data.into(),
            content_type,
        }
    }
}

/// Full configuration of one request.
///
/// Defaults: 1500 ms timeout, 1024-byte read buffer, error statuses and
/// transport timeouts raise, certificates are verified, HTML `<meta>`
/// charset sniffing is on, and failures go to the session's error callback
/// when one is registered.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Well-known headers, sent verbatim
    pub headers: HashMap<KnownHeader, String>,
    /// Arbitrary headers; name and value are URL-encoded before transmission
    pub custom_headers: HashMap<String, String>,
    /// Query string for GET, form body otherwise (order preserved)
    pub query_params: Vec<(String, String)>,
    pub raw_body: Option<Vec<u8>>,
    /// JSON body; a `Value::String` is sent as-is instead of re-serialized
    pub json_body: Option<serde_json::Value>,
    pub multipart: Option<MultipartForm>,
    pub external_content: Option<ExternalContent>,
    /// Encoding applied to string-typed bodies (JSON, form)
    pub post_encoding: &'static Encoding,
    /// Resolved automatically on first use when `None`; fixed afterwards
    pub post_body_kind: Option<PostBodyKind>,
    /// Proxy URL (`http://`, `https://` or `socks5://`)
    pub proxy: Option<String>,
    pub cookie_jar: SharedCookieJar,
    pub timeout_millis: u64,
    /// Transport budget for connecting and for each socket read. `None`
    /// bounds only the connect, at half of `timeout_millis`. Values at or
    /// above `timeout_millis` never fire before the executor timer.
    pub transport_timeout_millis: Option<u64>,
    pub read_buffer_size: usize,
    pub throw_on_error_status: bool,
    pub throw_on_timeout: bool,
    pub verify_tls_certificate: bool,
    pub use_html_meta_encoding: bool,
    pub use_error_callback: bool,
    pub cancel_token: Option<CancellationToken>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            custom_headers: HashMap::new(),
            query_params: Vec::new(),
            raw_body: None,
            json_body: None,
            multipart: None,
            external_content: None,
            post_encoding: encoding_rs::UTF_8,
            post_body_kind: None,
            proxy: None,
            cookie_jar: MemoryCookieJar::shared(),
            timeout_millis: DEFAULT_TIMEOUT_MS,
            transport_timeout_millis: None,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            throw_on_error_status: true,
            throw_on_timeout: true,
            verify_tls_certificate: true,
            use_html_meta_encoding: true,
            use_error_callback: true,
            cancel_token: None,
        }
    }
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, header: KnownHeader, value: impl Into<String>) -> Self {
        self.headers.insert(header, value.into());
        self
    }

    pub fn with_custom_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((key.into(), value.into()));
        self
    }

    pub fn with_raw_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.raw_body = Some(body.into());
        self
    }

    pub fn with_json(mut self, value: serde_json::Value) -> Self {
        self.json_body = Some(value);
        self
    }

    pub fn with_multipart(mut self, form: MultipartForm) -> Self {
        self.multipart = Some(form);
        self
    }

    pub fn with_external_content(mut self, content: ExternalContent) -> Self {
        self.external_content = Some(content);
        self
    }

    pub fn with_post_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.post_encoding = encoding;
        self
    }

    pub fn with_post_body_kind(mut self, kind: PostBodyKind) -> Self {
        self.post_body_kind = Some(kind);
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_cookie_jar(mut self, jar: SharedCookieJar) -> Self {
        self.cookie_jar = jar;
        self
    }

    pub fn with_timeout_millis(mut self, millis: u64) -> Self {
        self.timeout_millis = millis;
        self
    }

    pub fn with_transport_timeout_millis(mut self, millis: u64) -> Self {
        self.transport_timeout_millis = Some(millis);
        self
    }

    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    pub fn with_throw_on_error_status(mut self, enabled: bool) -> Self {
        self.throw_on_error_status = enabled;
        self
    }

    pub fn with_throw_on_timeout(mut self, enabled: bool) -> Self {
        self.throw_on_timeout = enabled;
        self
    }

    pub fn with_verify_tls_certificate(mut self, enabled: bool) -> Self {
        self.verify_tls_certificate = enabled;
        self
    }

    pub fn with_html_meta_encoding(mut self, enabled: bool) -> Self {
        self.use_html_meta_encoding = enabled;
        self
    }

    pub fn with_error_callback(mut self, enabled: bool) -> Self {
        self.use_error_callback = enabled;
        self
    }

    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    /// Resolves the body kind for `method` and memoizes it.
    ///
    /// The first call picks a kind (unless one was set explicitly) and stores
    /// it in `post_body_kind`; later calls return the stored kind unchanged.
    pub fn resolve_post_body_kind(&mut self, method: &Method) -> PostBodyKind {
        match self.post_body_kind {
            Some(kind) => kind,
            None => {
                let kind = resolve_post_body_kind(self, method);
                log::debug!("Resolved post body kind: {kind}");
                self.post_body_kind = Some(kind);
                kind
            }
        }
    }

    /// Whether cancellation was already requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}
