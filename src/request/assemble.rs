//! Header assembly.
//!
//! Turns a [`RequestConfig`] plus an encoded body into the wire-level request:
//! known headers mapped one by one, custom headers URL-encoded, defaults
//! injected where the caller left gaps, and the jar's cookies serialized by
//! hand for non-GET methods.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, CONTENT_LENGTH,
    CONTENT_TYPE, COOKIE, USER_AGENT,
};
use reqwest::Method;
use url::form_urlencoded::byte_serialize;
use url::Url;

use super::body::EncodedBody;
use super::config::RequestConfig;
use super::headers::KnownHeader;
use crate::config::{DEFAULT_ACCEPT, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_USER_AGENT};
use crate::cookies::cookie_header_value;
use crate::error_handling::{ErrorKind, RequestError};

/// A fully assembled request, ready for the transport.
#[derive(Debug)]
pub struct WireRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<EncodedBody>,
}

impl WireRequest {
    /// Converts into a reqwest request builder on `client`.
    pub fn into_request_builder(self, client: &reqwest::Client) -> reqwest::RequestBuilder {
        let builder = client
            .request(self.method, self.url)
            .headers(self.headers);
        match self.body {
            Some(body) => builder.body(body.bytes),
            None => builder,
        }
    }
}

/// Builds the wire request for `method` and `url`.
///
/// `body` is `None` for GET/HEAD and for [`PostBodyKind::None`](super::PostBodyKind::None).
///
/// # Errors
///
/// `HttpRequestHeaderError` when a header name or value cannot be represented.
pub fn assemble_request(
    method: Method,
    url: Url,
    config: &RequestConfig,
    body: Option<EncodedBody>,
) -> Result<WireRequest, RequestError> {
    let mut headers = HeaderMap::new();
    let mut keep_alive = true;

    // Sorted so the outcome does not depend on map iteration order.
    let mut known: Vec<_> = config.headers.iter().collect();
    known.sort_by_key(|(h, _)| **h);

    for (header, value) in known {
        match header {
            KnownHeader::Connection => {
                let trimmed = value.trim();
                if trimmed.eq_ignore_ascii_case("keep-alive") {
                    keep_alive = true;
                } else if trimmed.eq_ignore_ascii_case("close") {
                    keep_alive = false;
                } else {
                    headers.insert(CONNECTION, header_value(*header, trimmed)?);
                }
            }
            KnownHeader::ContentLength => match value.trim().parse::<u64>() {
                Ok(length) if body.is_none() => {
                    headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
                }
                Ok(_) => {
                    log::debug!("Ignoring caller Content-Length; the body's own length is used");
                }
                Err(_) => {
                    log::warn!("Ignoring invalid Content-Length header value '{value}'");
                }
            },
            KnownHeader::Date => {
                if chrono::DateTime::parse_from_rfc2822(value.trim()).is_ok() {
                    headers.insert(reqwest::header::DATE, header_value(*header, value.trim())?);
                } else {
                    log::warn!("Ignoring unparseable Date header value '{value}'");
                }
            }
            _ => {
                let name = HeaderName::from_bytes(header.header_name().as_bytes()).map_err(|e| {
                    RequestError::with_source(
                        ErrorKind::HttpRequestHeaderError,
                        format!("Invalid header name '{header}'"),
                        e,
                    )
                })?;
                headers.insert(name, header_value(*header, value.trim())?);
            }
        }
    }

    for (name, value) in &config.custom_headers {
        let encoded_name: String = byte_serialize(name.as_bytes()).collect();
        let encoded_value: String = byte_serialize(value.as_bytes()).collect();
        let header_name = HeaderName::from_bytes(encoded_name.as_bytes()).map_err(|e| {
            RequestError::with_source(
                ErrorKind::HttpRequestHeaderError,
                format!("Invalid custom header name '{name}'"),
                e,
            )
        })?;
        let header_value = HeaderValue::from_str(&encoded_value).map_err(|e| {
            RequestError::with_source(
                ErrorKind::HttpRequestHeaderError,
                format!("Invalid value for custom header '{name}'"),
                e,
            )
        })?;
        headers.append(header_name, header_value);
    }

    if let Some(content_type) = body.as_ref().and_then(|b| b.content_type.as_deref()) {
        let value = HeaderValue::from_str(content_type).map_err(|e| {
            RequestError::with_source(
                ErrorKind::HttpRequestHeaderError,
                format!("Invalid body content type '{content_type}'"),
                e,
            )
        })?;
        headers.insert(CONTENT_TYPE, value);
    }

    if !headers.contains_key(ACCEPT_LANGUAGE) {
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE));
    }
    if !headers.contains_key(USER_AGENT) {
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    }
    if !headers.contains_key(ACCEPT) {
        headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
    }
    if !keep_alive {
        headers.insert(CONNECTION, HeaderValue::from_static("close"));
    }

    // The jar only attaches cookies automatically for GET; other methods get them here.
    if method != Method::GET && !headers.contains_key(COOKIE) {
        let cookies = config.cookie_jar.cookies_for(&url);
        if !cookies.is_empty() {
            let value = cookie_header_value(&cookies);
            log::trace!("Attaching {} jar cookie(s) to {method} {url}", cookies.len());
            headers.insert(
                COOKIE,
                HeaderValue::from_str(&value).map_err(|e| {
                    RequestError::with_source(
                        ErrorKind::HttpRequestHeaderError,
                        "Cookie jar produced an invalid Cookie header",
                        e,
                    )
                })?,
            );
        }
    }

    log::debug!(
        "Assembled {method} {url} with {} header(s), body {} bytes",
        headers.len(),
        body.as_ref().map_or(0, EncodedBody::content_length)
    );

    Ok(WireRequest {
        method,
        url,
        headers,
        body,
    })
}

fn header_value(header: KnownHeader, value: &str) -> Result<HeaderValue, RequestError> {
    HeaderValue::from_str(value).map_err(|e| {
        RequestError::with_source(
            ErrorKind::HttpRequestHeaderError,
            format!("Invalid value for header {header}"),
            e,
        )
    })
}
