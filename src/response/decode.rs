//! Response body buffering and text encoding inference.

use std::sync::LazyLock;

use encoding_rs::Encoding;
use futures::TryStreamExt;
use regex::Regex;
use reqwest::header::{HeaderMap, CONTENT_ENCODING, CONTENT_TYPE};
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;

use super::record::ResponseRecord;
use crate::error_handling::{ErrorKind, RequestError};
use crate::request::RequestConfig;

static META_CHARSET: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta.*?charset="?([a-z0-9_-]+)\b"#).ok());

/// Reads the whole body in chunks of `buffer_size` bytes (at least 1).
///
/// # Errors
///
/// `UserCancelled` if `cancel` fires between chunks, `HttpRequestError` if
/// the stream fails.
pub async fn read_body(
    response: reqwest::Response,
    buffer_size: usize,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<u8>, RequestError> {
    let url = response.url().clone();
    let expected = response.content_length().unwrap_or(0);
    let mut body = Vec::with_capacity(expected.min(1 << 20) as usize);
    let mut chunk = vec![0u8; buffer_size.max(1)];

    let stream = response.bytes_stream().map_err(std::io::Error::other);
    let mut reader = std::pin::pin!(StreamReader::new(stream));

    loop {
        let read = match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    return Err(RequestError::new(
                        ErrorKind::UserCancelled,
                        format!("Reading the response body from {url} was cancelled"),
                    ));
                }
                read = reader.read(&mut chunk) => read,
            },
            None => reader.read(&mut chunk).await,
        };
        let n = read.map_err(|e| {
            RequestError::with_source(
                ErrorKind::HttpRequestError,
                format!("Failed to read response body from {url}"),
                e,
            )
        })?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    log::trace!("Read {} body bytes from {url}", body.len());
    Ok(body)
}

/// Extracts the `charset` parameter from a Content-Type value.
///
/// Returns `None` unless the value mentions `charset` at all.
pub fn content_type_charset(content_type: &str) -> Option<&str> {
    if !content_type.to_ascii_lowercase().contains("charset") {
        return None;
    }
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches('"').trim();
        (!value.is_empty()).then_some(value)
    })
}

/// Encoding declared by the response headers.
///
/// First recognised label wins: `Content-Encoding`, then the Content-Type
/// `charset` parameter, then UTF-8. Unknown labels (including compression
/// codings such as `gzip`) are skipped.
pub fn resolve_encoding(headers: &HeaderMap) -> &'static Encoding {
    let declared = headers
        .get(CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Encoding::for_label(v.trim().as_bytes()));
    if let Some(encoding) = declared {
        return encoding;
    }

    let charset = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(content_type_charset);
    if let Some(label) = charset {
        match Encoding::for_label(label.as_bytes()) {
            Some(encoding) => return encoding,
            None => log::warn!("Ignoring unknown response charset '{label}'"),
        }
    }

    encoding_rs::UTF_8
}

/// Looks for `<meta ... charset="X">` in decoded HTML.
pub fn sniff_meta_charset(html: &str) -> Option<&'static Encoding> {
    let label = META_CHARSET.as_ref()?.captures(html)?.get(1)?.as_str();
    let encoding = Encoding::for_label(label.as_bytes());
    if encoding.is_none() {
        log::warn!("Ignoring unknown <meta> charset '{label}'");
    }
    encoding
}

/// Buffers `response` and infers its text encoding.
///
/// The `<meta>` scan runs once, only for `text/html` and only when
/// `use_html_meta_encoding` is set; a match overrides the header-derived
/// encoding.
pub async fn decode_response(
    response: reqwest::Response,
    config: &RequestConfig,
) -> Result<ResponseRecord, RequestError> {
    let status = response.status().as_u16();
    let url = response.url().clone();
    let headers = response.headers().clone();
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let mut encoding = resolve_encoding(&headers);

    let body = read_body(
        response,
        config.read_buffer_size,
        config.cancel_token.as_ref(),
    )
    .await?;

    if config.use_html_meta_encoding && content_type.to_ascii_lowercase().contains("text/html") {
        let (text, _, _) = encoding.decode(&body);
        if let Some(meta) = sniff_meta_charset(&text) {
            log::debug!(
                "<meta> charset {} overrides {} for {url}",
                meta.name(),
                encoding.name()
            );
            encoding = meta;
        }
    }

    Ok(ResponseRecord::new(
        body,
        status,
        content_type,
        encoding,
        config.cookie_jar.clone(),
        url,
        headers,
    ))
}
