//! Raw request transcripts.
//!
//! Parses a literal HTTP/1.1 request, as copied from a browser's network
//! inspector, into a method, a URL and a [`RequestConfig`] that the normal
//! pipeline can replay.

use encoding_rs::Encoding;
use reqwest::Method;
use url::Url;

use crate::config::MAX_TRANSCRIPT_HEADERS;
use crate::error_handling::{ErrorKind, RequestError};
use crate::request::{KnownHeader, PostBodyKind, RequestConfig};
use crate::response::content_type_charset;


/// A parsed transcript, ready to be sent.
#[derive(Debug, Clone)]
pub struct RawRequest {
    pub method: Method,
    pub url: Url,
    pub config: RequestConfig,
}

/// Parses a raw request transcript.
///
/// Header and body are separated by the first blank line. `Content-Length`
/// and `Accept-Encoding` are dropped because the transport recomputes them.
/// Header lines without a `:` become headers with an empty value. The body
/// is used only for non-GET methods, and its kind follows the transcript's
/// Content-Type.
///
/// # Errors
///
/// `UrlParseError` for a malformed request line, a missing `Host` header, or
/// a `Host`/path pair that does not form a valid URL.
pub fn parse_raw_request(transcript: &str) -> Result<RawRequest, RequestError> {
    let (head, body) = split_transcript(transcript.trim_start());

    let mut lines = head.lines();
    let request_line = lines
        .next()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| RequestError::new(ErrorKind::UrlParseError, "Transcript is empty"))?;
    let (method, path) = parse_request_line(request_line)?;

    let mut config = RequestConfig::new();
    let mut host: Option<String> = None;
    let mut header_count = 0usize;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if header_count == MAX_TRANSCRIPT_HEADERS {
            log::warn!(
                "Transcript has more than {MAX_TRANSCRIPT_HEADERS} header lines; ignoring the rest"
            );
            break;
        }
        header_count += 1;

        let (name, value) = match line.split_once(':') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => (line, ""),
        };
        if name.is_empty() {
            // HTTP/2 pseudo-headers (":authority: ...") copied from devtools
            log::debug!("Skipping transcript header line '{line}'");
            continue;
        }
        if name.eq_ignore_ascii_case("content-length") || name.eq_ignore_ascii_case("accept-encoding")
        {
            continue;
        }

        match KnownHeader::from_raw_name(name) {
            Some(header) => {
                if header == KnownHeader::Host {
                    host = Some(value.to_string());
                }
                config.headers.insert(header, value.to_string());
            }
            None => {
                config
                    .custom_headers
                    .insert(name.to_string(), value.to_string());
            }
        }
    }

    let host = host.filter(|h| !h.is_empty()).ok_or_else(|| {
        RequestError::new(ErrorKind::UrlParseError, "Transcript has no Host header")
    })?;
    let separator = if path.starts_with('/') { "" } else { "/" };
    let target = format!("http://{host}{separator}{path}");
    let url = Url::parse(&target).map_err(|e| {
        RequestError::with_source(
            ErrorKind::UrlParseError,
            format!("Transcript target '{target}' is not a valid URL"),
            e,
        )
    })?;

    if method != Method::GET {
        if let Some(body) = body {
            apply_body(&mut config, body);
        }
    }

    log::debug!(
        "Parsed transcript: {method} {url}, {} known and {} custom header(s), body kind {}",
        config.headers.len(),
        config.custom_headers.len(),
        config.post_body_kind.unwrap_or(PostBodyKind::None)
    );

    Ok(RawRequest {
        method,
        url,
        config,
    })
}

/// Splits at the first blank line, CRLF or LF. The body keeps its exact bytes.
fn split_transcript(transcript: &str) -> (&str, Option<&str>) {
    let crlf = transcript.find("\r\n\r\n").map(|i| (i, 4));
    let lf = transcript.find("\n\n").map(|i| (i, 2));
    match [crlf, lf].into_iter().flatten().min_by_key(|(i, _)| *i) {
        Some((index, len)) => (&transcript[..index], Some(&transcript[index + len..])),
        None => (transcript, None),
    }
}

fn parse_request_line(line: &str) -> Result<(Method, &str), RequestError> {
    let mut parts = line.split_whitespace();
    let (Some(method), Some(path)) = (parts.next(), parts.next()) else {
        return Err(RequestError::new(
            ErrorKind::UrlParseError,
            format!("Malformed request line '{line}'"),
        ));
    };
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes()).map_err(|e| {
        RequestError::with_source(
            ErrorKind::UrlParseError,
            format!("Invalid method in request line '{line}'"),
            e,
        )
    })?;
    Ok((method, path))
}

fn apply_body(config: &mut RequestConfig, body: &str) {
    let content_type = config
        .headers
        .get(&KnownHeader::ContentType)
        .cloned()
        .unwrap_or_default();
    let lower = content_type.to_ascii_lowercase();
    let is_multipart = lower.contains("multipart/form-data");

    // Multipart framing is CRLF-exact; other bodies lose the paste's trailing newline.
    let body = if is_multipart {
        body
    } else {
        body.trim_end_matches(['\r', '\n'])
    };
    if body.is_empty() {
        return;
    }

    let charset = content_type_charset(&content_type).and_then(|label| {
        let encoding = Encoding::for_label(label.as_bytes());
        if encoding.is_none() {
            log::warn!("Ignoring unknown transcript charset '{label}'");
        }
        encoding
    });
    if let Some(encoding) = charset {
        config.post_encoding = encoding;
    }
    let bytes = match charset {
        Some(encoding) => encoding.encode(body).0.into_owned(),
        None => body.as_bytes().to_vec(),
    };

    let kind = if lower.contains("application/x-www-form-urlencoded") {
        config.raw_body = Some(bytes);
        PostBodyKind::FormUrlEncoded
    } else if is_multipart {
        config.raw_body = Some(bytes);
        PostBodyKind::Multipart
    } else if lower.contains("json") {
        // Re-encoded with `post_encoding` when the body is written.
        config.json_body = Some(serde_json::Value::String(body.to_string()));
        PostBodyKind::Json
    } else {
        config.raw_body = Some(bytes);
        PostBodyKind::Raw
    };
    config.post_body_kind = Some(kind);
}
