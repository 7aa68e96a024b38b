//! Request body encoding.
//!
//! Picks exactly one body strategy from the configured fields and serializes
//! the bytes together with the Content-Type that describes them.

use reqwest::Method;

use super::config::{PostBodyKind, RequestConfig};
use super::url::encode_query;
use crate::error_handling::RequestError;

/// Serialized request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub bytes: Vec<u8>,
    /// Content-Type owned by the body; `None` leaves the caller's header in place.
    pub content_type: Option<String>,
}

impl EncodedBody {
    pub fn content_length(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Chooses the body kind from the fields that are set.
///
/// First match wins, in this order: external content; query parameters on a
/// non-GET request (form); JSON; non-empty raw bytes; non-empty multipart;
/// otherwise no body. Fields further down the list are ignored even if set.
pub fn resolve_post_body_kind(config: &RequestConfig, method: &Method) -> PostBodyKind {
    if config.external_content.is_some() {
        PostBodyKind::ExternalContent
    } else if !config.query_params.is_empty() && *method != Method::GET {
        PostBodyKind::FormUrlEncoded
    } else if json_present(config.json_body.as_ref()) {
        PostBodyKind::Json
    } else if config.raw_body.as_ref().is_some_and(|b| !b.is_empty()) {
        PostBodyKind::Raw
    } else if config.multipart.as_ref().is_some_and(|m| !m.is_empty()) {
        PostBodyKind::Multipart
    } else {
        PostBodyKind::None
    }
}

/// Whether a body is written at all for `method`.
pub fn method_allows_body(method: &Method) -> bool {
    *method != Method::GET && *method != Method::HEAD
}

/// Serializes the body for an already-resolved `kind`.
///
/// Returns `Ok(None)` for [`PostBodyKind::None`].
///
/// # Errors
///
/// `ArgumentNull` when the field `kind` depends on is missing or empty.
/// An explicitly chosen form or multipart kind accepts a non-empty
/// `raw_body` as its literal, already-encoded payload.
pub fn encode_body(
    config: &RequestConfig,
    kind: PostBodyKind,
) -> Result<Option<EncodedBody>, RequestError> {
    let charset = config.post_encoding.name().to_ascii_lowercase();
    let body = match kind {
        PostBodyKind::None => return Ok(None),
        PostBodyKind::Json => {
            let value = config
                .json_body
                .as_ref()
                .filter(|v| json_present(Some(v)))
                .ok_or_else(|| RequestError::argument_null("json_body", kind.as_str()))?;
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            EncodedBody {
                bytes: encode_text(config, &text),
                content_type: Some(format!("application/json;charset={charset}")),
            }
        }
        PostBodyKind::FormUrlEncoded => {
            let bytes = if !config.query_params.is_empty() {
                encode_text(config, &encode_query(&config.query_params))
            } else {
                literal_raw(config)
                    .ok_or_else(|| RequestError::argument_null("query_params", kind.as_str()))?
            };
            EncodedBody {
                bytes,
                content_type: Some(format!(
                    "application/x-www-form-urlencoded;charset={charset}"
                )),
            }
        }
        PostBodyKind::Multipart => match config.multipart.as_ref().filter(|m| !m.is_empty()) {
            Some(form) => EncodedBody {
                bytes: form.to_bytes(),
                content_type: Some(form.content_type()),
            },
            None => EncodedBody {
                // Literal transcript payload; the boundary lives in the caller's Content-Type.
                bytes: literal_raw(config)
                    .ok_or_else(|| RequestError::argument_null("multipart", kind.as_str()))?,
                content_type: None,
            },
        },
        PostBodyKind::Raw => EncodedBody {
            bytes: literal_raw(config)
                .ok_or_else(|| RequestError::argument_null("raw_body", kind.as_str()))?,
            content_type: None,
        },
        PostBodyKind::ExternalContent => {
            let content = config.external_content.as_ref().ok_or_else(|| {
                RequestError::argument_null("external_content", kind.as_str())
            })?;
            EncodedBody {
                bytes: content.data.clone(),
                content_type: content.content_type.clone(),
            }
        }
    };

    log::trace!(
        "Encoded {} body: {} bytes, content-type {:?}",
        kind,
        body.content_length(),
        body.content_type
    );
    Ok(Some(body))
}

fn json_present(value: Option<&serde_json::Value>) -> bool {
    match value {
        None => false,
        Some(serde_json::Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn literal_raw(config: &RequestConfig) -> Option<Vec<u8>> {
    config.raw_body.clone().filter(|b| !b.is_empty())
}

fn encode_text(config: &RequestConfig, text: &str) -> Vec<u8> {
    let (bytes, _, had_unmappable) = config.post_encoding.encode(text);
    if had_unmappable {
        log::warn!(
            "Body contains characters not representable in {}; replaced with numeric references",
            config.post_encoding.name()
        );
    }
    bytes.into_owned()
}
