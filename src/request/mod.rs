//! Request configuration and preparation.
//!
//! This module provides:
//! - [`RequestConfig`] and its building blocks (known headers, body kinds, multipart forms)
//! - Body kind resolution and body encoding
//! - GET query composition
//! - Header assembly into a [`WireRequest`]

mod assemble;
mod body;
mod config;
mod headers;
mod multipart;
mod url;

// Re-export public API
pub use assemble::{assemble_request, WireRequest};
pub use body::{encode_body, method_allows_body, resolve_post_body_kind, EncodedBody};
pub use config::{ExternalContent, PostBodyKind, RequestConfig};
pub use headers::KnownHeader;
pub use multipart::{MultipartForm, Part};
pub use url::{compose_url, encode_query};
