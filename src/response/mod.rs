//! Response decoding.
//!
//! This module provides:
//! - [`ResponseRecord`], the buffered response returned to callers
//! - Chunked body buffering with cooperative cancellation
//! - Text encoding inference from headers and HTML `<meta>` tags

mod decode;
mod record;

// Re-export public API
pub use decode::{
    content_type_charset, decode_response, read_body, resolve_encoding, sniff_meta_charset,
};
pub use record::ResponseRecord;
