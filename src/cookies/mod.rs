//! Cookie storage.
//!
//! This module provides:
//! - [`Cookie`] and `Set-Cookie` parsing
//! - The [`CookieJar`] contract (add cookies from a response, enumerate cookies for a URL)
//! - [`MemoryCookieJar`], the default in-memory implementation
//! - [`JarCookieStore`], which plugs any jar into reqwest

mod cookie;
mod jar;
mod provider;

// Re-export public API
pub use cookie::{cookie_header_value, Cookie};
pub use jar::{CookieJar, MemoryCookieJar, SharedCookieJar};
pub use provider::JarCookieStore;
