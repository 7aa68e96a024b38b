//! Cookie jar contract and the in-memory implementation.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};

use url::Url;

use super::cookie::Cookie;

/// Storage for cookies shared between requests.
///
/// The pipeline only needs two things from a jar: add the cookies a response
/// set, and enumerate the cookies that apply to a URL. Implementations use
/// interior mutability because one jar is shared by every request that holds
/// a clone of the same [`SharedCookieJar`].
pub trait CookieJar: Send + Sync + Debug {
    /// Stores cookies received from `url`. Cookies with the same name, domain
    /// and path replace earlier ones; expired cookies delete them.
    fn add_cookies(&self, url: &Url, cookies: Vec<Cookie>);

    /// Returns every cookie that should be sent to `url`.
    fn cookies_for(&self, url: &Url) -> Vec<Cookie>;

    /// Returns every stored cookie, for inspection.
    fn all_cookies(&self) -> Vec<Cookie>;
}

/// Reference-counted handle to a jar, as stored on requests and responses.
pub type SharedCookieJar = Arc<dyn CookieJar>;

/// In-memory cookie jar, bucketed by cookie domain.
///
/// No persistence. `Max-Age<=0` or a past `Expires` deletes; cookies whose
/// `Expires` passes while stored are skipped on lookup.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    entries: RwLock<HashMap<String, Vec<Cookie>>>,
}

impl MemoryCookieJar {
    /// Creates an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty jar already wrapped as a [`SharedCookieJar`].
    pub fn shared() -> SharedCookieJar {
        Arc::new(Self::new())
    }

    /// Number of stored cookies.
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.values().map(Vec::len).sum()
    }

    /// Whether the jar holds no cookies.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CookieJar for MemoryCookieJar {
    fn add_cookies(&self, url: &Url, cookies: Vec<Cookie>) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        for cookie in cookies {
            let bucket = entries.entry(cookie.domain.clone()).or_default();
            bucket.retain(|c| !(c.name == cookie.name && c.path == cookie.path));
            if cookie.is_expired() {
                log::trace!("Cookie {} from {url} expired, removed", cookie.name);
                continue;
            }
            log::trace!("Storing cookie {} for domain {}", cookie.name, cookie.domain);
            bucket.push(cookie);
        }
    }

    fn cookies_for(&self, url: &Url) -> Vec<Cookie> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut matched: Vec<Cookie> = entries
            .values()
            .flatten()
            .filter(|c| c.matches(url) && !c.is_expired())
            .cloned()
            .collect();
        // RFC 6265: longer paths first
        matched.sort_by(|a, b| b.path.len().cmp(&a.path.len()));
        matched
    }

    fn all_cookies(&self) -> Vec<Cookie> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.values().flatten().cloned().collect()
    }
}
