//! Adapter exposing a [`CookieJar`] to reqwest as its cookie store.
//!
//! With this adapter installed, reqwest attaches matching cookies to outgoing
//! requests that carry no explicit `Cookie` header, and feeds every response's
//! `Set-Cookie` headers back into the jar (redirect hops included).

use reqwest::header::HeaderValue;
use url::Url;

use super::cookie::{cookie_header_value, Cookie};
use super::jar::SharedCookieJar;

/// `reqwest::cookie::CookieStore` backed by a [`SharedCookieJar`].
#[derive(Debug, Clone)]
pub struct JarCookieStore {
    jar: SharedCookieJar,
}

impl JarCookieStore {
    pub fn new(jar: SharedCookieJar) -> Self {
        Self { jar }
    }
}

impl reqwest::cookie::CookieStore for JarCookieStore {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let cookies: Vec<Cookie> = cookie_headers
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| Cookie::parse_set_cookie(value, url))
            .collect();
        if !cookies.is_empty() {
            self.jar.add_cookies(url, cookies);
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let cookies = self.jar.cookies_for(url);
        if cookies.is_empty() {
            return None;
        }
        HeaderValue::from_str(&cookie_header_value(&cookies)).ok()
    }
}
