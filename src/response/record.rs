//! The buffered response handed back to callers.

use std::fmt;

use encoding_rs::Encoding;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use url::Url;

use crate::cookies::SharedCookieJar;
use crate::fetch::RequestState;

/// A fully buffered response.
///
/// Sentinel records (timeout, pre-dispatch cancellation, callback-handled
/// error) have status 0, an empty body and UTF-8 encoding; [`state`] says
/// which of the three happened.
///
/// [`state`]: ResponseRecord::state
#[derive(Debug, Clone)]
pub struct ResponseRecord {
    raw_bytes: Vec<u8>,
    status_code: u16,
    content_type: String,
    text_encoding: &'static Encoding,
    cookie_jar: SharedCookieJar,
    state: RequestState,
    url: Option<Url>,
    headers: HeaderMap,
}

impl ResponseRecord {
    pub(crate) fn new(
        raw_bytes: Vec<u8>,
        status_code: u16,
        content_type: String,
        text_encoding: &'static Encoding,
        cookie_jar: SharedCookieJar,
        url: Url,
        headers: HeaderMap,
    ) -> Self {
        Self {
            raw_bytes,
            status_code,
            content_type,
            text_encoding,
            cookie_jar,
            state: RequestState::Completed,
            url: Some(url),
            headers,
        }
    }

    /// Empty record for an attempt that produced no response.
    pub(crate) fn sentinel(cookie_jar: SharedCookieJar, state: RequestState) -> Self {
        debug_assert!(
            state.is_finished() && state != RequestState::Completed,
            "sentinel built in state {state}"
        );
        Self {
            raw_bytes: Vec::new(),
            status_code: 0,
            content_type: String::new(),
            text_encoding: encoding_rs::UTF_8,
            cookie_jar,
            state,
            url: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Raw body bytes.
    pub fn content(&self) -> &[u8] {
        &self.raw_bytes
    }

    /// Body decoded with the current [`text_encoding`](Self::text_encoding).
    /// Malformed sequences become U+FFFD.
    pub fn text(&self) -> String {
        let (text, _, _) = self.text_encoding.decode(&self.raw_bytes);
        text.into_owned()
    }

    /// Decoded body split into lines (`\n` or `\r\n`).
    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_owned).collect()
    }

    /// Deserializes the decoded body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.text())
    }

    pub fn text_encoding(&self) -> &'static Encoding {
        self.text_encoding
    }

    /// Overrides the encoding used by [`text`](Self::text) and friends.
    pub fn set_text_encoding(&mut self, encoding: &'static Encoding) {
        self.text_encoding = encoding;
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The jar the request used, including cookies this response set.
    pub fn cookie_jar(&self) -> &SharedCookieJar {
        &self.cookie_jar
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Final URL after transport-level redirects; `None` for sentinels.
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether this record stands in for a response that never arrived.
    pub fn is_sentinel(&self) -> bool {
        self.state != RequestState::Completed
    }
}

impl fmt::Display for ResponseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
