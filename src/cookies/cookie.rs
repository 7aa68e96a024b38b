//! A single cookie and `Set-Cookie` parsing.

use chrono::{DateTime, NaiveDateTime, Utc};
use url::Url;

/// One cookie as stored in a jar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// Domain the cookie belongs to, without a leading dot.
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<String>,
    /// `Max-Age` in seconds, when the server sent one. Wins over `expires`.
    pub max_age: Option<i64>,
    pub expires: Option<DateTime<Utc>>,
}

impl Cookie {
    /// Creates a cookie scoped to `domain` with path `/`.
    pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: normalize_domain(&domain.into()),
            path: "/".to_string(),
            secure: false,
            http_only: false,
            same_site: None,
            max_age: None,
            expires: None,
        }
    }

    /// Parses one `Set-Cookie` header value received from `url`.
    ///
    /// Handles `Path`, `Domain` (leading dot stripped), `Max-Age`, `Expires`,
    /// `SameSite`, `Secure` and `HttpOnly`. Missing `Domain` means the
    /// request host; missing `Path` is derived from the request path.
    /// Returns `None` when the header has no `name=value` pair, the name is
    /// empty, or `Domain` does not cover the request host.
    pub fn parse_set_cookie(header: &str, url: &Url) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Cookie {
            name: name.to_string(),
            value: value.trim().trim_matches('"').to_string(),
            domain: normalize_domain(url.host_str().unwrap_or_default()),
            path: default_path(url),
            secure: false,
            http_only: false,
            same_site: None,
            max_age: None,
            expires: None,
        };
        let mut domain_attr = None;

        for attr in parts {
            let attr = attr.trim();
            match attr.split_once('=') {
                Some((k, v)) => {
                    let v = v.trim();
                    match k.trim().to_ascii_lowercase().as_str() {
                        "path" if v.starts_with('/') => cookie.path = v.to_string(),
                        "domain" if !v.is_empty() => domain_attr = Some(normalize_domain(v)),
                        "max-age" => cookie.max_age = v.parse().ok(),
                        "expires" => cookie.expires = parse_cookie_date(v),
                        "samesite" => cookie.same_site = Some(normalize_same_site(v)),
                        _ => {}
                    }
                }
                None => {
                    if attr.eq_ignore_ascii_case("secure") {
                        cookie.secure = true;
                    } else if attr.eq_ignore_ascii_case("httponly") {
                        cookie.http_only = true;
                    }
                }
            }
        }

        if let Some(domain) = domain_attr {
            if !domain_matches(&cookie.domain, &domain) {
                log::warn!(
                    "Rejected cookie {} from {}: Domain={domain} does not cover the host",
                    cookie.name,
                    cookie.domain
                );
                return None;
            }
            cookie.domain = domain;
        }

        Some(cookie)
    }

    /// Whether this cookie should be sent to `url` (domain, path segment, `Secure`).
    pub fn matches(&self, url: &Url) -> bool {
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        let secure_ok = !self.secure || url.scheme() == "https";
        domain_matches(&host, &self.domain) && path_matches(url.path(), &self.path) && secure_ok
    }

    /// Whether the cookie is expired or the server asked for its deletion.
    ///
    /// `Max-Age<=0` expires; otherwise an `Expires` date in the past does.
    pub fn is_expired(&self) -> bool {
        match (self.max_age, self.expires) {
            (Some(age), _) => age <= 0,
            (None, Some(expires)) => expires <= Utc::now(),
            (None, None) => false,
        }
    }
}

/// RFC 6265 domain matching: `host` is `domain` or a subdomain of it.
fn domain_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// RFC 6265 path matching: a prefix that ends on a segment boundary.
fn path_matches(request_path: &str, cookie_path: &str) -> bool {
    match request_path.strip_prefix(cookie_path) {
        Some(rest) => rest.is_empty() || cookie_path.ends_with('/') || rest.starts_with('/'),
        None => false,
    }
}

/// Parses an `Expires` value: RFC 1123, then the RFC 850 and asctime forms.
fn parse_cookie_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }
    let value = value.trim_end_matches(" GMT").trim_end_matches(" UTC");
    ["%A, %d-%b-%y %H:%M:%S", "%a, %d-%b-%Y %H:%M:%S", "%a %b %e %H:%M:%S %Y"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// Serializes cookies into a `Cookie` request header value (`a=1; b=2`).
pub fn cookie_header_value(cookies: &[Cookie]) -> String {
    cookies
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; ")
}

fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn normalize_same_site(value: &str) -> String {
    if value.eq_ignore_ascii_case("lax") {
        "Lax".to_string()
    } else if value.eq_ignore_ascii_case("strict") {
        "Strict".to_string()
    } else if value.eq_ignore_ascii_case("none") {
        "None".to_string()
    } else {
        value.to_string()
    }
}

fn default_path(url: &Url) -> String {
    match url.path().rsplit_once('/') {
        Some((dir, _)) if !dir.is_empty() => dir.to_string(),
        _ => "/".to_string(),
    }
}
