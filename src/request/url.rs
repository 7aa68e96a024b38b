//! URL composition for GET and HEAD query parameters.

use reqwest::Method;
use url::form_urlencoded::byte_serialize;
use url::Url;

use super::body::method_allows_body;
use crate::error_handling::{ErrorKind, RequestError};

/// Serializes `key=value` pairs with form URL-encoding, joined by `&`.
///
/// Spaces become `+`; every reserved character is percent-encoded.
pub fn encode_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                byte_serialize(k.as_bytes()).collect::<String>(),
                byte_serialize(v.as_bytes()).collect::<String>()
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Parses `target` and, for methods that carry no body (GET, HEAD), appends
/// the encoded query parameters after any query it already carries.
///
/// A fragment on the target is kept after the new query. Other methods send
/// their parameters as a form body, so their URL is returned as parsed.
///
/// # Errors
///
/// `UrlParseError` when `target` (or the composed URL) is not an absolute URL.
pub fn compose_url(
    target: &str,
    method: &Method,
    params: &[(String, String)],
) -> Result<Url, RequestError> {
    let parsed = parse(target)?;
    if method_allows_body(method) || params.is_empty() {
        return Ok(parsed);
    }

    let (without_fragment, fragment) = match target.split_once('#') {
        Some((head, frag)) => (head, Some(frag)),
        None => (target, None),
    };
    let (base, existing_query) = match without_fragment.split_once('?') {
        Some((head, query)) => (head, query),
        None => (without_fragment, ""),
    };

    let mut composed = String::with_capacity(target.len() + 32);
    composed.push_str(base);
    if parsed.path() == "/" && !base.ends_with('/') {
        composed.push('/');
    }
    composed.push('?');
    if !existing_query.is_empty() {
        composed.push_str(existing_query);
        if !existing_query.ends_with('&') {
            composed.push('&');
        }
    }
    composed.push_str(&encode_query(params));
    if let Some(fragment) = fragment {
        composed.push('#');
        composed.push_str(fragment);
    }

    log::debug!("Composed request URL: {composed}");
    parse(&composed)
}

fn parse(target: &str) -> Result<Url, RequestError> {
    Url::parse(target.trim()).map_err(|e| {
        RequestError::with_source(
            ErrorKind::UrlParseError,
            format!("Invalid request URL '{target}'"),
            e,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_appends_after_existing_query() {
        let url = compose_url("https://x.test/a?b=1", &Method::GET, &params(&[("c", "2")])).unwrap();
        assert_eq!(url.as_str(), "https://x.test/a?b=1&c=2");
    }

    #[test]
    fn test_existing_query_ending_with_ampersand() {
        let url = compose_url("https://x.test/a?b=1&", &Method::GET, &params(&[("c", "2")])).unwrap();
        assert_eq!(url.as_str(), "https://x.test/a?b=1&c=2");
    }

    #[test]
    fn test_bare_host_gets_slash() {
        let url = compose_url("https://x.test", &Method::GET, &params(&[("q", "v")])).unwrap();
        assert_eq!(url.as_str(), "https://x.test/?q=v");

        let url = compose_url("https://x.test/", &Method::GET, &params(&[("q", "v")])).unwrap();
        assert_eq!(url.as_str(), "https://x.test/?q=v");
    }

    #[test]
    fn test_fragment_is_kept_last() {
        let url = compose_url("https://x.test/p#top", &Method::GET, &params(&[("a", "1")])).unwrap();
        assert_eq!(url.as_str(), "https://x.test/p?a=1#top");
    }

    #[test]
    fn test_values_are_encoded() {
        let url = compose_url(
            "https://x.test/s",
            &Method::GET,
            &params(&[("q", "a b&c"), ("名", "值")]),
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://x.test/s?q=a+b%26c&%E5%90%8D=%E5%80%BC"
        );
    }

    #[test]
    fn test_head_appends_like_get() {
        let url = compose_url("https://x.test/a", &Method::HEAD, &params(&[("c", "2")])).unwrap();
        assert_eq!(url.as_str(), "https://x.test/a?c=2");
    }

    #[test]
    fn test_non_get_leaves_url_alone() {
        let url = compose_url("https://x.test/a?b=1", &Method::POST, &params(&[("c", "2")])).unwrap();
        assert_eq!(url.as_str(), "https://x.test/a?b=1");
    }

    #[test]
    fn test_invalid_url_is_url_parse_error() {
        let err = compose_url("not a url", &Method::GET, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UrlParseError);
        assert!(err.message().contains("not a url"));

        let err = compose_url("/relative/path", &Method::POST, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UrlParseError);
    }

    #[test]
    fn test_encode_query_order_preserved() {
        assert_eq!(
            encode_query(&params(&[("b", "2"), ("a", "1"), ("b", "3")])),
            "b=2&a=1&b=3"
        );
        assert_eq!(encode_query(&[]), "");
    }
}
