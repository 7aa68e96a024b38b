//! Well-known request header names.
//!
//! Known headers are sent as-is; everything else goes through the custom
//! header map, which is URL-encoded before transmission.

use strum::IntoEnumIterator;
use strum_macros::EnumIter as EnumIterMacro;

/// Closed enumeration of well-known HTTP request headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIterMacro)]
pub enum KnownHeader {
    Accept,
    AcceptCharset,
    AcceptEncoding,
    AcceptLanguage,
    Allow,
    Authorization,
    CacheControl,
    Connection,
    ContentEncoding,
    ContentLanguage,
    ContentLength,
    ContentLocation,
    ContentMd5,
    ContentRange,
    ContentType,
    Cookie,
    Date,
    Expect,
    Expires,
    From,
    Host,
    IfMatch,
    IfModifiedSince,
    IfNoneMatch,
    IfRange,
    IfUnmodifiedSince,
    KeepAlive,
    LastModified,
    MaxForwards,
    Origin,
    Pragma,
    ProxyAuthorization,
    Range,
    Referer,
    Te,
    Trailer,
    TransferEncoding,
    Upgrade,
    UserAgent,
    Via,
    Warning,
}

impl KnownHeader {
    /// Canonical wire name of the header.
    pub fn header_name(&self) -> &'static str {
        match self {
            KnownHeader::Accept => "Accept",
            KnownHeader::AcceptCharset => "Accept-Charset",
            KnownHeader::AcceptEncoding => "Accept-Encoding",
            KnownHeader::AcceptLanguage => "Accept-Language",
            KnownHeader::Allow => "Allow",
            KnownHeader::Authorization => "Authorization",
            KnownHeader::CacheControl => "Cache-Control",
            KnownHeader::Connection => "Connection",
            KnownHeader::ContentEncoding => "Content-Encoding",
            KnownHeader::ContentLanguage => "Content-Language",
            KnownHeader::ContentLength => "Content-Length",
            KnownHeader::ContentLocation => "Content-Location",
            KnownHeader::ContentMd5 => "Content-MD5",
            KnownHeader::ContentRange => "Content-Range",
            KnownHeader::ContentType => "Content-Type",
            KnownHeader::Cookie => "Cookie",
            KnownHeader::Date => "Date",
            KnownHeader::Expect => "Expect",
            KnownHeader::Expires => "Expires",
            KnownHeader::From => "From",
            KnownHeader::Host => "Host",
            KnownHeader::IfMatch => "If-Match",
            KnownHeader::IfModifiedSince => "If-Modified-Since",
            KnownHeader::IfNoneMatch => "If-None-Match",
            KnownHeader::IfRange => "If-Range",
            KnownHeader::IfUnmodifiedSince => "If-Unmodified-Since",
            KnownHeader::KeepAlive => "Keep-Alive",
            KnownHeader::LastModified => "Last-Modified",
            KnownHeader::MaxForwards => "Max-Forwards",
            KnownHeader::Origin => "Origin",
            KnownHeader::Pragma => "Pragma",
            KnownHeader::ProxyAuthorization => "Proxy-Authorization",
            KnownHeader::Range => "Range",
            KnownHeader::Referer => "Referer",
            KnownHeader::Te => "TE",
            KnownHeader::Trailer => "Trailer",
            KnownHeader::TransferEncoding => "Transfer-Encoding",
            KnownHeader::Upgrade => "Upgrade",
            KnownHeader::UserAgent => "User-Agent",
            KnownHeader::Via => "Via",
            KnownHeader::Warning => "Warning",
        }
    }

    /// Looks up a raw header name (as typed in a transcript).
    ///
    /// Matching is case-insensitive and ignores hyphens, so `user-agent`,
    /// `User-Agent` and `USERAGENT` all resolve to [`KnownHeader::UserAgent`].
    pub fn from_raw_name(name: &str) -> Option<Self> {
        let wanted = compact(name);
        if wanted.is_empty() {
            return None;
        }
        KnownHeader::iter().find(|h| compact(h.header_name()) == wanted)
    }
}

fn compact(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl std::fmt::Display for KnownHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header_name())
    }
}
