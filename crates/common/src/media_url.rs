//! Size-variant media URLs.
//!
//! Source URLs are Instagram-style permalinks; the image itself is served
//! from `<permalink>media/?size=<l|m|t>`.

use std::borrow::Cow;

/// Legacy short host, which answers with a redirect and a bad certificate.
const LEGACY_HOST: &str = "//instagr.am";

/// Canonical host for [`LEGACY_HOST`].
const CANONICAL_HOST: &str = "//instagram.com";

/// Media size variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSize {
    /// Full size.
    Large,
    /// Medium size.
    Medium,
    /// Thumbnail.
    Thumbnail,
}

impl MediaSize {
    /// Path and query appended to the permalink.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Large => "media/?size=l",
            Self::Medium => "media/?size=m",
            Self::Thumbnail => "media/?size=t",
        }
    }
}

/// Rewrite `http:` to `https:` and the legacy host to its canonical name.
#[must_use]
pub fn secure_url(url: &str) -> Cow<'_, str> {
    let https = match url.strip_prefix("http:") {
        Some(rest) => Cow::Owned(format!("https:{rest}")),
        None => Cow::Borrowed(url),
    };

    if https.contains(LEGACY_HOST) {
        Cow::Owned(https.replacen(LEGACY_HOST, CANONICAL_HOST, 1))
    } else {
        https
    }
}

/// [`secure_url`] over an optional column.
#[must_use]
pub fn secure_url_opt(url: Option<&str>) -> Option<String> {
    url.map(|u| secure_url(u).into_owned())
}

/// Build the URL of a size variant of `base`.
///
/// With `secure`, the base is canonicalized before the suffix is added.
#[must_use]
pub fn media_url(base: &str, size: MediaSize, secure: bool) -> String {
    let base = if secure {
        secure_url(base)
    } else {
        Cow::Borrowed(base)
    };

    let mut url = base.into_owned();
    if !url.ends_with('/') {
        url.push('/');
    }
    url.push_str(size.suffix());
    url
}
