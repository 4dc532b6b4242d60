//! Cache-key URL normalization.
//!
//! Invariant: two URLs differing only by scheme or a trailing slash must map
//! to the same cache key. The scheme is always forced to `https` and exactly
//! one trailing slash is stripped.

/// Normalize a raw URL into its cache-key form.
///
/// - prefixes `https://` when no scheme is present
/// - rewrites an `http://` (any case) scheme to `https://`
/// - strips one trailing slash
#[must_use]
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let rest = without_scheme(trimmed);
    let mut url = format!("https://{rest}");
    if url.ends_with('/') {
        url.pop();
    }
    url
}

/// Normalize a raw URL into a fetchable form.
///
/// Unlike [`normalize_url`] this preserves an explicit `http://` scheme —
/// an http-only site must still be probed over http. Schemeless input gets
/// `https://` and one trailing slash is stripped, same as the cache key.
#[must_use]
pub fn fetch_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    let mut url = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };
    if url.ends_with('/') {
        url.pop();
    }
    url
}

/// The URL with its `http(s)://` prefix removed, scheme-case-insensitively.
fn without_scheme(url: &str) -> &str {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("https://") {
        &url[8..]
    } else if lower.starts_with("http://") {
        &url[7..]
    } else {
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_domain_gets_https_prefix() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
    }

    #[test]
    fn scheme_variants_share_one_key() {
        for raw in [
            "example.com",
            "http://example.com",
            "https://example.com",
            "HTTP://example.com",
            "https://example.com/",
            "http://example.com/",
        ] {
            assert_eq!(normalize_url(raw), "https://example.com", "raw: {raw}");
        }
    }

    #[test]
    fn only_one_trailing_slash_is_stripped() {
        assert_eq!(normalize_url("example.com//"), "https://example.com/");
    }

    #[test]
    fn path_is_preserved() {
        assert_eq!(
            normalize_url("example.com/about/"),
            "https://example.com/about"
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(normalize_url("  example.com "), "https://example.com");
    }

    #[test]
    fn fetch_url_preserves_an_explicit_http_scheme() {
        assert_eq!(fetch_url("http://example.com/"), "http://example.com");
        assert_eq!(fetch_url("https://example.com"), "https://example.com");
        assert_eq!(fetch_url("example.com"), "https://example.com");
    }
}
