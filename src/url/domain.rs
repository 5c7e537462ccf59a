use url::Url;

/// Extracts the registrable domain from a URL for scope derivation
///
/// The host is already lowercased by the parser; a leading `www.` is
/// dropped so that seed URLs on either the apex or the `www` host produce
/// the same allowed-domain entry.
///
/// # Examples
///
/// ```
/// use burrow::url::extract_domain;
/// use url::Url;
///
/// let url = Url::parse("https://www.example.com/page").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let domain = host.strip_prefix("www.").unwrap_or(host);
    if domain.is_empty() {
        return None;
    }
    Some(domain.to_string())
}
