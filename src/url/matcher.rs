/// Checks whether a host belongs to an allowed domain
///
/// A host matches when it equals the domain exactly or ends with
/// `.<domain>` (any depth of subdomain). This is deliberately not a
/// substring match: `notexample.com` does not belong to `example.com`.
///
/// # Examples
///
/// ```
/// use burrow::url::matches_domain;
///
/// assert!(matches_domain("example.com", "example.com"));
/// assert!(matches_domain("example.com", "blog.example.com"));
/// assert!(!matches_domain("example.com", "notexample.com"));
/// ```
pub fn matches_domain(domain: &str, host: &str) -> bool {
    if domain.is_empty() {
        return false;
    }
    host == domain || host.ends_with(&format!(".{}", domain))
}
