//! URL normalization and probe candidate expansion.
//!
//! Users submit links in many shapes (`example.com`, ` https://example.com `,
//! `wikipedia.org`). Before probing, input is normalized and, for bare
//! second-level domains, expanded with a `www.` variant.

use url::{Host, Url};

/// Scheme assumed when the input has none.
const DEFAULT_SCHEME: &str = "https://";

/// Normalizes raw link input into a probeable URL.
///
/// # Normalization Rules
///
/// 1. Surrounding whitespace is trimmed
/// 2. Input without an `http://` or `https://` prefix gets `https://`
///
/// The rest of the URL is kept verbatim.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("  example.com "), "https://example.com");
/// assert_eq!(normalize_url("http://example.com"), "http://example.com");
/// ```
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{trimmed}")
    }
}

/// Expands raw input into the ordered list of URLs to probe.
///
/// # Candidate Rules
///
/// - Hostnames with more than one dot (`docs.rs.example`, `www.example.com`)
///   are treated as fully qualified: only the normalized URL is tried
/// - Otherwise the normalized URL is tried first, then a `www.`-prefixed
///   variant unless the host already starts with `www.`
/// - IP literals and unparsable input yield only the normalized string
pub fn candidate_urls(raw: &str) -> Vec<String> {
    let main = normalize_url(raw);

    let host = match Url::parse(&main) {
        Ok(parsed) => match parsed.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            _ => return vec![main],
        },
        Err(_) => return vec![main],
    };

    if host.matches('.').count() > 1 || host.starts_with("www.") {
        return vec![main];
    }

    let with_www = main.replacen("://", "://www.", 1);
    vec![main, with_www]
}

fn has_http_scheme(input: &str) -> bool {
    let lower = input.get(..8).unwrap_or(input).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_https() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize_url("  https://example.com/path \n"), "https://example.com/path");
    }

    #[test]
    fn test_normalize_keeps_http() {
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
    }

    #[test]
    fn test_normalize_scheme_case_insensitive() {
        assert_eq!(normalize_url("HTTPS://Example.com"), "HTTPS://Example.com");
    }

    #[test]
    fn test_bare_domain_gets_www_variant() {
        assert_eq!(
            candidate_urls("wikipedia.org"),
            vec!["https://wikipedia.org", "https://www.wikipedia.org"]
        );
    }

    #[test]
    fn test_bare_domain_with_scheme_and_path() {
        assert_eq!(
            candidate_urls("http://link1.com/page"),
            vec!["http://link1.com/page", "http://www.link1.com/page"]
        );
    }

    #[test]
    fn test_subdomain_is_fully_qualified() {
        assert_eq!(
            candidate_urls("https://docs.example.com"),
            vec!["https://docs.example.com"]
        );
    }

    #[test]
    fn test_www_host_not_duplicated() {
        assert_eq!(
            candidate_urls("https://www.example.com"),
            vec!["https://www.example.com"]
        );
    }

    #[test]
    fn test_single_label_host() {
        assert_eq!(
            candidate_urls("http://localhost:8080"),
            vec!["http://localhost:8080", "http://www.localhost:8080"]
        );
    }

    #[test]
    fn test_ip_host_has_no_variant() {
        assert_eq!(candidate_urls("http://[::1]:3000"), vec!["http://[::1]:3000"]);
    }

    #[test]
    fn test_unparsable_input() {
        assert_eq!(candidate_urls("http://exa mple.com"), vec!["http://exa mple.com"]);
    }
}
