//! Endpoint resolution from form ids or URLs

use crate::error::{Error, Result};
use url::Url;

/// Default base for short form ids
pub const DEFAULT_BASE_URL: &str = "https://public.herotofu.com/v1";

/// Maps a form id or full URL to the submission endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResolver {
    base: String,
}

impl Default for EndpointResolver {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl EndpointResolver {
    /// Resolver with a custom base URL (e.g. a self-hosted or mock endpoint)
    pub fn with_base(base: &str) -> Result<Self> {
        let base = base.trim().trim_end_matches('/');
        if !is_url(base) {
            return Err(Error::Config(format!("invalid base URL: {base}")));
        }
        Ok(Self {
            base: base.to_string(),
        })
    }

    /// Base URL used for short ids
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolve a form id or URL
    ///
    /// Anything already shaped like an http(s) URL is returned unchanged.
    pub fn resolve(&self, form_id_or_url: &str) -> String {
        if is_url(form_id_or_url) {
            return form_id_or_url.to_string();
        }
        format!(
            "{}/{}",
            self.base,
            urlencoding::encode(form_id_or_url.trim())
        )
    }
}

/// Resolve against the default base URL
pub fn resolve_endpoint(form_id_or_url: &str) -> String {
    EndpointResolver::default().resolve(form_id_or_url)
}

fn is_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .ok()
        .is_some_and(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_short_id() {
        assert_eq!(
            resolve_endpoint("test-id"),
            "https://public.herotofu.com/v1/test-id"
        );
    }

    #[test]
    fn test_resolve_uuid_id() {
        assert_eq!(
            resolve_endpoint("00000000-1111-2222-3333-444444444444"),
            "https://public.herotofu.com/v1/00000000-1111-2222-3333-444444444444"
        );
    }

    #[test]
    fn test_resolve_full_url_unchanged() {
        let url = "https://forms.example.com/custom/endpoint?x=1";
        assert_eq!(resolve_endpoint(url), url);
    }

    #[test]
    fn test_resolve_http_url_unchanged() {
        assert_eq!(
            resolve_endpoint("http://127.0.0.1:8080/v1/abc"),
            "http://127.0.0.1:8080/v1/abc"
        );
    }

    #[test]
    fn test_non_http_scheme_treated_as_id() {
        // "mailto:x" parses as a URL but is not an endpoint
        assert_eq!(
            resolve_endpoint("mailto:x"),
            "https://public.herotofu.com/v1/mailto%3Ax"
        );
    }

    #[test]
    fn test_custom_base_trims_trailing_slash() {
        let resolver = EndpointResolver::with_base("http://localhost:1234/v1/").unwrap();
        assert_eq!(resolver.resolve("abc"), "http://localhost:1234/v1/abc");
    }

    #[test]
    fn test_invalid_base_rejected() {
        assert!(matches!(
            EndpointResolver::with_base("not a url"),
            Err(Error::Config(_))
        ));
    }
}
