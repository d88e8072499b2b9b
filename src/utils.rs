//! Utility functions and helpers

use crate::error::{ReqHelperError, Result};
use url::Url;

/// URL utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Concatenate host and path verbatim. Nothing is escaped or normalized.
    pub fn join(host: &str, path: &str) -> String {
        format!("{}{}", host, path)
    }

    /// Parse an absolute URL
    pub fn validate_url(input: &str) -> Result<Url> {
        Url::parse(input).map_err(|e| {
            ReqHelperError::RequestConstruction(format!("Invalid URL '{}': {}", input, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::UrlUtils;
    use crate::error::ReqHelperError;

    #[test]
    fn join_does_not_normalize() {
        assert_eq!(
            UrlUtils::join("http://localhost:8080", "/login"),
            "http://localhost:8080/login"
        );
        assert_eq!(
            UrlUtils::join("http://localhost:8080/", "/login"),
            "http://localhost:8080//login"
        );
    }

    #[test]
    fn validate_url_requires_scheme() {
        let err = UrlUtils::validate_url("example.com/path").expect_err("relative url");
        assert!(matches!(err, ReqHelperError::RequestConstruction(_)));

        let url = UrlUtils::validate_url("https://example.com/path").expect("valid url");
        assert_eq!(url.path(), "/path");
    }
}
