//! HTTP request options and payloads

use crate::cookie::Cookie;
use crate::error::{ReqHelperError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;
use std::time::Duration;

/// Per-call parameters shared by every request operation.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers. Each one replaces any value already set under that name.
    pub headers: HashMap<String, String>,
    pub cookies: Vec<Cookie>,
    /// Sent verbatim as the `Authorization` header.
    pub authorization: Option<String>,
    /// Deadline for the whole request, overriding the session timeout.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_cookies(mut self, cookies: Vec<Cookie>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn with_authorization(mut self, authorization: impl Into<String>) -> Self {
        self.authorization = Some(authorization.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Convert the extra headers into a typed header map.
    pub(crate) fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (key, value) in &self.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                ReqHelperError::RequestConstruction(format!("Invalid header name '{}': {}", key, e))
            })?;
            map.insert(name, header_value(key, value)?);
        }
        Ok(map)
    }

    /// Value of a caller-supplied `Cookie` header, if any.
    pub(crate) fn cookie_header(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("cookie"))
            .map(|(_, value)| value.as_str())
    }
}

pub(crate) fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| {
        ReqHelperError::RequestConstruction(format!("Invalid value for header '{}': {}", name, e))
    })
}

/// What goes into the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// No body at all.
    Empty,
    Bytes(Vec<u8>),
    /// A single `multipart/form-data` text field.
    Multipart { field_name: String, value: Vec<u8> },
}

impl Payload {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Payload::Empty => "empty",
            Payload::Bytes(_) => "bytes",
            Payload::Multipart { .. } => "multipart",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RequestOptions;
    use crate::error::ReqHelperError;
    use reqwest::header::CONTENT_TYPE;

    #[test]
    fn header_map_validates_names() {
        let options = RequestOptions::new()
            .with_header("Content-Type", "application/json")
            .with_header("X-Trace", "abc");
        let map = options.header_map().expect("valid headers");
        assert_eq!(map.len(), 2);
        assert_eq!(map[CONTENT_TYPE], "application/json");

        let bad = RequestOptions::new().with_header("Bad Header", "x");
        let err = bad.header_map().expect_err("space in header name");
        assert!(matches!(err, ReqHelperError::RequestConstruction(_)));
    }

    #[test]
    fn header_map_rejects_control_characters_in_values() {
        let bad = RequestOptions::new().with_header("X-Test", "line\nbreak");
        let err = bad.header_map().expect_err("newline in header value");
        assert!(matches!(err, ReqHelperError::RequestConstruction(_)));
    }

    #[test]
    fn cookie_header_lookup_is_case_insensitive() {
        let options = RequestOptions::new().with_header("cookie", "lang=en");
        assert_eq!(options.cookie_header(), Some("lang=en"));
        assert_eq!(RequestOptions::new().cookie_header(), None);
    }
}
