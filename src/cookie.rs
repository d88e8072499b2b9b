//! Cookie threading between requests
//!
//! There is no persistent jar. Every call merges the cookies set by the server
//! with the ones the caller sent, and hands the result back so the caller can
//! pass it into the next request.

use std::time::UNIX_EPOCH;

/// A cookie sent by the caller or set by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    /// Expiry as seconds since the Unix epoch.
    pub expires: Option<i64>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            secure: false,
            http_only: false,
            expires: None,
        }
    }
}

impl From<reqwest::cookie::Cookie<'_>> for Cookie {
    fn from(cookie: reqwest::cookie::Cookie<'_>) -> Self {
        let expires = cookie
            .expires()
            .and_then(|at| at.duration_since(UNIX_EPOCH).ok())
            .and_then(|since| i64::try_from(since.as_secs()).ok());

        Self {
            name: cookie.name().to_string(),
            value: cookie.value().to_string(),
            domain: cookie.domain().map(str::to_string),
            path: cookie.path().map(str::to_string),
            secure: cookie.secure(),
            http_only: cookie.http_only(),
            expires,
        }
    }
}

/// Merge server-set cookies with the caller's.
///
/// Server cookies take priority; a caller cookie is kept only when no server
/// cookie has the same name. A name appearing twice among the server cookies
/// keeps its last value. Server cookies come first, in order of first
/// appearance, followed by the surviving caller cookies.
pub fn merge_cookies(server: Vec<Cookie>, caller: &[Cookie]) -> Vec<Cookie> {
    let mut merged: Vec<Cookie> = Vec::with_capacity(server.len() + caller.len());

    for cookie in server {
        match merged.iter_mut().find(|c| c.name == cookie.name) {
            Some(existing) => *existing = cookie,
            None => merged.push(cookie),
        }
    }

    for cookie in caller {
        if !merged.iter().any(|c| c.name == cookie.name) {
            merged.push(cookie.clone());
        }
    }

    merged
}

/// Convert cookies to `Cookie` header format
pub fn cookie_header(cookies: &[Cookie]) -> String {
    cookies
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; ")
}
