//! Configuration management for reqhelper sessions

use std::time::Duration;

/// Settings used to build the transport client of a [`crate::Session`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: Option<String>,
    pub follow_redirects: bool,
    pub max_redirects: u32,
    /// Let the client decode compressed bodies itself. When enabled the
    /// `Content-Encoding` header is stripped and `read_body` passes bytes through.
    pub transparent_decompression: bool,
    /// Only send `Authorization` when the request also carries cookies.
    pub auth_requires_cookies: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: Some(format!("reqhelper/{}", crate::VERSION)),
            follow_redirects: false,
            max_redirects: 10,
            transparent_decompression: false,
            auth_requires_cookies: false,
        }
    }
}
