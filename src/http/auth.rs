//! Authorization header values

use base64::Engine;

/// Builders for values passed as `RequestOptions::authorization`.
pub struct Auth;

impl Auth {
    /// Create basic auth header value
    pub fn basic_auth(username: &str, password: &str) -> String {
        let credentials = format!("{}:{}", username, password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
        format!("Basic {}", encoded)
    }

    /// Create bearer token header value
    pub fn bearer_token(token: &str) -> String {
        format!("Bearer {}", token)
    }
}

#[cfg(test)]
mod tests {
    use super::Auth;

    #[test]
    fn basic_auth_encodes_credentials() {
        assert_eq!(Auth::basic_auth("user", "pass"), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn bearer_token_prefixes_scheme() {
        assert_eq!(Auth::bearer_token("abc"), "Bearer abc");
    }
}
