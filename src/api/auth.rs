// Credential handling for the Cloudflare API.
// Reads an API token, or the legacy global key + email pair, from the environment.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use crate::error::{CfError, Result};

/// Authentication material taken from the environment.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Scoped API token (preferred): `CLOUDFLARE_API_TOKEN`.
    Token(String),
    /// Legacy global key: `CLOUDFLARE_API_KEY` + `CLOUDFLARE_EMAIL`.
    KeyEmail { key: String, email: String },
}

impl Credentials {
    /// Read credentials from the environment. The token wins when both
    /// schemes are configured.
    pub fn from_env() -> Result<Self> {
        if let Ok(token) = std::env::var("CLOUDFLARE_API_TOKEN") {
            if !token.is_empty() {
                return Ok(Credentials::Token(token));
            }
        }

        match (
            std::env::var("CLOUDFLARE_API_KEY"),
            std::env::var("CLOUDFLARE_EMAIL"),
        ) {
            (Ok(key), Ok(email)) if !key.is_empty() && !email.is_empty() => {
                Ok(Credentials::KeyEmail { key, email })
            }
            _ => Err(CfError::MissingCredentials),
        }
    }

    /// Authentication headers for this credential scheme.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        match self {
            Credentials::Token(token) => {
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {token}"))
                        .map_err(|e| CfError::Other(e.to_string()))?,
                );
            }
            Credentials::KeyEmail { key, email } => {
                headers.insert(
                    "X-Auth-Key",
                    HeaderValue::from_str(key).map_err(|e| CfError::Other(e.to_string()))?,
                );
                headers.insert(
                    "X-Auth-Email",
                    HeaderValue::from_str(email).map_err(|e| CfError::Other(e.to_string()))?,
                );
            }
        }

        Ok(headers)
    }

    /// Human-readable description of the scheme in use.
    pub fn describe(&self) -> &'static str {
        match self {
            Credentials::Token(_) => "Using API Token authentication",
            Credentials::KeyEmail { .. } => "Using API Key + Email authentication",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_headers() {
        let credentials = Credentials::Token("abc123".to_string());

        let headers = credentials.headers().unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer abc123");
        assert!(!headers.contains_key("X-Auth-Key"));
    }

    #[test]
    fn test_key_email_headers() {
        let credentials = Credentials::KeyEmail {
            key: "deadbeef".to_string(),
            email: "admin@example.com".to_string(),
        };

        let headers = credentials.headers().unwrap();
        assert_eq!(headers["X-Auth-Key"], "deadbeef");
        assert_eq!(headers["X-Auth-Email"], "admin@example.com");
        assert!(!headers.contains_key(AUTHORIZATION));
    }

    #[test]
    fn test_invalid_header_value() {
        let credentials = Credentials::Token("line\nbreak".to_string());
        assert!(credentials.headers().is_err());
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            Credentials::Token(String::new()).describe(),
            "Using API Token authentication"
        );
        assert_eq!(
            Credentials::KeyEmail {
                key: String::new(),
                email: String::new()
            }
            .describe(),
            "Using API Key + Email authentication"
        );
    }
}
