//! Session credentials.

use std::fmt;

use serde::Deserialize;
use zeroize::Zeroize;

/// Bearer token plus optional refresh token.
///
/// Both secrets are wiped from memory when the session is dropped.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    token: String,

    #[serde(default)]
    refresh_token: Option<String>,
}

impl Session {
    /// Create a session from a bearer token and optional refresh token.
    pub fn new(token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            token: token.into(),
            refresh_token,
        }
    }

    /// Bearer token sent with every request.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Refresh token used when the bearer token expires.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.token.zeroize();
        self.refresh_token.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secrets() {
        let session = Session::new("secret-token", Some("secret-refresh".to_string()));
        let debug = format!("{session:?}");

        assert!(!debug.contains("secret"), "leaked secret in {debug}");
    }
}
