//! Upstream store credential.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Store URL and access token used to authenticate to the upstream platform.
///
/// Loaded once at startup and immutable afterwards. `Debug` redacts the token,
/// so the credential can appear in structured logs without leaking it.
#[derive(Clone)]
pub struct StoreCredential {
    store_url: String,
    access_token: SecretString,
}

impl StoreCredential {
    /// Create a new credential.
    #[must_use]
    pub fn new(store_url: impl Into<String>, access_token: impl Into<SecretString>) -> Self {
        Self {
            store_url: store_url.into(),
            access_token: access_token.into(),
        }
    }

    /// Store URL as configured (e.g. `your-store.myshopify.com`).
    #[must_use]
    pub fn store_url(&self) -> &str {
        &self.store_url
    }

    /// The secret access token.
    #[must_use]
    pub const fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    /// Whether both halves of the credential are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.store_url.trim().is_empty() && !self.access_token.expose_secret().trim().is_empty()
    }
}

impl fmt::Debug for StoreCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreCredential")
            .field("store_url", &self.store_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let credential = StoreCredential::new("test.myshopify.com", "shpat_0f9e8d7c6b5a4321");
        let debug_output = format!("{credential:?}");

        assert!(debug_output.contains("test.myshopify.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("shpat_0f9e8d7c6b5a4321"));
    }

    #[test]
    fn test_is_complete() {
        assert!(StoreCredential::new("test.myshopify.com", "shpat_abc").is_complete());
        assert!(!StoreCredential::new("", "shpat_abc").is_complete());
        assert!(!StoreCredential::new("test.myshopify.com", "  ").is_complete());
    }
}
