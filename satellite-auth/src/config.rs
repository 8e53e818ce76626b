//! Signing configuration for the mock issuer.

use crate::error::{AuthError, AuthResult};
use serde::{Deserialize, Serialize};

/// Issuer used when none is configured.
pub const DEFAULT_ISSUER: &str = "dev.electric-sql.com";

/// Development signing key shared with the integration-test replication service.
pub const DEFAULT_SIGNING_KEY: &str = "integration-tests-signing-key-example";

/// Environment variable overriding the issuer.
pub const SIGNING_ISS_ENV: &str = "SATELLITE_AUTH_SIGNING_ISS";

/// Environment variable overriding the signing key.
pub const SIGNING_KEY_ENV: &str = "SATELLITE_AUTH_SIGNING_KEY";

/// Issuer name and HS256 secret used to sign access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub issuer: String,
    pub signing_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_string(),
            signing_key: DEFAULT_SIGNING_KEY.to_string(),
        }
    }
}

impl AuthConfig {
    pub fn new(issuer: impl Into<String>, signing_key: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            signing_key: signing_key.into(),
        }
    }

    /// Reads [`SIGNING_ISS_ENV`] and [`SIGNING_KEY_ENV`], falling back to the
    /// defaults for unset or empty variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`AuthConfig::from_env`] with a caller-supplied variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            issuer: read(SIGNING_ISS_ENV, DEFAULT_ISSUER),
            signing_key: read(SIGNING_KEY_ENV, DEFAULT_SIGNING_KEY),
        }
    }

    /// Rejects blank issuer names and signing keys.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] naming the blank setting.
    pub fn validate(&self) -> AuthResult<()> {
        if self.issuer.trim().is_empty() {
            return Err(AuthError::Configuration("issuer must not be blank".into()));
        }
        if self.signing_key.trim().is_empty() {
            return Err(AuthError::Configuration(
                "signing key must not be blank".into(),
            ));
        }
        Ok(())
    }
}
