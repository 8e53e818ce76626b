//! Shared test helpers for credential tests.

#![allow(dead_code)]

use satellite_auth::{AccessClaims, AuthConfig, MockConsoleClient, TokenRequest};

/// Current unix time in seconds.
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// A configuration distinct from the defaults.
pub fn custom_config() -> AuthConfig {
    AuthConfig::new("auth.test.local", "another-signing-key")
}

/// Issues a token for `client_id` with the default configuration.
pub fn issue_default(client_id: &str) -> String {
    MockConsoleClient::default()
        .issue(&TokenRequest::for_client(client_id))
        .unwrap()
        .token
}

/// Signs arbitrary claims with the given configuration's key.
pub fn sign_claims(claims: &AccessClaims, config: &AuthConfig) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        claims,
        &jsonwebtoken::EncodingKey::from_secret(config.signing_key.as_bytes()),
    )
    .unwrap()
}
