//! Access-token issuance and verification.
//!
//! The replication engine asks a [`ConsoleClient`] for a token whenever it
//! needs to (re)authenticate. [`MockConsoleClient`] answers locally by
//! signing the token itself, so tests never reach a live auth service.

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How far `iat` is backdated, in seconds.
pub const ISSUED_AT_SKEW_SECS: i64 = 1000;

/// Lifetime of an access token, counted from signing time (2 hours).
pub const TOKEN_TTL_SECS: i64 = 2 * 60 * 60;

/// Value of the `type` claim on access tokens.
pub const ACCESS_TOKEN_TYPE: &str = "access";

/// Request for a fresh credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    pub app: String,
    pub env: String,
    pub client_id: String,
}

impl TokenRequest {
    /// A request carrying only a client id.
    pub fn for_client(client_id: impl Into<String>) -> Self {
        Self {
            app: String::new(),
            env: String::new(),
            client_id: client_id.into(),
        }
    }
}

/// A signed access token and its refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    /// Always empty: the refresh flow is never exercised.
    pub refresh_token: String,
}

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// The client the token was issued to.
    pub user_id: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub iat: i64,
    pub iss: String,
    pub exp: i64,
}

/// Source of credentials for the replication engine.
#[async_trait]
pub trait ConsoleClient: Send + Sync {
    /// Returns a fresh credential for the requesting client.
    ///
    /// # Errors
    ///
    /// Failures are returned as-is; the caller treats them as fatal.
    async fn token(&self, request: &TokenRequest) -> AuthResult<TokenResponse>;
}

/// Signs access tokens locally with a shared development key.
#[derive(Debug, Clone, Default)]
pub struct MockConsoleClient {
    config: AuthConfig,
}

impl MockConsoleClient {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// The signing configuration in use.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Issues a token signed now.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] for a blank issuer or key and
    /// [`AuthError::Signing`] if encoding fails.
    pub fn issue(&self, request: &TokenRequest) -> AuthResult<TokenResponse> {
        self.issue_at(request, chrono::Utc::now().timestamp())
    }

    /// Issues a token as if signed at `now` (unix seconds).
    pub fn issue_at(&self, request: &TokenRequest, now: i64) -> AuthResult<TokenResponse> {
        self.config.validate()?;

        let claims = AccessClaims {
            user_id: request.client_id.clone(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            iat: now - ISSUED_AT_SKEW_SECS,
            iss: self.config.issuer.clone(),
            exp: now + TOKEN_TTL_SECS,
        };
        let key = EncodingKey::from_secret(self.config.signing_key.as_bytes());
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
            .map_err(AuthError::Signing)?;

        debug!("Issued mock access token for client {}", request.client_id);
        Ok(TokenResponse {
            token,
            refresh_token: String::new(),
        })
    }
}

#[async_trait]
impl ConsoleClient for MockConsoleClient {
    async fn token(&self, request: &TokenRequest) -> AuthResult<TokenResponse> {
        self.issue(request)
    }
}

/// Verifies an access token against the configured issuer and key.
///
/// Checks the HS256 signature, `iss`, `exp` (with the library's default
/// leeway) and that `type` is `"access"`.
///
/// # Errors
///
/// Returns [`AuthError::InvalidToken`] when decoding or any standard check
/// fails, and [`AuthError::WrongTokenType`] for non-access tokens.
pub fn verify_access_token(token: &str, config: &AuthConfig) -> AuthResult<AccessClaims> {
    config.validate()?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.issuer.as_str()]);
    let key = DecodingKey::from_secret(config.signing_key.as_bytes());
    let data = jsonwebtoken::decode::<AccessClaims>(token, &key, &validation)
        .map_err(AuthError::InvalidToken)?;

    if data.claims.token_type != ACCESS_TOKEN_TYPE {
        return Err(AuthError::WrongTokenType(data.claims.token_type));
    }
    Ok(data.claims)
}
