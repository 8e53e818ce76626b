//! Error types for credential issuance.

use thiserror::Error;

/// Credential-specific errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Issuer name or signing key is unusable.
    #[error("invalid auth configuration: {0}")]
    Configuration(String),

    /// Signing the token failed.
    #[error("failed to sign access token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Token signature, issuer or expiry did not verify.
    #[error("access token rejected: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    /// Token verified but is not an access token.
    #[error("unexpected token type: {0}")]
    WrongTokenType(String),
}

/// Result type for credential operations.
pub type AuthResult<T> = Result<T, AuthError>;
