//! Mock credential issuance for the satellite test client.
//!
//! The replication service only accepts connections that present a signed
//! access token. In integration tests there is no auth service, so this
//! crate mints the token locally:
//! - [`MockConsoleClient`] signs HS256 tokens for a client id
//! - [`AuthConfig`] carries the issuer name and signing key
//! - [`verify_access_token`] checks a token the way the service does
//!
//! # Token Format
//!
//! Tokens are compact JWTs with the claims
//! `{user_id, type: "access", iat, iss, exp}`. `iat` is backdated by
//! [`ISSUED_AT_SKEW_SECS`] so a verifier whose clock runs behind the test
//! client still accepts the token; `exp` is [`TOKEN_TTL_SECS`] after signing.

mod config;
mod error;
mod token;

pub use config::{AuthConfig, DEFAULT_ISSUER, DEFAULT_SIGNING_KEY, SIGNING_ISS_ENV, SIGNING_KEY_ENV};
pub use error::{AuthError, AuthResult};
pub use token::{
    verify_access_token, AccessClaims, ConsoleClient, MockConsoleClient, TokenRequest,
    TokenResponse, ACCESS_TOKEN_TYPE, ISSUED_AT_SKEW_SECS, TOKEN_TTL_SECS,
};
