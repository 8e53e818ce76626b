use satellite_auth::AuthError;

#[test]
fn error_display_configuration() {
    let err = AuthError::Configuration("issuer must not be blank".into());
    let msg = format!("{err}");
    assert!(msg.contains("invalid auth configuration"));
    assert!(msg.contains("issuer"));
}

#[test]
fn error_display_wrong_type() {
    let err = AuthError::WrongTokenType("refresh".into());
    assert!(format!("{err}").contains("refresh"));
}

#[test]
fn error_keeps_jwt_source() {
    use std::error::Error;
    let jwt_err = jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidToken);
    let err = AuthError::InvalidToken(jwt_err);
    assert!(err.source().is_some());
}
