use super::*;

// =============================================================================
// parse_bool
// =============================================================================

#[test]
fn parse_bool_truthy_values() {
    for raw in ["1", "true", "yes", "on", " TRUE ", "Yes"] {
        assert_eq!(parse_bool(raw), Some(true), "{raw}");
    }
}

#[test]
fn parse_bool_falsy_values() {
    for raw in ["0", "false", "no", "off", " FALSE "] {
        assert_eq!(parse_bool(raw), Some(false), "{raw}");
    }
}

#[test]
fn parse_bool_garbage_is_none() {
    assert_eq!(parse_bool(""), None);
    assert_eq!(parse_bool("maybe"), None);
    assert_eq!(parse_bool("2"), None);
}

// =============================================================================
// cookies
// =============================================================================

#[test]
fn session_cookie_attributes() {
    let cookie = session_cookie("abc123".into(), true);
    assert_eq!(cookie.name(), "session_token");
    assert_eq!(cookie.value(), "abc123");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
}

#[test]
fn session_cookie_insecure_for_plain_http() {
    let cookie = session_cookie("abc123".into(), false);
    assert_eq!(cookie.secure(), Some(false));
}

#[test]
fn clear_cookie_expires_immediately() {
    let cookie = clear_session_cookie(false);
    assert_eq!(cookie.name(), "session_token");
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
}

// =============================================================================
// error mapping
// =============================================================================

#[test]
fn password_errors_map_to_statuses() {
    let cases = [
        (PasswordError::InvalidEmail, StatusCode::BAD_REQUEST),
        (PasswordError::EmailTaken, StatusCode::CONFLICT),
        (PasswordError::WeakPassword, StatusCode::BAD_REQUEST),
        (PasswordError::InvalidCode, StatusCode::BAD_REQUEST),
        (PasswordError::VerificationFailed, StatusCode::BAD_REQUEST),
    ];
    for (err, expected) in cases {
        assert_eq!(password_error_response(&err, Lang::He).status(), expected);
    }
}

#[test]
fn delivery_failure_maps_to_internal() {
    let err = PasswordError::EmailDelivery("provider down".into());
    assert_eq!(
        password_error_response(&err, Lang::He).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

// =============================================================================
// request bodies
// =============================================================================

#[test]
fn signup_body_display_name_is_optional() {
    let body: SignupBody =
        serde_json::from_str(r#"{"email":"dana@example.com","password":"12345678"}"#).unwrap();
    assert_eq!(body.email, "dana@example.com");
    assert!(body.display_name.is_none());
}

#[test]
fn reset_body_deserializes() {
    let body: ResetPasswordBody = serde_json::from_str(
        r#"{"email":"dana@example.com","code":"ABC234","new_password":"new-password-1"}"#,
    )
    .unwrap();
    assert_eq!(body.code, "ABC234");
}
