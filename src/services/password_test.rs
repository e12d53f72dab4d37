use super::*;

// =============================================================================
// normalize_email
// =============================================================================

#[test]
fn normalize_email_lowercases_and_trims() {
    assert_eq!(normalize_email("  Dana@Example.COM "), Some("dana@example.com".into()));
}

#[test]
fn normalize_email_rejects_missing_at() {
    assert_eq!(normalize_email("dana.example.com"), None);
}

#[test]
fn normalize_email_rejects_empty_halves() {
    assert_eq!(normalize_email("@example.com"), None);
    assert_eq!(normalize_email("dana@"), None);
    assert_eq!(normalize_email(""), None);
}

#[test]
fn normalize_email_rejects_double_at() {
    assert_eq!(normalize_email("a@b@c"), None);
}

// =============================================================================
// password hashing
// =============================================================================

#[test]
fn validate_password_minimum_length() {
    assert!(validate_password("short").is_err());
    assert!(validate_password("1234567").is_err());
    assert!(validate_password("12345678").is_ok());
}

#[test]
fn validate_password_counts_chars_not_bytes() {
    // 8 Hebrew letters: 16 bytes but 8 chars.
    assert!(validate_password("אבגדהוזח").is_ok());
}

#[test]
fn generate_salt_is_32_hex_chars() {
    let salt = generate_salt();
    assert_eq!(salt.len(), 32);
    assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn hash_password_is_deterministic_per_salt() {
    let salt = "00ff00ff";
    assert_eq!(hash_password("secret123", salt), hash_password("secret123", salt));
}

#[test]
fn hash_password_differs_by_salt() {
    assert_ne!(hash_password("secret123", "aa"), hash_password("secret123", "bb"));
}

#[test]
fn hash_password_differs_by_password() {
    assert_ne!(hash_password("secret123", "aa"), hash_password("secret124", "aa"));
}

#[test]
fn verify_password_round_trip() {
    let salt = generate_salt();
    let hash = hash_password("sufficiently-long", &salt);
    assert!(verify_password("sufficiently-long", &salt, &hash));
    assert!(!verify_password("wrong-password", &salt, &hash));
}

// =============================================================================
// name_from_email
// =============================================================================

#[test]
fn name_from_email_takes_local_part() {
    assert_eq!(name_from_email("dana@example.com"), "dana");
}

#[test]
fn name_from_email_falls_back_for_degenerate_input() {
    assert_eq!(name_from_email(""), "user");
    assert_eq!(name_from_email("  @example.com"), "user");
}

// =============================================================================
// reset codes
// =============================================================================

#[test]
fn generate_reset_code_shape() {
    let code = generate_reset_code();
    assert_eq!(code.len(), 6);
    assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
}

#[test]
fn normalize_code_uppercases() {
    assert_eq!(normalize_code("abc234"), Some("ABC234".into()));
}

#[test]
fn normalize_code_rejects_wrong_length() {
    assert_eq!(normalize_code("ABC23"), None);
    assert_eq!(normalize_code("ABC2345"), None);
}

#[test]
fn normalize_code_rejects_ambiguous_chars() {
    // 0, 1, I and O are not in the alphabet.
    assert_eq!(normalize_code("ABC201"), None);
    assert_eq!(normalize_code("ABCIO2"), None);
}

#[test]
fn hash_reset_code_is_sha256_hex() {
    let hash = hash_reset_code("ABC234");
    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(hash, hash_reset_code("ABC234"));
}

// =============================================================================
// reset email body
// =============================================================================

#[test]
fn reset_email_contains_code_and_rtl_direction() {
    let html = render_reset_email("ABC234");
    assert!(html.contains("ABC234"));
    assert!(html.contains("dir=\"rtl\""));
}
