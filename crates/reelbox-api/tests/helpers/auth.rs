use jsonwebtoken::{encode, EncodingKey, Header};
use reelbox_api::auth::JwtClaims;

/// Must match the secret in `test_config`.
pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";

pub const TEST_SUBJECT: &str = "user_test_123";

/// Session token for `sub`, valid for an hour.
pub fn session_token(sub: &str) -> String {
    token_expiring_in(sub, 3600)
}

pub fn token_expiring_in(sub: &str, seconds: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = JwtClaims {
        sub: sub.to_string(),
        exp: now + seconds,
        iat: Some(now),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}

/// `Authorization` header value for the default test subject.
pub fn bearer() -> String {
    format!("Bearer {}", session_token(TEST_SUBJECT))
}
