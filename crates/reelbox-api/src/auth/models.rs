use crate::error::HttpAppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use reelbox_core::AppError;
use serde::{Deserialize, Serialize};

/// Session token claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Opaque user id
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Authenticated caller, stored in request extensions by the access gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSubject {
    pub subject: String,
}

impl<S> FromRequestParts<S> for AuthSubject
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthSubject>()
            .cloned()
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(
                    "Authentication required".to_string(),
                ))
            })
    }
}
