use crate::auth::gate::{decide, GateDecision};
use crate::auth::models::{AuthSubject, JwtClaims};
use crate::auth::routes::RouteTable;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use reelbox_core::AppError;
use std::sync::Arc;

/// Cookie carrying the session token for browser requests
pub const SESSION_COOKIE: &str = "__session";

/// Session verification and route table shared by the gate middleware
#[derive(Clone)]
pub struct AuthState {
    decoding_key: DecodingKey,
    validation: Validation,
    route_table: Arc<RouteTable>,
}

impl AuthState {
    pub fn new(jwt_secret: &str, route_table: Arc<RouteTable>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
            route_table,
        }
    }

    pub fn route_table(&self) -> &RouteTable {
        &self.route_table
    }

    /// Resolve the caller from a token. Any verification failure means "no subject".
    pub fn resolve_subject(&self, token: &str) -> Option<AuthSubject> {
        match decode::<JwtClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) if !data.claims.sub.trim().is_empty() => Some(AuthSubject {
                subject: data.claims.sub,
            }),
            Ok(_) => {
                tracing::debug!("Session token has an empty subject");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "Session token rejected");
                None
            }
        }
    }
}

/// Session token from `Authorization: Bearer ...`, falling back to the session cookie.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Access gate: classifies the path, resolves the subject and enforces the decision.
pub async fn access_gate_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let subject = extract_token(request.headers()).and_then(|t| auth_state.resolve_subject(&t));
    let path = request.uri().path().to_string();

    match decide(
        auth_state.route_table(),
        &path,
        subject.as_ref().map(|s| s.subject.as_str()),
    ) {
        GateDecision::Allow => {
            if let Some(subject) = subject {
                request.extensions_mut().insert(subject);
            }
            next.run(request).await
        }
        GateDecision::RedirectTo(location) => {
            tracing::debug!(path = %path, location = %location, "Access gate redirect");
            Redirect::temporary(&location).into_response()
        }
        GateDecision::Unauthorized => HttpAppError(AppError::Unauthorized(
            "Authentication required".to_string(),
        ))
        .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-key-min-32-characters-long";

    fn token(secret: &str, sub: &str, exp_offset: i64) -> String {
        let claims = JwtClaims {
            sub: sub.to_string(),
            exp: chrono::Utc::now().timestamp() + exp_offset,
            iat: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn state() -> AuthState {
        AuthState::new(SECRET, Arc::new(RouteTable::default_table()))
    }

    #[test]
    fn test_valid_token_resolves_subject() {
        let subject = state().resolve_subject(&token(SECRET, "user_1", 3600));
        assert_eq!(subject.unwrap().subject, "user_1");
    }

    #[test]
    fn test_bad_tokens_resolve_to_no_subject() {
        let state = state();
        assert!(state.resolve_subject("not-a-jwt").is_none());
        assert!(state
            .resolve_subject(&token("another-secret-that-is-32-chars-long!", "user_1", 3600))
            .is_none());
        assert!(state.resolve_subject(&token(SECRET, "user_1", -60)).is_none());
        assert!(state.resolve_subject(&token(SECRET, "", 3600)).is_none());
    }

    #[test]
    fn test_token_from_bearer_header_or_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; __session=cookie-token"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("cookie-token"));

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer header-token"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("header-token"));

        assert!(extract_token(&HeaderMap::new()).is_none());
    }
}
