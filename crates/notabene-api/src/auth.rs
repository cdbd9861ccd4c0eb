//! Bearer-token middleware.
//!
//! Validates JWTs issued by the external identity provider and injects a
//! typed [`OwnerIdentity`] into request extensions. The service issues no
//! credentials of its own; it only verifies the shared-secret signature and
//! the standard expiry claim, then extracts the subject and email claims.
//! Requests lacking a valid token or the required claims are rejected with a
//! request-level error, never a crash.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use notabene_core::OwnerIdentity;

use crate::{ApiError, AppState};

/// Claims carried by the identity provider's access tokens.
///
/// `email` and `preferred_username` are optional in the JWT but `email` is
/// required by this service (it is stored as the reminder recipient), so the
/// middleware rejects tokens without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the owner identifier for all stored records.
    pub sub: String,
    /// Email address, stored as the note's reminder recipient.
    #[serde(default)]
    pub email: Option<String>,
    /// Preferred username, stored on entitlement requests.
    #[serde(default)]
    pub preferred_username: Option<String>,
    /// Expiration (Unix timestamp); enforced during decoding.
    pub exp: i64,
}

/// Decode and validate a bearer token against the IdP's shared secret.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Middleware that requires a valid bearer token on every request.
///
/// 1. Extract `Authorization: Bearer <token>` → 401 if missing/malformed
/// 2. Validate signature and expiry → 401 if invalid
/// 3. Require the `email` claim → 401 if absent
/// 4. Inject [`OwnerIdentity`] into request extensions for handlers
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header format".to_string()))?;

    let claims = decode_token(token, &state.jwt_secret)
        .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {}", e)))?;

    let email = claims
        .email
        .ok_or_else(|| ApiError::Unauthorized("Token is missing the email claim".to_string()))?;

    req.extensions_mut().insert(OwnerIdentity {
        subject: claims.sub,
        email,
        username: claims.preferred_username,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum::{Extension, Router};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use tower::ServiceExt; // for `oneshot`

    const TEST_SECRET: &str = "test-secret-key-minimum-32-chars!!";

    fn test_state() -> AppState {
        crate::AppState::for_tests(TEST_SECRET)
    }

    fn token(claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn claims(email: Option<&str>) -> Claims {
        Claims {
            sub: "user-123".to_string(),
            email: email.map(String::from),
            preferred_username: Some("user".to_string()),
            exp: chrono::Utc::now().timestamp() + 3600,
        }
    }

    async fn whoami(Extension(owner): Extension<OwnerIdentity>) -> String {
        format!("{} <{}>", owner.subject, owner.email)
    }

    fn test_app() -> Router {
        let state = test_state();
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
    }

    async fn call(app: Router, auth_header: Option<String>) -> StatusCode {
        let mut builder = HttpRequest::builder().uri("/whoami");
        if let Some(value) = auth_header {
            builder = builder.header("authorization", value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        assert_eq!(call(test_app(), None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_header_is_unauthorized() {
        let status = call(test_app(), Some("Basic abc123".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let status = call(test_app(), Some("Bearer not.a.jwt".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_secret_is_unauthorized() {
        let token = encode(
            &Header::default(),
            &claims(Some("u@example.com")),
            &EncodingKey::from_secret(b"some-other-secret-entirely-here!!"),
        )
        .unwrap();
        let status = call(test_app(), Some(format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let mut expired = claims(Some("u@example.com"));
        expired.exp = chrono::Utc::now().timestamp() - 3600;
        let status = call(test_app(), Some(format!("Bearer {}", token(&expired)))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_without_email_claim_is_unauthorized() {
        let status = call(test_app(), Some(format!("Bearer {}", token(&claims(None))))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_identity() {
        let app = test_app();
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/whoami")
                    .header(
                        "authorization",
                        format!("Bearer {}", token(&claims(Some("u@example.com")))),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"user-123 <u@example.com>");
    }
}
