//! Authentication and authorization middleware for Axum
//!
//! `auth_middleware` turns a bearer token into an [`AuthenticatedUser`]
//! extension. `require_permission` runs after it on guarded routes and
//! asks the [`PermissionChecker`] whether that user holds one named
//! permission.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::application::PermissionChecker;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};
use crate::interfaces::http::common::ApiResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    Forbidden,
}

impl AuthError {
    fn status_and_message(self) -> (StatusCode, &'static str) {
        match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
            AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "Token has expired"),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Insufficient permissions"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Caller identity decoded from a verified token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    /// Role name at token issue time; informational only
    pub role: String,
}

impl From<TokenClaims> for AuthenticatedUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}

fn bearer_token(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Bearer token authentication
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(header_value) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return AuthError::MissingToken.into_response();
    };

    let Some(token) = bearer_token(header_value) else {
        return AuthError::InvalidToken.into_response();
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            request
                .extensions_mut()
                .insert(AuthenticatedUser::from(claims));
            next.run(request).await
        }
        Err(e) => match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AuthError::ExpiredToken.into_response()
            }
            _ => AuthError::InvalidToken.into_response(),
        },
    }
}

/// State of one `require_permission` layer: the checker and the
/// permission the wrapped route demands.
#[derive(Clone)]
pub struct PermissionGuard {
    pub checker: PermissionChecker,
    pub permission: &'static str,
}

impl PermissionGuard {
    pub fn new(checker: PermissionChecker, permission: &'static str) -> Self {
        Self {
            checker,
            permission,
        }
    }
}

/// Per-route permission check, 403 on denial
pub async fn require_permission(
    State(guard): State<PermissionGuard>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let user_id = request
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|u| u.user_id.clone());

    if guard
        .checker
        .check(user_id.as_deref(), guard.permission)
        .await
    {
        next.run(request).await
    } else {
        debug!(
            permission = guard.permission,
            path = %request.uri().path(),
            "Request rejected by permission guard"
        );
        AuthError::Forbidden.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    use crate::domain::permission::PermissionStore;
    use crate::domain::{DomainResult, User};
    use crate::infrastructure::crypto::jwt::create_token;

    /// One active user holding exactly `ticket.view` directly
    struct SingleGrant {
        user: User,
    }

    #[async_trait]
    impl PermissionStore for SingleGrant {
        async fn find_user(&self, user_id: &str) -> DomainResult<Option<User>> {
            Ok((user_id == self.user.id).then(|| self.user.clone()))
        }

        async fn role_grants(&self, _role_id: &str, _permission: &str) -> DomainResult<bool> {
            Ok(false)
        }

        async fn user_grants(&self, user_id: &str, permission: &str) -> DomainResult<bool> {
            Ok(user_id == self.user.id && permission == "ticket.view")
        }
    }

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "middleware-test-secret-value".into(),
            ..JwtConfig::default()
        }
    }

    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        user.username
    }

    fn app(user: &User, permission: &'static str) -> Router {
        let checker = PermissionChecker::new(Arc::new(SingleGrant { user: user.clone() }));
        Router::new()
            .route("/guarded", get(whoami))
            .route_layer(middleware::from_fn_with_state(
                PermissionGuard::new(checker, permission),
                require_permission,
            ))
            .layer(middleware::from_fn_with_state(
                AuthState { jwt_config: jwt() },
                auth_middleware,
            ))
    }

    async fn call(app: Router, authorization: Option<String>) -> Response {
        let mut builder = Request::builder().uri("/guarded");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn bearer_for(user: &User) -> String {
        let token = create_token(&user.id, &user.username, "", &jwt()).unwrap();
        format!("Bearer {}", token)
    }

    fn cashier() -> User {
        User::new("cashier", "cashier@example.com", "Cashier", "hash", None)
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let user = cashier();
        let resp = call(app(&user, "ticket.view"), None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let user = cashier();
        let resp = call(app(&user, "ticket.view"), Some("Bearer not-a-jwt".into())).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let user = cashier();
        let mut cfg = jwt();
        cfg.expiration_hours = -2;
        let token = create_token(&user.id, &user.username, "", &cfg).unwrap();
        let resp = call(app(&user, "ticket.view"), Some(format!("Bearer {}", token))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn granted_permission_reaches_handler() {
        let user = cashier();
        let resp = call(app(&user, "ticket.view"), Some(bearer_for(&user))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"cashier");
    }

    #[tokio::test]
    async fn missing_permission_is_forbidden() {
        let user = cashier();
        let resp = call(app(&user, "ticket.delete"), Some(bearer_for(&user))).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn token_for_unknown_user_is_forbidden() {
        let user = cashier();
        let stranger = User::new("ghost", "ghost@example.com", "Ghost", "hash", None);
        let resp = call(app(&user, "ticket.view"), Some(bearer_for(&stranger))).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer   "), None);
    }
}
