use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::state::AppState;

/// Role required by every catalog endpoint.
pub const ADMIN_ROLE: &str = "Administrador";

#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub role: String,
    pub username: String,
}

impl AuthContext {
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }
}

/// Verifies the bearer token and attaches an [`AuthContext`] to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = match req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        Some(h) => h,
        None => return AppError::unauthorized("Falta la cabecera Authorization").into_response(),
    };

    // Expect "Bearer <token>"
    let token = match auth_header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return AppError::unauthorized("Formato de Authorization inválido").into_response(),
    };

    let claims = match verify_token(token, &state.jwt_secret) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            return e.into_response();
        }
    };

    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        role: claims.role,
        username: claims.username,
    });

    next.run(req).await
}

/// Rejects requests whose context lacks [`ADMIN_ROLE`]. Must run after
/// [`require_auth`].
pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    match req.extensions().get::<AuthContext>() {
        Some(ctx) if ctx.has_role(ADMIN_ROLE) => {}
        ctx => {
            tracing::warn!(
                user_id = ctx.map(|c| c.user_id),
                username = ctx.map(|c| c.username.as_str()),
                "Request without the {ADMIN_ROLE} role"
            );
            return AppError::forbidden("No tienes permisos para acceder a este recurso.")
                .into_response();
        }
    }

    next.run(req).await
}
