pub mod errors;
pub mod productos;

use axum::Router;

use crate::handlers::errors::method_not_allowed;
use crate::state::AppState;

/// Prefix every API route is nested under.
pub const API_BASE: &str = "/api";

pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(productos::routes(state))
        .merge(errors::routes())
        .method_not_allowed_fallback(method_not_allowed)
}
