use axum::{middleware, routing::get, Router};

use crate::handlers::producto::{
    create_producto, delete_producto, get_producto, get_productos, update_producto,
};
use crate::middleware::auth::{require_admin, require_auth};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/productos", get(get_productos).post(create_producto))
        .route(
            "/productos/{id}",
            get(get_producto).put(update_producto).delete(delete_producto),
        )
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state, require_auth))
}
