use axum::{routing::get, Router};

use crate::handlers::errors::render_error;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/errors/{code}", get(render_error))
}
