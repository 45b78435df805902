//! HTTP route handlers.

pub mod network;

use std::sync::Arc;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
	let static_files = ServeDir::new(&state.config.static_dir);
	Router::new()
		.nest("/network", network::routes())
		.nest_service("/static", static_files)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}
