//! DeepTrace graph server: serves the current case's entity graph and the
//! network analysis views built on top of it.

pub mod analysis;
pub mod config;
pub mod error;
pub mod provider;
pub mod routes;
pub mod schema;
pub mod store;

use std::sync::Arc;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use routes::build_router;
pub use store::CaseStore;

/// Shared application state accessible from all route handlers.
pub struct AppState {
	/// Startup configuration.
	pub config: ServerConfig,
	/// The served case's database.
	pub store: CaseStore,
}

impl AppState {
	/// Wraps the state for sharing across handlers.
	pub fn new(config: ServerConfig, store: CaseStore) -> Arc<Self> {
		Arc::new(Self { config, store })
	}
}
