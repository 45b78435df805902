//! DeepTrace graph server for a single case.

use deeptrace_server::{AppState, CaseStore, ServerConfig, build_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).init();

	let config = ServerConfig::from_env()?;
	let db_path = config.database_path();
	if !config.case_dir().exists() {
		anyhow::bail!("Case '{}' not found under {}", config.case, config.cases_dir.display());
	}

	let store = CaseStore::open(&db_path)?;
	let port = config.port;
	info!("Serving case '{}' from {}", config.case, db_path.display());

	let app = build_router(AppState::new(config, store));

	let addr = format!("0.0.0.0:{}", port);
	let listener = tokio::net::TcpListener::bind(&addr).await?;
	info!("DeepTrace graph server listening on {}", addr);

	axum::serve(listener, app).await?;

	Ok(())
}
