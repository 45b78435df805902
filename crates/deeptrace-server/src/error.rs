//! Error types for the graph server.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Everything a handler can fail with; rendered as `{"error": ...}`.
#[derive(Error, Debug)]
pub enum Error {
	/// SQLite failure.
	#[error("Database error: {0}")]
	Database(#[from] rusqlite::Error),

	/// Unknown node or record.
	#[error("Not found: {0}")]
	NotFound(String),

	/// Missing or malformed query parameters.
	#[error("Bad request: {0}")]
	BadRequest(String),

	/// Invalid environment configuration.
	#[error("Configuration error: {0}")]
	Config(String),

	/// Filesystem or socket failure.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// Result alias for the server.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
	fn status(&self) -> StatusCode {
		match self {
			Error::NotFound(_) => StatusCode::NOT_FOUND,
			Error::BadRequest(_) => StatusCode::BAD_REQUEST,
			Error::Database(_) | Error::Config(_) | Error::Io(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status();
		if status.is_server_error() {
			tracing::error!("{}", self);
		}
		(status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
	}
}
