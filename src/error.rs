use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures inside the page glue. None of them is fatal to the page: they
/// are logged, and graph failures are shown in the graph container.
#[derive(Debug, Error)]
pub enum BridgeError {
	/// A required element is not on the page.
	#[error("no `{0}` element on the page")]
	MissingElement(String),
	/// A browser API call threw.
	#[error("browser call failed: {0}")]
	Js(String),
	/// Non-2xx response.
	#[error("{url} answered HTTP {status}")]
	Status {
		/// Requested URL.
		url: String,
		/// HTTP status code.
		status: u16,
	},
	/// The graph body was not a valid snapshot.
	#[error("could not decode the graph: {0}")]
	Decode(#[from] serde_json::Error),
}

impl From<JsValue> for BridgeError {
	fn from(value: JsValue) -> Self {
		BridgeError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

pub type Result<T> = std::result::Result<T, BridgeError>;
