use deeptrace_model::GraphSnapshot;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use super::dom::window;
use crate::error::{BridgeError, Result};

/// GETs `url` and returns the body text. `partial` marks the request as a
/// fragment request so the server answers with the panel markup only.
pub async fn get_text(url: &str, partial: bool) -> Result<String> {
	let opts = RequestInit::new();
	opts.set_method("GET");
	let request = Request::new_with_str_and_init(url, &opts)?;
	if partial {
		request.headers().set("HX-Request", "true")?;
	}

	let resp: Response = JsFuture::from(window()?.fetch_with_request(&request))
		.await?
		.dyn_into()?;
	if !resp.ok() {
		return Err(BridgeError::Status {
			url: url.to_string(),
			status: resp.status(),
		});
	}

	JsFuture::from(resp.text()?)
		.await?
		.as_string()
		.ok_or_else(|| BridgeError::Js("response body is not text".into()))
}

/// Fetches the case graph snapshot.
pub async fn graph_snapshot(endpoint: &str) -> Result<GraphSnapshot> {
	let body = get_text(endpoint, false).await?;
	let snapshot: GraphSnapshot = serde_json::from_str(&body)?;
	log::debug!(
		"fetched graph: {} nodes, {} edges",
		snapshot.nodes.len(),
		snapshot.edges.len()
	);
	Ok(snapshot)
}
