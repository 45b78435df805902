//! Small DOM helpers shared by the bridge and the widgets.

use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Window};

use crate::error::{BridgeError, Result};

pub fn window() -> Result<Window> {
	web_sys::window().ok_or_else(|| BridgeError::MissingElement("window".into()))
}

pub fn document() -> Result<Document> {
	window()?
		.document()
		.ok_or_else(|| BridgeError::MissingElement("document".into()))
}

/// Element with the given id, cast to `T`.
pub fn element_by_id<T: JsCast>(id: &str) -> Result<T> {
	document()?
		.get_element_by_id(id)
		.and_then(|el| el.dyn_into::<T>().ok())
		.ok_or_else(|| BridgeError::MissingElement(format!("#{id}")))
}

/// Resolves after `ms` milliseconds.
pub async fn sleep(ms: i32) -> Result<()> {
	let window = window()?;
	let promise = Promise::new(&mut |resolve, _reject| {
		if window
			.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
			.is_err()
		{
			let _ = resolve.call0(&wasm_bindgen::JsValue::NULL);
		}
	});
	JsFuture::from(promise).await?;
	Ok(())
}
