//! Once-per-session loading of the graph stylesheet.

use std::cell::RefCell;

use deeptrace_model::{AssetLoader, LoadStep};
use js_sys::{Function, Promise};
use log::{info, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlLinkElement;

use super::dom::document;
use crate::error::Result;

pub type StylesheetLoader = RefCell<AssetLoader<Promise>>;

fn already_on_page(href: &str) -> bool {
	document()
		.ok()
		.and_then(|d| d.query_selector(&format!("link[rel=\"stylesheet\"][href=\"{href}\"]")).ok())
		.flatten()
		.is_some()
}

fn append_link(
	href: &str,
	resolve: &Function,
	reject: &Function,
) -> std::result::Result<(), JsValue> {
	let document = document().map_err(|e| JsValue::from_str(&e.to_string()))?;
	let link: HtmlLinkElement = document.create_element("link")?.dyn_into()?;
	link.set_rel("stylesheet");
	link.set_href(href);
	link.set_onload(Some(resolve));
	link.set_onerror(Some(reject));
	document
		.head()
		.ok_or_else(|| JsValue::from_str("document has no <head>"))?
		.append_child(&link)?;
	Ok(())
}

fn inject(href: &str) -> Promise {
	Promise::new(&mut |resolve, reject| {
		if let Err(err) = append_link(href, &resolve, &reject) {
			let _ = reject.call1(&JsValue::NULL, &err);
		}
	})
}

/// Makes sure the stylesheet is applied before a render. The first caller
/// injects the `<link>`; everyone else waits on the same load promise. A
/// failed load still ends in the ready state so the graph renders unstyled.
pub async fn ensure_stylesheet(loader: &StylesheetLoader, href: &str) -> Result<()> {
	let step = {
		let mut loader = loader.borrow_mut();
		if already_on_page(href) {
			loader.adopt_existing();
		}
		loader.request(|| inject(href))
	};
	let pending = match step {
		LoadStep::Ready => return Ok(()),
		LoadStep::Started(promise) => {
			info!("loading graph stylesheet {href}");
			promise
		}
		LoadStep::Pending(promise) => promise,
	};

	let outcome = JsFuture::from(pending).await;
	if loader.borrow_mut().finish() {
		match &outcome {
			Ok(_) => info!("graph stylesheet ready"),
			Err(err) => warn!("graph stylesheet failed to load: {err:?}"),
		}
	}
	outcome?;
	Ok(())
}
