//! Opening a clicked node in the detail panel.

use deeptrace_model::NodeRef;
use js_sys::{Function, Object, Reflect};
use log::{debug, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{CustomEvent, CustomEventInit, Element};

use super::dom::{element_by_id, window};
use super::fetch::get_text;
use crate::config::BridgeConfig;
use crate::error::Result;

/// Detail route for a clicked node id. Malformed ids and kinds without a
/// detail page resolve to `None`.
pub fn route_for(node_id: &str) -> Option<String> {
	match NodeRef::parse(node_id) {
		Ok(node) => node.detail_route(),
		Err(err) => {
			debug!("ignoring click on {node_id}: {err}");
			None
		}
	}
}

/// Handles a node click: swaps the detail panel when the node has a route.
pub fn open_node(config: &BridgeConfig, node_id: &str) {
	let Some(route) = route_for(node_id) else {
		return;
	};
	let (detail_id, swap_event) = (config.detail_id.clone(), config.swap_event.clone());
	spawn_local(async move {
		if let Err(err) = swap_detail(&route, &detail_id, &swap_event).await {
			warn!("could not open {route}: {err}");
		}
	});
}

async fn swap_detail(route: &str, detail_id: &str, swap_event: &str) -> Result<()> {
	let panel: Element = element_by_id(detail_id)?;
	let html = get_text(route, true).await?;
	panel.set_inner_html(&html);
	info!("detail panel swapped to {route}");
	process_with_htmx(&panel);
	announce_swap(&panel, swap_event)
}

/// Lets htmx wire up attributes in markup it did not insert itself.
fn process_with_htmx(panel: &Element) {
	let Ok(window) = window() else {
		return;
	};
	let Ok(htmx) = Reflect::get(&window, &JsValue::from_str("htmx")) else {
		return;
	};
	if htmx.is_undefined() || htmx.is_null() {
		return;
	}
	let process = Reflect::get(&htmx, &JsValue::from_str("process"))
		.and_then(|f| f.dyn_into::<Function>());
	if let Ok(process) = process {
		let _ = process.call1(&htmx, panel);
	}
}

/// Fires the after-swap event so every swap observer sees this update the
/// same way as a server-driven swap.
fn announce_swap(panel: &Element, swap_event: &str) -> Result<()> {
	let detail = Object::new();
	Reflect::set(&detail, &JsValue::from_str("target"), panel)?;
	let init = CustomEventInit::new();
	init.set_bubbles(true);
	init.set_detail(&detail);
	let event = CustomEvent::new_with_event_init_dict(swap_event, &init)?;
	panel.dispatch_event(&event)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn routed_and_unrouted_nodes() {
		assert_eq!(route_for("evidence:42").as_deref(), Some("/evidence/42"));
		assert_eq!(route_for("event:7").as_deref(), Some("/timeline/7"));
		assert_eq!(route_for("entity:3"), None);
		assert_eq!(route_for("evidence42"), None);
		assert_eq!(route_for("weapon:1"), None);
	}
}
