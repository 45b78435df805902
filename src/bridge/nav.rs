//! Side-navigation highlighting after partial swaps.

use deeptrace_model::is_nav_active;
use wasm_bindgen::JsCast;
use web_sys::Element;

use super::dom::{document, window};
use crate::config::BridgeConfig;
use crate::error::Result;

/// Whether a swap replaced the main content region.
pub fn targets_main(target: &Element, config: &BridgeConfig) -> bool {
	target.id() == config.main_id
}

/// Marks each nav item whose `data-nav-path` matches the current location.
pub fn highlight(config: &BridgeConfig) -> Result<usize> {
	let current = window()?.location().pathname()?;
	let items = document()?.query_selector_all(&config.nav_selector)?;
	let mut active = 0;
	for i in 0..items.length() {
		let Some(item) = items.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
			continue;
		};
		let path = item
			.get_attribute("data-nav-path")
			.or_else(|| item.get_attribute("href"))
			.unwrap_or_default();
		if is_nav_active(&current, &path) {
			item.class_list().add_1("active")?;
			item.set_attribute("aria-current", "page")?;
			active += 1;
		} else {
			item.class_list().remove_1("active")?;
			item.remove_attribute("aria-current")?;
		}
	}
	Ok(active)
}
