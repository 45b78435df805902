//! Checkbox-driven filtering of the fetched graph.

use std::rc::Rc;

use deeptrace_model::{FilterState, GraphSnapshot};
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlInputElement};

use super::Bridge;
use super::dom::document;
use crate::error::Result;

const CHECKBOX_PREFIX: &str = "filter-";

/// Group a checkbox id controls, if it is a graph filter.
pub fn group_for_checkbox(id: &str) -> Option<&str> {
	id.strip_prefix(CHECKBOX_PREFIX).filter(|group| !group.is_empty())
}

fn checkbox_state(group: &str) -> Option<bool> {
	document()
		.ok()?
		.get_element_by_id(&format!("{CHECKBOX_PREFIX}{group}"))?
		.dyn_into::<HtmlInputElement>()
		.ok()
		.map(|input| input.checked())
}

/// Current checkbox state for every group in `snapshot`. Groups without a
/// checkbox stay visible.
pub fn read(snapshot: &GraphSnapshot) -> FilterState {
	let readings = snapshot.groups().into_iter().map(|group| (group, checkbox_state(group)));
	FilterState::from_readings(readings)
}

/// Re-derives the visible graph whenever a filter checkbox changes. Never
/// touches the network.
pub fn listen(bridge: &Rc<Bridge>) -> Result<()> {
	let bridge = Rc::clone(bridge);
	let on_change = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
		let Some(input) = ev.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) else {
			return;
		};
		let id = input.id();
		let Some(group) = group_for_checkbox(&id) else {
			return;
		};
		let mut view = bridge.view.borrow_mut();
		let Some(filter) = view.snapshot().map(read) else {
			return;
		};
		debug!("filter {group} -> {}", input.checked());
		view.apply_filter(filter);
	});
	document()?.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
	on_change.forget();
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn checkbox_ids_name_their_group() {
		assert_eq!(group_for_checkbox("filter-evidence"), Some("evidence"));
		assert_eq!(group_for_checkbox("filter-"), None);
		assert_eq!(group_for_checkbox("file-upload"), None);
	}
}
