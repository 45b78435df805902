//! Drag-and-drop onto file inputs.
//!
//! A drop fills the zone's `<input type="file">` and fires a synthetic
//! `change`, so the selected-name display updates through the same handler
//! as the native picker.

use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{DragEvent, Element, Event, EventInit, HtmlElement, HtmlInputElement};

use crate::bridge::dom::document;
use crate::error::Result;

const ZONE_SELECTOR: &str = ".drop-zone";
const ACTIVE_CLASS: &str = "dragover";
const NAME_CLASS: &str = "file-selected-name";

/// Text shown for the current selection.
pub fn describe_selection(names: &[String]) -> String {
	match names {
		[] => String::new(),
		[one] => one.clone(),
		many => format!("{} files selected", many.len()),
	}
}

fn zone_of(ev: &Event) -> Option<Element> {
	ev.target()?
		.dyn_into::<Element>()
		.ok()?
		.closest(ZONE_SELECTOR)
		.ok()
		.flatten()
}

fn file_input(zone: &Element) -> Option<HtmlInputElement> {
	zone.query_selector("input[type=\"file\"]")
		.ok()
		.flatten()?
		.dyn_into()
		.ok()
}

fn selected_names(input: &HtmlInputElement) -> Vec<String> {
	let Some(files) = input.files() else {
		return Vec::new();
	};
	(0..files.length()).filter_map(|i| files.item(i)).map(|f| f.name()).collect()
}

/// The display for `input`: `.file-selected-name` inside its zone, else the
/// page-wide `#file-selected-name`.
fn name_display(input: &HtmlInputElement) -> Option<Element> {
	input
		.closest(ZONE_SELECTOR)
		.ok()
		.flatten()
		.and_then(|zone| zone.query_selector(&format!(".{NAME_CLASS}")).ok().flatten())
		.or_else(|| document().ok()?.get_element_by_id(NAME_CLASS))
}

fn on_change(ev: Event) {
	let Some(input) = ev.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) else {
		return;
	};
	if input.type_() != "file" {
		return;
	}
	if let Some(display) = name_display(&input) {
		display.set_text_content(Some(&describe_selection(&selected_names(&input))));
	}
}

fn on_drop(ev: DragEvent) -> Result<()> {
	let Some(zone) = zone_of(&ev) else {
		return Ok(());
	};
	ev.prevent_default();
	zone.class_list().remove_1(ACTIVE_CLASS)?;
	let files = ev.data_transfer().and_then(|dt| dt.files());
	let (Some(input), Some(files)) = (file_input(&zone), files) else {
		return Ok(());
	};
	debug!("{} file(s) dropped", files.length());
	input.set_files(Some(&files));

	let init = EventInit::new();
	init.set_bubbles(true);
	input.dispatch_event(&Event::new_with_event_init_dict("change", &init)?)?;
	Ok(())
}

fn listen<E: JsCast + 'static>(event: &str, mut handler: impl FnMut(E) + 'static) -> Result<()> {
	let cb = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
		if let Ok(ev) = ev.dyn_into::<E>() {
			handler(ev);
		}
	});
	document()?.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
	cb.forget();
	Ok(())
}

pub fn install() -> Result<()> {
	listen("dragover", |ev: DragEvent| {
		if let Some(zone) = zone_of(&ev) {
			ev.prevent_default();
			let _ = zone.class_list().add_1(ACTIVE_CLASS);
		}
	})?;
	listen("dragleave", |ev: DragEvent| {
		if let Some(zone) = zone_of(&ev) {
			let _ = zone.class_list().remove_1(ACTIVE_CLASS);
		}
	})?;
	listen("drop", |ev: DragEvent| {
		if let Err(err) = on_drop(ev) {
			log::warn!("file drop failed: {err}");
		}
	})?;
	listen("change", on_change)?;
	listen("click", |ev: Event| {
		let Some(zone) = zone_of(&ev) else {
			return;
		};
		let on_input = ev.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()).is_some();
		if let (false, Some(input)) = (on_input, file_input(&zone)) {
			HtmlElement::click(&input);
		}
	})?;
	Ok(())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
	use std::cell::Cell;

	use js_sys::Array;
	use wasm_bindgen_test::*;
	use web_sys::{DataTransfer, DragEventInit, File};

	use super::*;

	wasm_bindgen_test_configure!(run_in_browser);

	thread_local! {
		static INSTALLED: Cell<bool> = const { Cell::new(false) };
	}

	fn install_once() {
		if !INSTALLED.with(|i| i.replace(true)) {
			install().unwrap();
		}
	}

	/// A `.drop-zone` holding a file input and its name display.
	fn zone() -> (Element, HtmlInputElement, Element) {
		let document = document().unwrap();
		let zone = document.create_element("div").unwrap();
		zone.set_class_name("drop-zone");
		zone.set_inner_html(r#"<input type="file"><span class="file-selected-name"></span>"#);
		document.body().unwrap().append_child(&zone).unwrap();
		let input = file_input(&zone).unwrap();
		let display = zone.query_selector(".file-selected-name").unwrap().unwrap();
		(zone, input, display)
	}

	fn drop_files(target: &Element, names: &[&str]) {
		let transfer = DataTransfer::new().unwrap();
		for name in names {
			let file = File::new_with_str_sequence(&Array::of1(&"contents".into()), name).unwrap();
			transfer.items().add_with_file(&file).unwrap();
		}
		let init = DragEventInit::new();
		init.set_bubbles(true);
		init.set_cancelable(true);
		init.set_data_transfer(Some(&transfer));
		let ev = DragEvent::new_with_event_init_dict("drop", &init).unwrap();
		target.dispatch_event(&ev).unwrap();
	}

	#[wasm_bindgen_test]
	fn dropped_file_fills_the_name_display() {
		install_once();
		let (zone, input, display) = zone();
		zone.class_list().add_1(ACTIVE_CLASS).unwrap();

		drop_files(&zone, &["scene.jpg"]);

		assert_eq!(selected_names(&input), ["scene.jpg"]);
		assert_eq!(display.text_content().as_deref(), Some("scene.jpg"));
		assert!(!zone.class_list().contains(ACTIVE_CLASS));
	}

	#[wasm_bindgen_test]
	fn dropping_several_files_counts_them() {
		install_once();
		let (zone, _input, display) = zone();
		drop_files(&zone, &["a.pdf", "b.pdf"]);
		assert_eq!(display.text_content().as_deref(), Some("2 files selected"));
	}
}
