//! Image lightbox with a focus trap.
//!
//! Any element with `data-lightbox-src` opens the overlay. While it is open,
//! keyboard focus stays on the close button; closing it (overlay click,
//! close button, Escape) hands focus back to whatever had it before.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlElement, HtmlImageElement, KeyboardEvent};

use crate::bridge::dom::document;
use crate::error::{BridgeError, Result};

const OVERLAY_ID: &str = "lightbox";
const TRIGGER_SELECTOR: &str = "[data-lightbox-src]";

/// Remembers who had focus before a modal opened.
#[derive(Debug)]
pub struct FocusTrap<T> {
	open: bool,
	previous: Option<T>,
}

impl<T> Default for FocusTrap<T> {
	fn default() -> Self {
		Self { open: false, previous: None }
	}
}

impl<T> FocusTrap<T> {
	/// Opens the trap. Returns false if it was already open, in which case
	/// the originally focused element is kept.
	pub fn open(&mut self, previously_focused: Option<T>) -> bool {
		if self.open {
			return false;
		}
		self.open = true;
		self.previous = previously_focused;
		true
	}

	/// Closes the trap and hands back the element to refocus. `None` when
	/// the trap was not open.
	pub fn close(&mut self) -> Option<Option<T>> {
		if !self.open {
			return None;
		}
		self.open = false;
		Some(self.previous.take())
	}

	pub fn is_open(&self) -> bool {
		self.open
	}
}

struct Lightbox {
	overlay: HtmlElement,
	image: HtmlImageElement,
	close_button: HtmlElement,
	trap: RefCell<FocusTrap<HtmlElement>>,
}

impl Lightbox {
	fn open(&self, src: &str, alt: &str) {
		let focused = document()
			.ok()
			.and_then(|d| d.active_element())
			.and_then(|el| el.dyn_into::<HtmlElement>().ok());
		if !self.trap.borrow_mut().open(focused) {
			return;
		}
		self.image.set_src(src);
		self.image.set_alt(alt);
		self.overlay.set_hidden(false);
		let _ = self.overlay.set_attribute("aria-hidden", "false");
		let _ = self.close_button.focus();
		debug!("lightbox opened for {src}");
	}

	fn close(&self) {
		let Some(previous) = self.trap.borrow_mut().close() else {
			return;
		};
		self.overlay.set_hidden(true);
		let _ = self.overlay.set_attribute("aria-hidden", "true");
		let _ = self.image.remove_attribute("src");
		if let Some(el) = previous {
			let _ = el.focus();
		}
	}

	fn is_open(&self) -> bool {
		self.trap.borrow().is_open()
	}
}

fn find_or_create_overlay() -> Result<HtmlElement> {
	let document = document()?;
	if let Some(existing) = document.get_element_by_id(OVERLAY_ID) {
		return existing
			.dyn_into()
			.map_err(|_| BridgeError::MissingElement(format!("#{OVERLAY_ID} as an HTML element")));
	}
	let overlay: HtmlElement = document.create_element("div")?.unchecked_into();
	overlay.set_id(OVERLAY_ID);
	overlay.set_class_name("lightbox");
	overlay.set_attribute("role", "dialog")?;
	overlay.set_attribute("aria-modal", "true")?;
	overlay.set_attribute("aria-hidden", "true")?;
	overlay.set_hidden(true);
	overlay.set_inner_html(concat!(
		r#"<button type="button" class="lightbox-close" aria-label="Close">&times;</button>"#,
		r#"<img class="lightbox-image" alt="">"#,
	));
	document
		.body()
		.ok_or_else(|| BridgeError::MissingElement("body".into()))?
		.append_child(&overlay)?;
	Ok(overlay)
}

fn child<T: JsCast>(overlay: &HtmlElement, selector: &str) -> Result<T> {
	overlay
		.query_selector(selector)?
		.and_then(|el| el.dyn_into::<T>().ok())
		.ok_or_else(|| BridgeError::MissingElement(format!("#{OVERLAY_ID} {selector}")))
}

pub fn install() -> Result<()> {
	let overlay = find_or_create_overlay()?;
	let lightbox = Rc::new(Lightbox {
		image: child(&overlay, ".lightbox-image")?,
		close_button: child(&overlay, ".lightbox-close")?,
		overlay,
		trap: RefCell::new(FocusTrap::default()),
	});
	let document = document()?;

	let lb = Rc::clone(&lightbox);
	let on_click = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
		let Some(target) = ev.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
			return;
		};
		if lb.is_open() {
			let on_overlay = target.is_same_node(Some(lb.overlay.as_ref()));
			let on_close = lb.close_button.contains(Some(target.as_ref()));
			if on_overlay || on_close {
				ev.prevent_default();
				lb.close();
			}
			return;
		}
		let Some(trigger) = target.closest(TRIGGER_SELECTOR).ok().flatten() else {
			return;
		};
		let src = trigger.get_attribute("data-lightbox-src").unwrap_or_default();
		if src.is_empty() {
			return;
		}
		ev.prevent_default();
		let alt = trigger
			.get_attribute("data-lightbox-alt")
			.or_else(|| trigger.get_attribute("alt"))
			.unwrap_or_default();
		lb.open(&src, &alt);
	});
	document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
	on_click.forget();

	let lb = Rc::clone(&lightbox);
	let on_key = Closure::<dyn FnMut(KeyboardEvent)>::new(move |ev: KeyboardEvent| {
		if !lb.is_open() {
			return;
		}
		match ev.key().as_str() {
			"Escape" => {
				ev.prevent_default();
				lb.close();
			}
			"Tab" => {
				ev.prevent_default();
				let _ = lb.close_button.focus();
			}
			_ => {}
		}
	});
	document.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;
	on_key.forget();
	Ok(())
}
