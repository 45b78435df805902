//! Glue between the server-rendered dashboard and the graph view.
//!
//! The page swaps fragments in and out and fires an after-swap event each
//! time. Two independent observers react to it: one (re)initializes the graph
//! when its container is part of the new content, the other refreshes the
//! side-navigation highlight when the main region changed.

mod detail;
pub(crate) mod dom;
mod fetch;
mod filters;
mod loader;
mod nav;

use std::cell::RefCell;
use std::rc::Rc;

use deeptrace_model::AssetLoader;
use js_sys::Reflect;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlElement, Node};

use self::dom::{document, element_by_id, sleep};
use self::loader::{StylesheetLoader, ensure_stylesheet};
use crate::components::notice::Notice;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::view::GraphView;

pub struct Bridge {
	config: BridgeConfig,
	view: RefCell<GraphView>,
	stylesheet: StylesheetLoader,
}

impl Bridge {
	fn new(config: BridgeConfig) -> Self {
		let click_config = config.clone();
		let view = GraphView::new(move |node_id| detail::open_node(&click_config, &node_id));
		Self {
			config,
			view: RefCell::new(view),
			stylesheet: RefCell::new(AssetLoader::new()),
		}
	}

	/// Runs both observers for one swap. A failure in one never keeps the
	/// other from running.
	fn on_swap(self: &Rc<Self>, target: &Element) {
		self.observe_graph(target);
		if nav::targets_main(target, &self.config) {
			if let Err(err) = nav::highlight(&self.config) {
				warn!("nav highlight failed: {err}");
			}
		}
	}

	fn observe_graph(self: &Rc<Self>, target: &Element) {
		self.view.borrow_mut().release_if_detached();
		let Ok(container) = element_by_id::<Node>(&self.config.container_id) else {
			return;
		};
		if !target.contains(Some(&container)) {
			return;
		}
		let bridge = Rc::clone(self);
		spawn_local(async move {
			if let Err(err) = bridge.initialize_graph().await {
				warn!("graph initialization failed: {err}");
			}
		});
	}

	/// Waits out the settle delay, makes sure the stylesheet is loaded,
	/// fetches the snapshot and renders it. A pipeline overtaken by a newer
	/// swap drops its result.
	async fn initialize_graph(&self) -> Result<()> {
		let ticket = self.view.borrow_mut().begin_render();
		sleep(self.config.init_delay_ms).await?;
		if !self.view.borrow().is_current(&ticket) {
			return Ok(());
		}

		let container: HtmlElement = element_by_id(&self.config.container_id)?;
		self.view.borrow_mut().show_notice(&container, Notice::Loading);

		if let Err(err) = ensure_stylesheet(&self.stylesheet, &self.config.stylesheet).await {
			debug!("continuing without graph stylesheet: {err}");
		}
		let fetched = fetch::graph_snapshot(&self.config.endpoint).await;

		let mut view = self.view.borrow_mut();
		if !view.is_current(&ticket) {
			debug!("graph fetch superseded by a newer swap");
			return Ok(());
		}
		match fetched {
			Ok(snapshot) => {
				let filter = filters::read(&snapshot);
				view.render(&ticket, container, snapshot, filter);
				Ok(())
			}
			Err(err) => {
				view.show_notice(&container, Notice::Failed(err.to_string()));
				Err(err)
			}
		}
	}
}

/// `event.detail.target`, falling back to the event target.
fn swap_target(ev: &Event) -> Option<Element> {
	let from_detail = ev
		.dyn_ref::<web_sys::CustomEvent>()
		.and_then(|ce| Reflect::get(&ce.detail(), &JsValue::from_str("target")).ok())
		.and_then(|t| t.dyn_into::<Element>().ok());
	from_detail.or_else(|| ev.target().and_then(|t| t.dyn_into::<Element>().ok()))
}

/// Wires the bridge into the page and handles the content already present.
pub fn install(config: BridgeConfig) -> Result<Rc<Bridge>> {
	let bridge = Rc::new(Bridge::new(config));
	let document = document()?;

	let on_swap_bridge = Rc::clone(&bridge);
	let on_swap = Closure::<dyn FnMut(Event)>::new(move |ev: Event| match swap_target(&ev) {
		Some(target) => on_swap_bridge.on_swap(&target),
		None => debug!("swap event without a target"),
	});
	document.add_event_listener_with_callback(
		&bridge.config.swap_event,
		on_swap.as_ref().unchecked_ref(),
	)?;
	on_swap.forget();

	filters::listen(&bridge)?;

	let body: Element = document
		.body()
		.ok_or_else(|| BridgeError::MissingElement("body".into()))?
		.into();
	bridge.observe_graph(&body);
	if let Err(err) = nav::highlight(&bridge.config) {
		warn!("nav highlight failed: {err}");
	}
	info!("navigation bridge listening for {}", bridge.config.swap_event);
	Ok(bridge)
}
