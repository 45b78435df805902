//! Owned state of the graph view: the fetched snapshot, the filter, and the
//! single live renderer.

use std::any::Any;
use std::rc::Rc;

use deeptrace_model::{FilterState, GraphSnapshot, NodeKind};
use leptos::prelude::*;
use log::debug;
use web_sys::HtmlElement;

use crate::components::legend::GraphLegend;
use crate::components::network_graph::{GraphRuntime, NetworkGraphCanvas, PhysicsSettings, Theme};
use crate::components::notice::{GraphNotice, Notice};

/// Proof that a pipeline was the latest to start. Results carrying an older
/// ticket are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderTicket(u64);

/// Whatever currently occupies the container. Dropping it stops the
/// animation loop and unmounts the view.
struct LiveGraph {
	runtime: Option<Rc<GraphRuntime>>,
	_mount: Box<dyn Any>,
}

impl Drop for LiveGraph {
	fn drop(&mut self) {
		if let Some(runtime) = &self.runtime {
			runtime.stop();
		}
	}
}

pub struct GraphView {
	physics: PhysicsSettings,
	theme: Theme,
	on_select: Rc<dyn Fn(String)>,
	generation: u64,
	container: Option<HtmlElement>,
	snapshot: Option<GraphSnapshot>,
	filter: FilterState,
	live: Option<LiveGraph>,
}

impl GraphView {
	pub fn new(on_select: impl Fn(String) + 'static) -> Self {
		Self {
			physics: PhysicsSettings::default(),
			theme: Theme::default(),
			on_select: Rc::new(on_select),
			generation: 0,
			container: None,
			snapshot: None,
			filter: FilterState::all_visible(),
			live: None,
		}
	}

	/// Starts a new fetch and render; every earlier ticket goes stale.
	pub fn begin_render(&mut self) -> RenderTicket {
		self.generation += 1;
		RenderTicket(self.generation)
	}

	pub fn is_current(&self, ticket: &RenderTicket) -> bool {
		ticket.0 == self.generation
	}

	pub fn snapshot(&self) -> Option<&GraphSnapshot> {
		self.snapshot.as_ref()
	}

	/// Replaces the container content with a loading or error notice. The
	/// held snapshot is dropped with the graph, so filter changes have nothing
	/// to re-render until the next fetch lands.
	pub fn show_notice(&mut self, container: &HtmlElement, notice: Notice) {
		self.live = None;
		self.snapshot = None;
		self.container = Some(container.clone());
		container.set_inner_html("");
		let handle = leptos::mount::mount_to(container.clone(), move || {
			view! { <GraphNotice notice=notice /> }
		});
		self.live = Some(LiveGraph {
			runtime: None,
			_mount: Box::new(handle),
		});
	}

	/// Installs a freshly fetched snapshot and renders it, unless `ticket`
	/// was superseded. Returns whether anything was rendered.
	pub fn render(
		&mut self,
		ticket: &RenderTicket,
		container: HtmlElement,
		snapshot: GraphSnapshot,
		filter: FilterState,
	) -> bool {
		if !self.is_current(ticket) {
			debug!("dropping stale render {:?}", ticket);
			return false;
		}
		self.container = Some(container);
		self.snapshot = Some(snapshot);
		self.filter = filter;
		self.mount();
		true
	}

	/// Re-renders the held snapshot under a new filter. Without a snapshot
	/// there is nothing to filter and nothing is fetched.
	pub fn apply_filter(&mut self, filter: FilterState) -> bool {
		if self.snapshot.is_none() || self.container.is_none() {
			return false;
		}
		self.filter = filter;
		self.mount();
		true
	}

	/// Releases the renderer if its container left the document.
	pub fn release_if_detached(&mut self) {
		let detached = self.container.as_ref().is_some_and(|c| !c.is_connected());
		if detached {
			debug!("graph container detached; releasing renderer");
			self.live = None;
			self.container = None;
			self.snapshot = None;
		}
	}

	fn mount(&mut self) {
		self.live = None;
		let (Some(container), Some(snapshot)) = (self.container.clone(), self.snapshot.as_ref())
		else {
			return;
		};
		container.set_inner_html("");

		if snapshot.is_empty() {
			let handle = leptos::mount::mount_to(container, || {
				view! { <GraphNotice notice={Notice::Empty} /> }
			});
			self.live = Some(LiveGraph {
				runtime: None,
				_mount: Box::new(handle),
			});
			return;
		}

		let visible = self.filter.apply(snapshot);
		let kinds: Vec<NodeKind> =
			snapshot.groups().into_iter().filter_map(|g| g.parse().ok()).collect();
		debug!(
			"rendering {} of {} nodes, {} of {} edges",
			visible.nodes.len(),
			snapshot.nodes.len(),
			visible.edges.len(),
			snapshot.edges.len()
		);

		let on_select = Rc::clone(&self.on_select);
		let runtime = GraphRuntime::new(self.physics, self.theme, move |id| on_select(id));
		let canvas_runtime = Rc::clone(&runtime);
		let handle = leptos::mount::mount_to(container, move || {
			view! {
				<NetworkGraphCanvas runtime=canvas_runtime snapshot=visible />
				<GraphLegend kinds=kinds />
			}
		});
		self.live = Some(LiveGraph {
			runtime: Some(runtime),
			_mount: Box::new(handle),
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn newest_ticket_wins() {
		let mut view = GraphView::new(|_| {});
		let first = view.begin_render();
		assert!(view.is_current(&first));

		let second = view.begin_render();
		assert!(!view.is_current(&first));
		assert!(view.is_current(&second));
	}

	#[test]
	fn filtering_without_a_snapshot_is_a_no_op() {
		let mut view = GraphView::new(|_| {});
		let mut filter = FilterState::all_visible();
		filter.set("evidence", false);
		assert!(!view.apply_filter(filter));
		assert!(view.snapshot().is_none());
		assert!(view.live.is_none());
	}
}
