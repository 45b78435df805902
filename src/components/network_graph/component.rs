use std::cell::{Cell, RefCell};
use std::rc::Rc;

use deeptrace_model::GraphSnapshot;
use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::physics::PhysicsSettings;
use super::render;
use super::state::ForceGraphState;
use super::theme::Theme;

const FRAME_DT: f32 = 0.016;
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;

type FrameClosure = Closure<dyn FnMut()>;

/// Everything one live canvas owns outside the Leptos tree: the simulation,
/// the animation-frame loop and the click callback.
///
/// The frame closure holds an `Rc` back to the runtime, so the loop lives
/// until [`GraphRuntime::stop`] breaks the cycle.
pub struct GraphRuntime {
	state: RefCell<Option<ForceGraphState>>,
	physics: PhysicsSettings,
	theme: Theme,
	frame: RefCell<Option<FrameClosure>>,
	frame_id: Cell<Option<i32>>,
	resize: RefCell<Option<FrameClosure>>,
	stopped: Cell<bool>,
	on_select: Box<dyn Fn(String)>,
}

impl GraphRuntime {
	pub fn new(
		physics: PhysicsSettings,
		theme: Theme,
		on_select: impl Fn(String) + 'static,
	) -> Rc<Self> {
		Rc::new(Self {
			state: RefCell::new(None),
			physics,
			theme,
			frame: RefCell::new(None),
			frame_id: Cell::new(None),
			resize: RefCell::new(None),
			stopped: Cell::new(false),
			on_select: Box::new(on_select),
		})
	}

	pub fn is_stopped(&self) -> bool {
		self.stopped.get()
	}

	/// Cancels the pending frame and drops the loop and resize listener.
	pub fn stop(&self) {
		if self.stopped.replace(true) {
			return;
		}
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(id) = self.frame_id.take() {
			let _ = window.cancel_animation_frame(id);
		}
		self.frame.borrow_mut().take();
		if let Some(cb) = self.resize.borrow_mut().take() {
			let _ = window
				.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		self.state.borrow_mut().take();
		debug!("graph renderer stopped");
	}

	fn start(
		self: &Rc<Self>,
		canvas: HtmlCanvasElement,
		snapshot: &GraphSnapshot,
	) -> Result<(), JsValue> {
		let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
		let (w, h) = container_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or_else(|| JsValue::from_str("2d context unavailable"))?
			.dyn_into()?;
		*self.state.borrow_mut() = Some(ForceGraphState::new(snapshot, w, h, self.physics));

		let (rt_resize, canvas_resize) = (Rc::clone(self), canvas.clone());
		let resize = Closure::<dyn FnMut()>::new(move || {
			let (nw, nh) = container_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(s) = rt_resize.state.borrow_mut().as_mut() {
				s.resize(nw, nh);
			}
		});
		window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
		*self.resize.borrow_mut() = Some(resize);

		let rt = Rc::clone(self);
		*self.frame.borrow_mut() = Some(Closure::new(move || {
			if rt.is_stopped() {
				return;
			}
			if let Some(s) = rt.state.borrow_mut().as_mut() {
				s.tick(FRAME_DT);
				render::render(s, &ctx, &rt.theme);
			}
			rt.request_frame();
		}));
		self.request_frame();
		Ok(())
	}

	fn request_frame(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(cb) = self.frame.borrow().as_ref() {
			self.frame_id
				.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	}

	fn with_state<R>(&self, f: impl FnOnce(&mut ForceGraphState) -> R) -> Option<R> {
		self.state.borrow_mut().as_mut().map(f)
	}
}

fn container_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	let parent = canvas.parent_element();
	let w = parent.as_ref().map(|p| p.client_width() as f64).filter(|w| *w > 0.0);
	let h = parent.as_ref().map(|p| p.client_height() as f64).filter(|h| *h > 0.0);
	(w.unwrap_or(800.0), h.unwrap_or(600.0))
}

fn local_point(ev: &MouseEvent) -> Option<(f64, f64)> {
	let el: Element = ev.current_target()?.dyn_into().ok()?;
	let rect = el.get_bounding_client_rect();
	Some((ev.client_x() as f64 - rect.left(), ev.client_y() as f64 - rect.top()))
}

#[component]
pub fn NetworkGraphCanvas(runtime: Rc<GraphRuntime>, snapshot: GraphSnapshot) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

	let rt_init = Rc::clone(&runtime);
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if rt_init.is_stopped() || rt_init.state.borrow().is_some() {
			return;
		}
		if let Err(err) = rt_init.start(canvas.into(), &snapshot) {
			log::error!("graph canvas failed to start: {err:?}");
		}
	});

	let rt_md = Rc::clone(&runtime);
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		rt_md.with_state(|s| {
			if !s.press(x, y) {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		});
	};

	let rt_mm = Rc::clone(&runtime);
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		rt_mm.with_state(|s| {
			if s.drag.active {
				s.drag_to(x, y);
			} else {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
				if s.pan.active {
					s.take_view_control();
					s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
					s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
				}
			}
		});
	};

	let rt_mu = Rc::clone(&runtime);
	let on_mouseup = move |_: MouseEvent| {
		let clicked = rt_mu
			.with_state(|s| {
				s.pan.active = false;
				s.release()
			})
			.flatten();
		if let Some(id) = clicked {
			(rt_mu.on_select)(id);
		}
	};

	let rt_ml = Rc::clone(&runtime);
	let on_mouseleave = move |_: MouseEvent| {
		rt_ml.with_state(|s| {
			s.cancel_press();
			s.pan.active = false;
			s.set_hover(None);
		});
	};

	let rt_wh = Rc::clone(&runtime);
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		rt_wh.with_state(|s| {
			s.take_view_control();
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		});
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="network-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
		/>
	}
}
