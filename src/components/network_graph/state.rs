use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use deeptrace_model::{EdgeKind, GraphSnapshot, NodeKind, NodeShape};
use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};

use super::fit::{Bounds, FIT_DURATION, FitAnimation};
use super::physics::PhysicsSettings;

const MIN_NODE_RADIUS: f64 = 5.0;
const MAX_NODE_RADIUS: f64 = 24.0;
/// Extra pick distance around a node, in graph units.
const HIT_SLOP: f64 = 7.0;
/// Screen pixels a press may travel before it stops counting as a click.
const CLICK_SLOP: f64 = 4.0;
const LABEL_CHARS: usize = 30;

/// Radius grows with the number of incident edges.
pub fn node_radius(degree: usize) -> f64 {
	((8.0 + 4.0 * degree as f64) / 2.0).clamp(MIN_NODE_RADIUS, MAX_NODE_RADIUS)
}

fn short_label(label: &str) -> String {
	if label.chars().count() <= LABEL_CHARS {
		return label.to_string();
	}
	let cut: String = label.chars().take(LABEL_CHARS).collect();
	format!("{cut}...")
}

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub title: Option<String>,
	pub color: &'static str,
	pub shape: NodeShape,
	pub radius: f64,
}

#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub kind: EdgeKind,
	pub label: Option<String>,
}

impl EdgeInfo {
	fn touches(&self, idx: DefaultNodeIdx) -> bool {
		self.source == idx || self.target == idx
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub physics: PhysicsSettings,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub selected: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub stabilized: bool,
	pub iterations: u32,
	pub fit: Option<FitAnimation>,
	edges: Vec<EdgeInfo>,
}

impl ForceGraphState {
	pub fn new(data: &GraphSnapshot, width: f64, height: f64, physics: PhysicsSettings) -> Self {
		let mut graph = ForceGraph::new(physics.simulation_parameters());

		let mut degree: HashMap<&str, usize> = HashMap::new();
		for edge in &data.edges {
			if data.node(&edge.from).is_some() && data.node(&edge.to).is_some() {
				*degree.entry(edge.from.as_str()).or_default() += 1;
				*degree.entry(edge.to.as_str()).or_default() += 1;
			}
		}

		let mut id_to_idx = HashMap::new();
		for (i, node) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
			let (x, y) = ((100.0 * angle.cos()) as f32, (100.0 * angle.sin()) as f32);
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: short_label(&node.label),
					title: node.title.clone(),
					color: NodeKind::color_for_group(&node.group),
					shape: NodeKind::shape_for_group(&node.group),
					radius: node_radius(degree.get(node.id.as_str()).copied().unwrap_or(0)),
				},
			});
			id_to_idx.insert(node.id.as_str(), idx);
		}

		let mut edges = Vec::new();
		for edge in &data.edges {
			let ends = (id_to_idx.get(edge.from.as_str()), id_to_idx.get(edge.to.as_str()));
			if let (Some(&source), Some(&target)) = ends {
				graph.add_edge(source, target, EdgeData::default());
				edges.push(EdgeInfo {
					source,
					target,
					kind: EdgeKind::from_label(edge.label.as_deref()),
					label: edge.label.clone(),
				});
			}
		}

		Self {
			graph,
			physics,
			edges,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selected: None,
			width,
			height,
			animation_running: true,
			stabilized: false,
			iterations: 0,
			fit: None,
		}
	}

	pub fn edges(&self) -> &[EdgeInfo] {
		&self.edges
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut out = HashMap::new();
		self.graph.visit_nodes(|node| {
			out.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		out
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.transform.k + self.transform.x, gy * self.transform.k + self.transform.y)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.radius + HIT_SLOP {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for edge in &self.edges {
				if edge.source == idx {
					self.hover.neighbors.insert(edge.target);
				} else if edge.target == idx {
					self.hover.neighbors.insert(edge.source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Whether an edge is drawn at full strength: it touches the selected
	/// node or the hovered one.
	pub fn edge_emphasized(&self, edge: &EdgeInfo) -> bool {
		self.selected.is_some_and(|idx| edge.touches(idx))
			|| self.hover.node.is_some_and(|idx| edge.touches(idx))
	}

	/// Starts a press. Returns true when it landed on a node.
	pub fn press(&mut self, sx: f64, sy: f64) -> bool {
		self.drag = DragState::default();
		let Some(idx) = self.node_at_position(sx, sy) else {
			return false;
		};
		let mut start = (0.0, 0.0);
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				start = (node.x(), node.y());
			}
		});
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start_x: start.0,
			node_start_y: start.1,
			moved: false,
		};
		true
	}

	/// Moves the pressed node with the pointer once it has left the click slop.
	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.drag.node_idx.filter(|_| self.drag.active) else {
			return;
		};
		let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
		if !self.drag.moved && (dx * dx + dy * dy).sqrt() < CLICK_SLOP {
			return;
		}
		self.drag.moved = true;
		let k = self.transform.k;
		let (nx, ny) = (
			self.drag.node_start_x + (dx / k) as f32,
			self.drag.node_start_y + (dy / k) as f32,
		);
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = nx;
				node.data.y = ny;
				node.data.is_anchor = true;
			}
		});
		self.wake();
	}

	/// Ends a press. A press that never moved selects its node and returns
	/// the node's id; a dragged node stays pinned where it was dropped.
	pub fn release(&mut self) -> Option<String> {
		let drag = std::mem::take(&mut self.drag);
		let idx = drag.node_idx.filter(|_| drag.active)?;
		if drag.moved {
			return None;
		}
		self.selected = Some(idx);
		self.node_id(idx)
	}

	/// Drops a press without selecting anything. A dragged node stays pinned.
	pub fn cancel_press(&mut self) {
		self.drag = DragState::default();
	}

	/// Restarts a settled simulation, e.g. after a node was dragged.
	pub fn wake(&mut self) {
		if !self.animation_running {
			self.animation_running = true;
			self.iterations = 0;
		}
	}

	/// Cancels the fit animation; user zoom and pan take precedence.
	pub fn take_view_control(&mut self) {
		self.fit = None;
	}

	pub fn fit_target(&self) -> Option<ViewTransform> {
		let mut circles = Vec::new();
		self.graph.visit_nodes(|node| {
			circles.push((node.x() as f64, node.y() as f64, node.data.user_data.radius));
		});
		Bounds::around(circles).map(|b| b.fit(self.width, self.height))
	}

	/// One physics step. Returns the fastest node's speed after the
	/// velocity bound was applied.
	fn step_physics(&mut self, dt: f32) -> f64 {
		let before = self.positions();
		self.graph.update(dt);
		self.apply_spring_length();
		self.apply_central_gravity(dt);

		let max_step = self.physics.max_velocity * dt as f64;
		let mut fastest: f64 = 0.0;
		self.graph.visit_nodes_mut(|node| {
			let Some(&(bx, by)) = before.get(&node.index()) else {
				return;
			};
			let (dx, dy) = (node.data.x as f64 - bx, node.data.y as f64 - by);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist > max_step {
				let scale = max_step / dist;
				node.data.x = (bx + dx * scale) as f32;
				node.data.y = (by + dy * scale) as f32;
			}
			if dt > 0.0 {
				fastest = fastest.max(dist.min(max_step) / dt as f64);
			}
		});
		fastest
	}

	/// Pushes apart linked nodes closer than the spring rest length.
	fn apply_spring_length(&mut self) {
		let positions = self.positions();
		let rest = self.physics.spring_length;
		let k = self.physics.spring_constant as f64;
		let mut push: HashMap<DefaultNodeIdx, (f64, f64)> = HashMap::new();

		for edge in &self.edges {
			if edge.source == edge.target {
				continue;
			}
			let ends = (positions.get(&edge.source), positions.get(&edge.target));
			let (Some(&(x1, y1)), Some(&(x2, y2))) = ends else {
				continue;
			};
			let (dx, dy) = (x2 - x1, y2 - y1);
			let dist = (dx * dx + dy * dy).sqrt().max(0.01);
			if dist >= rest {
				continue;
			}
			let f = (rest - dist) * k * 0.5;
			let (ux, uy) = (dx / dist * f, dy / dist * f);
			let s = push.entry(edge.source).or_default();
			s.0 -= ux;
			s.1 -= uy;
			let t = push.entry(edge.target).or_default();
			t.0 += ux;
			t.1 += uy;
		}

		self.graph.visit_nodes_mut(|node| {
			if node.data.is_anchor {
				return;
			}
			if let Some(&(px, py)) = push.get(&node.index()) {
				node.data.x += px as f32;
				node.data.y += py as f32;
			}
		});
	}

	/// Pulls free nodes toward the origin.
	fn apply_central_gravity(&mut self, dt: f32) {
		let pull = (self.physics.central_gravity * dt as f64).min(1.0) as f32;
		self.graph.visit_nodes_mut(|node| {
			if !node.data.is_anchor {
				node.data.x -= node.data.x * pull;
				node.data.y -= node.data.y * pull;
			}
		});
	}

	fn settle(&mut self) {
		self.animation_running = false;
		if self.stabilized {
			return;
		}
		self.stabilized = true;
		if let Some(target) = self.fit_target() {
			self.fit = Some(FitAnimation::new(self.transform.clone(), target, FIT_DURATION));
		}
	}

	pub fn tick(&mut self, dt: f32) {
		if self.animation_running {
			let fastest = self.step_physics(dt);
			self.iterations += 1;
			let capped = self.iterations >= self.physics.max_iterations;
			if fastest < self.physics.min_velocity || capped {
				self.settle();
			}
		}

		if let Some(anim) = self.fit.as_mut() {
			let (transform, done) = anim.advance(dt as f64);
			self.transform = transform;
			if done {
				self.fit = None;
			}
		}

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use deeptrace_model::{GraphEdge, GraphNode};

	use super::*;

	const DT: f32 = 0.016;

	fn snapshot() -> GraphSnapshot {
		GraphSnapshot {
			nodes: vec![
				GraphNode::new("entity:1", "Victim A", "entity"),
				GraphNode::new("entity:2", "Suspect B", "entity"),
				GraphNode::new("evidence:1", "Knife", "evidence"),
				GraphNode::new("source:1", "Source 1 (official)", "source"),
				GraphNode::new("suspect:1", "Local associates", "suspect"),
			],
			edges: vec![
				GraphEdge::new("entity:1", "entity:2", None),
				GraphEdge::new("entity:1", "entity:2", None),
				GraphEdge::new("evidence:1", "source:1", Some("sourced_from".into())),
				GraphEdge::new("entity:1", "source:1", None),
				GraphEdge::new("entity:1", "ghost:9", None),
			],
		}
	}

	fn state() -> ForceGraphState {
		ForceGraphState::new(&snapshot(), 800.0, 600.0, PhysicsSettings::default())
	}

	fn run_until_settled(s: &mut ForceGraphState) -> u32 {
		let mut ticks = 0;
		while s.animation_running {
			s.tick(DT);
			ticks += 1;
			assert!(ticks <= s.physics.max_iterations, "simulation never settled");
		}
		ticks
	}

	#[test]
	fn dangling_edges_skipped_duplicates_kept() {
		let s = state();
		assert_eq!(s.edges().len(), 4);
	}

	#[test]
	fn nodes_and_edges_carry_their_style() {
		let s = state();
		let mut shapes = HashMap::new();
		s.graph.visit_nodes(|node| {
			shapes.insert(node.data.user_data.id.clone(), node.data.user_data.shape);
		});
		assert_eq!(shapes["evidence:1"], NodeShape::Triangle);
		assert_eq!(shapes["source:1"], NodeShape::Database);
		assert_eq!(shapes["suspect:1"], NodeShape::Star);

		let kinds: Vec<EdgeKind> = s.edges().iter().map(|e| e.kind).collect();
		assert_eq!(kinds.iter().filter(|k| **k == EdgeKind::SourcedFrom).count(), 1);
		assert_eq!(kinds.iter().filter(|k| **k == EdgeKind::Relationship).count(), 3);
	}

	#[test]
	fn radius_follows_degree() {
		assert_eq!(node_radius(0), MIN_NODE_RADIUS);
		assert_eq!(node_radius(3), 10.0);
		assert_eq!(node_radius(100), MAX_NODE_RADIUS);

		let s = state();
		let mut radii = HashMap::new();
		s.graph.visit_nodes(|node| {
			radii.insert(node.data.user_data.id.clone(), node.data.user_data.radius);
		});
		assert_eq!(radii["entity:1"], node_radius(3));
		assert_eq!(radii["evidence:1"], node_radius(1));
	}

	#[test]
	fn long_labels_are_shortened() {
		assert_eq!(short_label("Knife"), "Knife");
		let long = "x".repeat(45);
		let short = short_label(&long);
		assert_eq!(short.chars().count(), LABEL_CHARS + 3);
		assert_eq!(short, format!("{}...", "x".repeat(LABEL_CHARS)));
		assert_eq!(short_label(&"y".repeat(LABEL_CHARS)), "y".repeat(LABEL_CHARS));
	}

	#[test]
	fn simulation_settles_and_starts_fit_once() {
		let mut s = state();
		run_until_settled(&mut s);
		assert!(s.iterations < s.physics.max_iterations, "settled only at the iteration cap");
		assert!(s.stabilized);
		assert!(s.fit.is_some());

		for _ in 0..200 {
			s.tick(DT);
		}
		assert!(s.fit.is_none());
		assert!(!s.animation_running);

		// A drag wakes the simulation, but the second settle does not refit.
		s.wake();
		assert!(s.animation_running);
		run_until_settled(&mut s);
		assert!(s.fit.is_none());
	}

	#[test]
	fn disconnected_pieces_stay_near_the_centre() {
		let mut s = state();
		run_until_settled(&mut s);
		for (x, y) in s.positions().into_values() {
			assert!((x * x + y * y).sqrt() < 300.0, "node drifted to ({x}, {y})");
		}
	}

	#[test]
	fn branching_tree_settles_before_the_cap() {
		let mut tree = GraphSnapshot::default();
		for i in 0..30 {
			tree.nodes.push(GraphNode::new(format!("entity:{i}"), "Person", "entity"));
			if i > 0 {
				let parent = format!("entity:{}", i / 3);
				tree.edges.push(GraphEdge::new(format!("entity:{i}"), parent, None));
			}
		}
		let mut s = ForceGraphState::new(&tree, 800.0, 600.0, PhysicsSettings::default());
		run_until_settled(&mut s);
		assert!(s.iterations < s.physics.max_iterations);
	}

	#[test]
	fn iteration_cap_stops_simulation() {
		let physics = PhysicsSettings {
			min_velocity: 0.0,
			max_iterations: 25,
			..PhysicsSettings::default()
		};
		let mut s = ForceGraphState::new(&snapshot(), 800.0, 600.0, physics);
		assert_eq!(run_until_settled(&mut s), 25);
		assert!(!s.animation_running);
	}

	#[test]
	fn per_tick_movement_is_bounded() {
		let physics = PhysicsSettings {
			max_velocity: 10.0,
			..PhysicsSettings::default()
		};
		let mut s = ForceGraphState::new(&snapshot(), 800.0, 600.0, physics);
		let before = s.positions();
		s.tick(DT);
		let limit = 10.0 * DT as f64 + 1e-3;
		for (idx, (x, y)) in s.positions() {
			let (bx, by) = before[&idx];
			assert!(((x - bx).powi(2) + (y - by).powi(2)).sqrt() <= limit);
		}
	}

	#[test]
	fn fit_lands_every_node_on_screen() {
		let mut s = state();
		run_until_settled(&mut s);
		while s.fit.is_some() {
			s.tick(DT);
		}
		let (w, h) = (s.width, s.height);
		for (_, (x, y)) in s.positions() {
			let (sx, sy) = s.graph_to_screen(x, y);
			assert!((0.0..=w).contains(&sx) && (0.0..=h).contains(&sy));
		}
	}

	#[test]
	fn user_zoom_cancels_fit() {
		let mut s = state();
		run_until_settled(&mut s);
		s.take_view_control();
		let before = s.transform.clone();
		s.tick(DT);
		assert_eq!(s.transform, before);
	}

	#[test]
	fn empty_graph_settles_without_fit() {
		let empty = GraphSnapshot::default();
		let mut s = ForceGraphState::new(&empty, 800.0, 600.0, PhysicsSettings::default());
		s.tick(DT);
		assert!(!s.animation_running);
		assert!(s.fit.is_none());
	}

	fn screen_pos(s: &ForceGraphState, id: &str) -> (f64, f64) {
		let mut pos = (0.0, 0.0);
		s.graph.visit_nodes(|node| {
			if node.data.user_data.id == id {
				pos = (node.x() as f64, node.y() as f64);
			}
		});
		s.graph_to_screen(pos.0, pos.1)
	}

	#[test]
	fn click_selects_and_reports_node() {
		let mut s = state();
		let (sx, sy) = screen_pos(&s, "evidence:1");
		assert!(s.press(sx, sy));
		s.drag_to(sx + 1.0, sy + 1.0);
		assert_eq!(s.release().as_deref(), Some("evidence:1"));
		assert!(s.selected.is_some());

		let edge = s.edges().iter().find(|e| Some(e.source) == s.selected).unwrap().clone();
		assert!(s.edge_emphasized(&edge));
	}

	#[test]
	fn drag_is_not_a_click() {
		let mut s = state();
		let (sx, sy) = screen_pos(&s, "entity:2");
		assert!(s.press(sx, sy));
		s.drag_to(sx + 40.0, sy + 40.0);
		assert_eq!(s.release(), None);
		assert!(s.selected.is_none());
	}

	#[test]
	fn press_on_background_hits_nothing() {
		let mut s = state();
		assert!(!s.press(5.0, 5.0));
		assert_eq!(s.release(), None);
	}

	#[test]
	fn hover_collects_neighbors() {
		let mut s = state();
		let (sx, sy) = screen_pos(&s, "entity:1");
		let idx = s.node_at_position(sx, sy);
		s.set_hover(idx);
		assert_eq!(s.hover.neighbors.len(), 2);
		s.set_hover(None);
		assert_eq!(s.hover.prev_node, idx);
	}
}
