use std::f64::consts::{FRAC_PI_2, PI};

use deeptrace_model::NodeShape;
use js_sys::Array;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;
use super::theme::Theme;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Opacity of an edge given the eased hover amount.
pub fn edge_alpha(theme: &Theme, emphasized: bool, highlighted: bool, t: f64) -> f64 {
	if emphasized {
		1.0
	} else if highlighted {
		theme.edge_alpha + (1.0 - theme.edge_alpha) * t
	} else {
		theme.edge_alpha * (1.0 - 0.6 * t)
	}
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_fill_style_str(theme.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx, theme);
	draw_nodes(state, ctx, theme);
	ctx.restore();
	draw_tooltip(state, ctx, theme);
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let k = state.transform.k;
	let t = ease_out_cubic(state.hover.highlight_t);
	let positions = state.positions();

	for edge in state.edges() {
		let ends = (positions.get(&edge.source), positions.get(&edge.target));
		let (Some(&(x1, y1)), Some(&(x2, y2))) = ends else {
			continue;
		};
		let emphasized = state.edge_emphasized(edge);
		let highlighted = state.has_active_highlight()
			&& state.is_highlighted(edge.source)
			&& state.is_highlighted(edge.target);
		let alpha = edge_alpha(theme, emphasized, highlighted, t);

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(edge.kind.color());
		let boost = if emphasized { 1.5 } else { 1.0 };
		ctx.set_line_width(edge.kind.width() * boost / k);
		let _ = ctx.set_line_dash(&dash_pattern(edge.kind.dashed(), k));
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
		ctx.set_global_alpha(1.0);

		if let Some(label) = edge.label.as_deref().filter(|_| emphasized) {
			ctx.set_fill_style_str(&format!("rgba({}, {})", theme.label_rgb, alpha * 0.9));
			ctx.set_font(&theme.font(0.85 / k.max(0.5)));
			ctx.set_text_align("center");
			let _ = ctx.fill_text(label, (x1 + x2) / 2.0, (y1 + y2) / 2.0 - 3.0 / k);
			ctx.set_text_align("start");
		}
	}
	let _ = ctx.set_line_dash(&Array::new());
}

fn dash_pattern(dashed: bool, k: f64) -> JsValue {
	if dashed {
		Array::of2(&JsValue::from_f64(6.0 / k), &JsValue::from_f64(4.0 / k)).into()
	} else {
		Array::new().into()
	}
}

/// Corner points of a regular outline, starting at the top.
fn polygon(x: f64, y: f64, r: f64, corners: usize, inner: Option<f64>) -> Vec<(f64, f64)> {
	let steps = if inner.is_some() { corners * 2 } else { corners };
	(0..steps)
		.map(|i| {
			let angle = -FRAC_PI_2 + i as f64 * 2.0 * PI / steps as f64;
			let radius = match inner {
				Some(ratio) if i % 2 == 1 => r * ratio,
				_ => r,
			};
			(x + radius * angle.cos(), y + radius * angle.sin())
		})
		.collect()
}

/// Builds the outline path for a node; the caller fills and strokes it.
fn trace_shape(ctx: &CanvasRenderingContext2d, shape: NodeShape, x: f64, y: f64, r: f64) {
	ctx.begin_path();
	let points = match shape {
		NodeShape::Dot => {
			let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
			return;
		}
		NodeShape::Square => {
			let side = r * 1.6;
			ctx.rect(x - side / 2.0, y - side / 2.0, side, side);
			return;
		}
		NodeShape::Database => {
			let (w, h, ry) = (r * 1.5, r * 1.8, r * 0.3);
			let (left, top) = (x - w / 2.0, y - h / 2.0);
			let _ = ctx.ellipse(x, top + ry, w / 2.0, ry, 0.0, PI, 2.0 * PI);
			ctx.line_to(left + w, top + h - ry);
			let _ = ctx.ellipse(x, top + h - ry, w / 2.0, ry, 0.0, 0.0, PI);
			ctx.close_path();
			return;
		}
		NodeShape::Triangle => polygon(x, y + r * 0.25, r * 1.25, 3, None),
		NodeShape::Diamond => polygon(x, y, r * 1.2, 4, None),
		NodeShape::Star => polygon(x, y, r * 1.3, 5, Some(0.45)),
	};
	for (i, (px, py)) in points.into_iter().enumerate() {
		if i == 0 {
			ctx.move_to(px, py);
		} else {
			ctx.line_to(px, py);
		}
	}
	ctx.close_path();
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let lifted = has_highlight && state.is_highlighted(idx);
		let radius = if state.is_hovered(idx) {
			info.radius * (1.0 + 0.25 * t)
		} else {
			info.radius
		};
		let alpha = if has_highlight && !lifted { 1.0 - 0.6 * t } else { 1.0 };

		ctx.set_global_alpha(alpha);
		ctx.set_shadow_color(theme.shadow_color);
		ctx.set_shadow_blur(theme.shadow_blur);
		trace_shape(ctx, info.shape, x, y, radius);
		ctx.set_fill_style_str(info.color);
		ctx.fill();
		ctx.set_shadow_blur(0.0);

		let selected = state.selected == Some(idx);
		ctx.set_stroke_style_str(if selected { theme.selected_border } else { theme.border_color });
		let border = if selected { theme.border_width * 2.0 } else { theme.border_width };
		ctx.set_line_width(border / k);
		ctx.stroke();

		ctx.set_fill_style_str(&format!("rgba({}, {})", theme.label_rgb, alpha * 0.9));
		ctx.set_font(&theme.font(1.0 / k.max(0.5)));
		let _ = ctx.fill_text(&info.label, x + radius + 3.0, y + 3.0);
		ctx.set_global_alpha(1.0);
	});
}

/// Draws the hovered node's title in screen space.
fn draw_tooltip(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let Some(idx) = state.hover.node else {
		return;
	};
	let mut anchor = None;
	state.graph.visit_nodes(|node| {
		if node.index() == idx {
			if let Some(title) = node.data.user_data.title.as_deref() {
				let (sx, sy) = state.graph_to_screen(node.x() as f64, node.y() as f64);
				let below = node.data.user_data.radius * state.transform.k;
				anchor = Some((sx, sy + below, title.to_string()));
			}
		}
	});
	let Some((sx, sy, title)) = anchor else {
		return;
	};

	let line_height = theme.font_size + 4.0;
	let lines: Vec<&str> = title.lines().collect();
	ctx.set_font(&theme.font(1.0));
	let width = lines
		.iter()
		.filter_map(|line| ctx.measure_text(line).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max);
	let (w, h) = (width + 16.0, lines.len() as f64 * line_height + 10.0);
	let x = (sx + 12.0).min(state.width - w).max(0.0);
	let y = (sy + 8.0).min(state.height - h).max(0.0);

	ctx.set_fill_style_str(theme.tooltip_background);
	ctx.fill_rect(x, y, w, h);
	ctx.set_fill_style_str(theme.tooltip_text);
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, x + 8.0, y + 5.0 + theme.font_size + i as f64 * line_height);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn emphasized_edges_are_opaque() {
		let theme = Theme::DARK;
		assert_eq!(edge_alpha(&theme, true, false, 0.0), 1.0);
		assert_eq!(edge_alpha(&theme, false, false, 0.0), theme.edge_alpha);
		assert!((edge_alpha(&theme, false, true, 1.0) - 1.0).abs() < 1e-9);
		assert!(edge_alpha(&theme, false, false, 1.0) < theme.edge_alpha);
	}

	#[test]
	fn star_alternates_outer_and_inner_points() {
		let points = polygon(0.0, 0.0, 10.0, 5, Some(0.5));
		assert_eq!(points.len(), 10);
		let (tx, ty) = points[0];
		assert!(tx.abs() < 1e-9 && (ty + 10.0).abs() < 1e-9);
		for (i, (px, py)) in points.iter().enumerate() {
			let expected = if i % 2 == 0 { 10.0 } else { 5.0 };
			assert!(((px * px + py * py).sqrt() - expected).abs() < 1e-9);
		}
	}

	#[test]
	fn diamond_has_four_corners_on_the_axes() {
		let points = polygon(5.0, 5.0, 2.0, 4, None);
		assert_eq!(points.len(), 4);
		assert!((points[1].0 - 7.0).abs() < 1e-9 && (points[1].1 - 5.0).abs() < 1e-9);
	}
}
