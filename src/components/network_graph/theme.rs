/// Fixed drawing style for the case graph.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
	pub background: &'static str,
	pub font_family: &'static str,
	pub font_size: f64,
	pub label_rgb: &'static str,
	pub border_color: &'static str,
	pub border_width: f64,
	pub selected_border: &'static str,
	pub shadow_color: &'static str,
	pub shadow_blur: f64,
	/// Edge opacity with nothing hovered or selected.
	pub edge_alpha: f64,
	pub tooltip_background: &'static str,
	pub tooltip_text: &'static str,
}

impl Theme {
	pub const DARK: Theme = Theme {
		background: "#1a1a2e",
		font_family: "Inter, system-ui, sans-serif",
		font_size: 11.0,
		label_rgb: "230, 230, 240",
		border_color: "#0f0f1c",
		border_width: 1.5,
		selected_border: "#f1c40f",
		shadow_color: "rgba(0, 0, 0, 0.45)",
		shadow_blur: 6.0,
		edge_alpha: 0.45,
		tooltip_background: "rgba(20, 20, 36, 0.92)",
		tooltip_text: "#f0f0f5",
	};

	pub fn font(&self, scale: f64) -> String {
		format!("{}px {}", self.font_size * scale, self.font_family)
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::DARK
	}
}
