use web_sys::HtmlElement;

/// Element ids, endpoints and timings the page glue relies on.
///
/// Every field can be overridden with a `data-*` attribute on `<body>`,
/// e.g. `data-graph-endpoint="/network/graph"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeConfig {
	/// Id of the element the graph renders into.
	pub container_id: String,
	/// Id of the main content region; swaps into it refresh the nav.
	pub main_id: String,
	/// Id of the panel a clicked node's page is loaded into.
	pub detail_id: String,
	/// Graph snapshot URL.
	pub endpoint: String,
	/// Stylesheet loaded once before the first render.
	pub stylesheet: String,
	/// Event fired after each partial swap.
	pub swap_event: String,
	/// Pause between a swap and the graph fetch.
	pub init_delay_ms: i32,
	/// Selector for side-navigation items.
	pub nav_selector: String,
}

impl Default for BridgeConfig {
	fn default() -> Self {
		Self {
			container_id: "network-graph".into(),
			main_id: "main-content".into(),
			detail_id: "detail-panel".into(),
			endpoint: "/network/graph".into(),
			stylesheet: "/static/css/network-graph.css".into(),
			swap_event: "htmx:afterSwap".into(),
			init_delay_ms: 100,
			nav_selector: "[data-nav-path]".into(),
		}
	}
}

impl BridgeConfig {
	/// Applies `(key, value)` overrides, where keys are dataset names
	/// (`graphEndpoint` for `data-graph-endpoint`). Unknown keys and
	/// unparsable delays are ignored.
	pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
		let set = |key: &str, field: &mut String| {
			if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
				*field = value;
			}
		};
		set("graphContainer", &mut self.container_id);
		set("mainRegion", &mut self.main_id);
		set("detailPanel", &mut self.detail_id);
		set("graphEndpoint", &mut self.endpoint);
		set("graphStylesheet", &mut self.stylesheet);
		set("swapEvent", &mut self.swap_event);
		set("navSelector", &mut self.nav_selector);
		if let Some(delay) = lookup("graphInitDelay").and_then(|v| v.trim().parse::<i32>().ok()) {
			self.init_delay_ms = delay.max(0);
		}
		self
	}

	/// Defaults overridden from the `<body>` dataset.
	pub fn from_document() -> Self {
		let body: Option<HtmlElement> =
			web_sys::window().and_then(|w| w.document()).and_then(|d| d.body());
		match body {
			Some(body) => {
				let dataset = body.dataset();
				Self::default().with_overrides(move |key| dataset.get(key))
			}
			None => Self::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;

	#[test]
	fn defaults_match_dashboard_markup() {
		let config = BridgeConfig::default();
		assert_eq!(config.container_id, "network-graph");
		assert_eq!(config.endpoint, "/network/graph");
		assert_eq!(config.init_delay_ms, 100);
	}

	#[test]
	fn dataset_overrides() {
		let data: HashMap<&str, &str> = [
			("graphEndpoint", "/cases/7/network/graph"),
			("graphInitDelay", "250"),
			("swapEvent", "  "),
			("unrelated", "x"),
		]
		.into();
		let config =
			BridgeConfig::default().with_overrides(|key| data.get(key).map(|v| v.to_string()));
		assert_eq!(config.endpoint, "/cases/7/network/graph");
		assert_eq!(config.init_delay_ms, 250);
		assert_eq!(config.swap_event, "htmx:afterSwap");
	}

	#[test]
	fn bad_delay_keeps_default() {
		let config = BridgeConfig::default()
			.with_overrides(|key| (key == "graphInitDelay").then(|| "soon".to_string()));
		assert_eq!(config.init_delay_ms, 100);
	}
}
