use deeptrace_model::NodeKind;
use leptos::prelude::*;

/// Colour key for the node kinds present in the current graph.
#[component]
pub fn GraphLegend(kinds: Vec<NodeKind>) -> impl IntoView {
	view! {
		<div class="network-graph-legend">
			<strong>"DeepTrace Network"</strong>
			<ul>
				{kinds
					.into_iter()
					.map(|kind| {
						let swatch = format!("background: {};", kind.color());
						view! {
							<li>
								<span class="legend-swatch" style=swatch></span>
								{kind.label()}
							</li>
						}
					})
					.collect_view()}
			</ul>
		</div>
	}
}
