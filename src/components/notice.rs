use leptos::prelude::*;

/// Non-graph states of the graph container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
	Loading,
	Empty,
	Failed(String),
}

impl Notice {
	pub fn message(&self) -> String {
		match self {
			Notice::Loading => "Loading network...".into(),
			Notice::Empty => "No data in case to visualize.".into(),
			Notice::Failed(reason) => format!("Could not load the case network: {reason}"),
		}
	}

	fn class(&self) -> &'static str {
		match self {
			Notice::Loading => "network-graph-notice loading",
			Notice::Empty => "network-graph-notice empty",
			Notice::Failed(_) => "network-graph-notice error",
		}
	}
}

#[component]
pub fn GraphNotice(notice: Notice) -> impl IntoView {
	let role = if matches!(notice, Notice::Failed(_)) { "alert" } else { "status" };
	view! { <div class=notice.class() role=role>{notice.message()}</div> }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages() {
		assert_eq!(Notice::Empty.message(), "No data in case to visualize.");
		assert!(Notice::Failed("HTTP 500".into()).message().ends_with("HTTP 500"));
	}
}
