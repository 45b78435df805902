use std::collections::{BTreeMap, HashSet};

use crate::snapshot::GraphSnapshot;

/// One visibility flag per group tag.
///
/// Groups with no recorded flag are visible, so a page that is missing a
/// checkbox never hides that part of the graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
	groups: BTreeMap<String, bool>,
}

impl FilterState {
	/// Everything visible.
	pub fn all_visible() -> Self {
		Self::default()
	}

	/// Builds a filter from `(group, checked)` pairs. A `None` reading (no
	/// checkbox on the page) leaves the group enabled.
	pub fn from_readings<I, S>(readings: I) -> Self
	where
		I: IntoIterator<Item = (S, Option<bool>)>,
		S: Into<String>,
	{
		let mut state = Self::default();
		for (group, checked) in readings {
			if let Some(checked) = checked {
				state.set(group, checked);
			}
		}
		state
	}

	/// Records the flag for `group`.
	pub fn set(&mut self, group: impl Into<String>, enabled: bool) {
		self.groups.insert(group.into(), enabled);
	}

	/// Whether nodes of `group` are shown.
	pub fn is_enabled(&self, group: &str) -> bool {
		self.groups.get(group).copied().unwrap_or(true)
	}

	/// Derives the visible subgraph. Edges survive only when both endpoints
	/// are visible; node and edge order is preserved.
	pub fn apply(&self, snapshot: &GraphSnapshot) -> GraphSnapshot {
		let nodes: Vec<_> = snapshot
			.nodes
			.iter()
			.filter(|n| self.is_enabled(&n.group))
			.cloned()
			.collect();
		let visible: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
		let edges = snapshot
			.edges
			.iter()
			.filter(|e| visible.contains(e.from.as_str()) && visible.contains(e.to.as_str()))
			.cloned()
			.collect();
		GraphSnapshot { nodes, edges }
	}
}
