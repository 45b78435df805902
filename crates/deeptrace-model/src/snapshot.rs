use serde::{Deserialize, Serialize};

/// A node as served by `/network/graph`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	/// `"<type>:<id>"` identifier.
	pub id: String,
	/// Display label.
	pub label: String,
	/// Colour and filter group, normally the kind prefix.
	pub group: String,
	/// Multi-line tooltip text.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
}

/// An undirected relationship between two nodes. Duplicates are allowed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	/// Identifier of one endpoint.
	pub from: String,
	/// Identifier of the other endpoint.
	pub to: String,
	/// Relationship name shown on hover.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
}

/// The full `{nodes, edges}` graph for the current case.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
	/// All nodes.
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	/// All edges.
	#[serde(default)]
	pub edges: Vec<GraphEdge>,
}

impl GraphNode {
	/// Node with no tooltip.
	pub fn new(id: impl Into<String>, label: impl Into<String>, group: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			group: group.into(),
			title: None,
		}
	}
}

impl GraphEdge {
	/// Edge between `from` and `to`.
	pub fn new(from: impl Into<String>, to: impl Into<String>, label: Option<String>) -> Self {
		Self {
			from: from.into(),
			to: to.into(),
			label,
		}
	}

	/// Whether `id` is one of this edge's endpoints.
	pub fn touches(&self, id: &str) -> bool {
		self.from == id || self.to == id
	}
}

impl GraphSnapshot {
	/// True when there is nothing to draw.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Distinct group tags in first-seen order.
	pub fn groups(&self) -> Vec<&str> {
		let mut groups: Vec<&str> = Vec::new();
		for node in &self.nodes {
			if !groups.contains(&node.group.as_str()) {
				groups.push(&node.group);
			}
		}
		groups
	}

	/// Node by identifier.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_minimal_payload() {
		let snapshot: GraphSnapshot = serde_json::from_str(
			r#"{"nodes":[{"id":"evidence:1","label":"Knife","group":"evidence","shape":"triangle"}],
			    "edges":[{"from":"evidence:1","to":"source:1"}]}"#,
		)
		.unwrap();
		assert_eq!(snapshot.nodes[0].title, None);
		assert_eq!(snapshot.edges[0].label, None);
		assert!(snapshot.edges[0].touches("source:1"));
	}

	#[test]
	fn missing_arrays_decode_as_empty() {
		let snapshot: GraphSnapshot = serde_json::from_str("{}").unwrap();
		assert!(snapshot.is_empty());
		assert!(snapshot.edges.is_empty());
	}

	#[test]
	fn groups_keep_first_seen_order() {
		let snapshot = GraphSnapshot {
			nodes: vec![
				GraphNode::new("source:1", "S", "source"),
				GraphNode::new("entity:1", "A", "entity"),
				GraphNode::new("source:2", "T", "source"),
			],
			edges: vec![],
		};
		assert_eq!(snapshot.groups(), vec!["source", "entity"]);
	}
}
