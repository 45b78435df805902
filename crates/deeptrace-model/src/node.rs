use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fill colour for groups outside the known node kinds.
pub const UNKNOWN_COLOR: &str = "#cccccc";

/// Outline drawn for a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeShape {
	/// Circle.
	Dot,
	/// Upward triangle.
	Triangle,
	/// Axis-aligned square.
	Square,
	/// Square rotated by 45 degrees.
	Diamond,
	/// Five-pointed star.
	Star,
	/// Cylinder.
	Database,
}

/// The closed set of things that can appear as a node in a case graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// A person, place or organisation extracted from sources.
	Entity,
	/// An evidence item.
	Evidence,
	/// A timeline event.
	Event,
	/// An ACH hypothesis.
	Hypothesis,
	/// A suspect pool.
	Suspect,
	/// An ingested source document.
	Source,
	/// An uploaded file.
	Attachment,
}

impl NodeKind {
	/// Every kind, in legend order.
	pub const ALL: [NodeKind; 7] = [
		NodeKind::Entity,
		NodeKind::Evidence,
		NodeKind::Event,
		NodeKind::Hypothesis,
		NodeKind::Suspect,
		NodeKind::Source,
		NodeKind::Attachment,
	];

	/// The id prefix and group tag for this kind.
	pub fn as_str(self) -> &'static str {
		match self {
			NodeKind::Entity => "entity",
			NodeKind::Evidence => "evidence",
			NodeKind::Event => "event",
			NodeKind::Hypothesis => "hypothesis",
			NodeKind::Suspect => "suspect",
			NodeKind::Source => "source",
			NodeKind::Attachment => "attachment",
		}
	}

	/// Plural legend caption.
	pub fn label(self) -> &'static str {
		match self {
			NodeKind::Entity => "Entities",
			NodeKind::Evidence => "Evidence",
			NodeKind::Event => "Events",
			NodeKind::Hypothesis => "Hypotheses",
			NodeKind::Suspect => "Suspects",
			NodeKind::Source => "Sources",
			NodeKind::Attachment => "Attachments",
		}
	}

	/// Legend and fill colour.
	pub fn color(self) -> &'static str {
		match self {
			NodeKind::Entity => "#3498db",
			NodeKind::Evidence => "#e74c3c",
			NodeKind::Event => "#2ecc71",
			NodeKind::Hypothesis => "#f39c12",
			NodeKind::Suspect => "#9b59b6",
			NodeKind::Source => "#95a5a6",
			NodeKind::Attachment => "#1abc9c",
		}
	}

	/// Outline used on the canvas.
	pub fn shape(self) -> NodeShape {
		match self {
			NodeKind::Entity | NodeKind::Attachment => NodeShape::Dot,
			NodeKind::Evidence => NodeShape::Triangle,
			NodeKind::Event => NodeShape::Square,
			NodeKind::Hypothesis => NodeShape::Diamond,
			NodeKind::Suspect => NodeShape::Star,
			NodeKind::Source => NodeShape::Database,
		}
	}

	/// Dashboard route that renders the detail panel for the record `id`.
	///
	/// Entities have no detail page of their own, so clicking one does nothing.
	pub fn detail_route(self, id: &str) -> Option<String> {
		let base = match self {
			NodeKind::Entity => return None,
			NodeKind::Evidence => "/evidence",
			NodeKind::Event => "/timeline",
			NodeKind::Hypothesis => "/hypotheses",
			NodeKind::Suspect => "/suspects",
			NodeKind::Source => "/sources",
			NodeKind::Attachment => "/files",
		};
		Some(format!("{base}/{id}"))
	}

	/// Colour for an arbitrary group tag.
	pub fn color_for_group(group: &str) -> &'static str {
		group.parse::<NodeKind>().map(NodeKind::color).unwrap_or(UNKNOWN_COLOR)
	}

	/// Shape for an arbitrary group tag; unknown groups are dots.
	pub fn shape_for_group(group: &str) -> NodeShape {
		group.parse::<NodeKind>().map(NodeKind::shape).unwrap_or(NodeShape::Dot)
	}
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for NodeKind {
	type Err = NodeRefError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		NodeKind::ALL
			.into_iter()
			.find(|kind| kind.as_str() == s)
			.ok_or_else(|| NodeRefError::UnknownKind(s.to_string()))
	}
}

/// Why a node identifier could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeRefError {
	/// The identifier has no `:` separator.
	#[error("node id `{0}` is missing the `<type>:<id>` separator")]
	MissingSeparator(String),
	/// The prefix is not one of the known node kinds.
	#[error("unknown node type `{0}`")]
	UnknownKind(String),
	/// Nothing follows the separator.
	#[error("node id `{0}` has an empty record id")]
	EmptyId(String),
}

/// A parsed `"<type>:<id>"` node identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
	/// Kind prefix.
	pub kind: NodeKind,
	/// Record id within that kind's table.
	pub id: String,
}

impl NodeRef {
	/// Builds the identifier for a database row.
	pub fn new(kind: NodeKind, id: impl fmt::Display) -> Self {
		Self { kind, id: id.to_string() }
	}

	/// Parses `"<type>:<id>"`, splitting on the first `:`.
	pub fn parse(raw: &str) -> Result<Self, NodeRefError> {
		let (kind, id) = raw
			.split_once(':')
			.ok_or_else(|| NodeRefError::MissingSeparator(raw.to_string()))?;
		if id.is_empty() {
			return Err(NodeRefError::EmptyId(raw.to_string()));
		}
		Ok(Self { kind: kind.parse()?, id: id.to_string() })
	}

	/// Route for the detail panel, if this kind has one.
	pub fn detail_route(&self) -> Option<String> {
		self.kind.detail_route(&self.id)
	}
}

impl fmt::Display for NodeRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.kind, self.id)
	}
}

impl FromStr for NodeRef {
	type Err = NodeRefError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		NodeRef::parse(s)
	}
}
