/// Relationship category of an edge, derived from its label.
///
/// The provider labels edges with the relationship name for entity links,
/// `alias` for canonical-entity links, `sourced_from` for provenance,
/// `ACH:<consistency>` for hypothesis scores and `attached_to` for files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
	/// A named relationship between two entities.
	Relationship,
	/// An entity pointing at its canonical record.
	Alias,
	/// A record that came out of a source document.
	SourcedFrom,
	/// An ACH consistency score between a hypothesis and evidence.
	AchScore,
	/// An uploaded file linked to a record.
	AttachedTo,
}

impl EdgeKind {
	/// Classifies an edge label. Unlabelled and unrecognised edges are
	/// relationships.
	pub fn from_label(label: Option<&str>) -> Self {
		match label {
			Some("alias") => EdgeKind::Alias,
			Some("sourced_from") => EdgeKind::SourcedFrom,
			Some("attached_to") => EdgeKind::AttachedTo,
			Some(l) if l.starts_with("ACH:") => EdgeKind::AchScore,
			_ => EdgeKind::Relationship,
		}
	}

	/// Stroke colour.
	pub fn color(self) -> &'static str {
		match self {
			EdgeKind::Relationship => "#3498db",
			EdgeKind::Alias => "#95a5a6",
			EdgeKind::SourcedFrom => "#2ecc71",
			EdgeKind::AchScore => "#f39c12",
			EdgeKind::AttachedTo => "#666666",
		}
	}

	/// Base stroke width before zoom.
	pub fn width(self) -> f64 {
		match self {
			EdgeKind::Relationship | EdgeKind::AchScore => 2.0,
			EdgeKind::Alias | EdgeKind::SourcedFrom | EdgeKind::AttachedTo => 1.0,
		}
	}

	/// Alias links are drawn dashed.
	pub fn dashed(self) -> bool {
		self == EdgeKind::Alias
	}
}
