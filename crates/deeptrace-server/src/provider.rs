//! Builds the case graph snapshot from the relational store.

use std::collections::HashSet;

use deeptrace_model::{GraphEdge, GraphNode, GraphSnapshot, NodeKind, NodeRef};
use tracing::debug;

use crate::error::Result;
use crate::store::CaseStore;

const LABEL_LIMIT: usize = 60;

/// Cuts `text` to `limit` characters, appending `...` when shortened.
pub fn truncate(text: &str, limit: usize) -> String {
	match text.char_indices().nth(limit) {
		Some((cut, _)) => format!("{}...", &text[..cut]),
		None => text.to_string(),
	}
}

/// Tooltip lines: label, id, kind, then any present details.
fn tooltip(id: &str, label: &str, kind: NodeKind, details: &[(&str, Option<String>)]) -> String {
	let mut lines = vec![label.to_string(), format!("ID: {id}"), format!("Type: {kind}")];
	for (name, value) in details {
		if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
			lines.push(format!("{name}: {value}"));
		}
	}
	lines.join("\n")
}

struct SnapshotBuilder {
	snapshot: GraphSnapshot,
	ids: HashSet<String>,
}

impl SnapshotBuilder {
	fn new() -> Self {
		Self {
			snapshot: GraphSnapshot::default(),
			ids: HashSet::new(),
		}
	}

	fn node(
		&mut self,
		kind: NodeKind,
		row_id: i64,
		label: String,
		details: &[(&str, Option<String>)],
	) {
		let id = NodeRef::new(kind, row_id).to_string();
		let title = tooltip(&id, &label, kind, details);
		self.ids.insert(id.clone());
		self.snapshot.nodes.push(GraphNode {
			id,
			label,
			group: kind.as_str().to_string(),
			title: Some(title),
		});
	}

	/// Adds the edge when both endpoints are known nodes.
	fn edge(&mut self, from: NodeRef, to: NodeRef, label: impl Into<String>) {
		let (from, to) = (from.to_string(), to.to_string());
		if self.ids.contains(&from) && self.ids.contains(&to) {
			self.snapshot.edges.push(GraphEdge::new(from, to, Some(label.into())));
		} else {
			debug!("skipping edge {} -> {}: endpoint missing", from, to);
		}
	}
}

/// Reads every node and relationship of the case.
pub fn build_snapshot(store: &CaseStore) -> Result<GraphSnapshot> {
	let mut b = SnapshotBuilder::new();

	for (id, name, entity_type, confidence) in store.query_all(
		"SELECT id, name, entity_type, confidence FROM entities ORDER BY id",
		|r| {
			Ok((
				r.get::<_, i64>(0)?,
				r.get::<_, String>(1)?,
				r.get::<_, Option<String>>(2)?,
				r.get::<_, Option<String>>(3)?,
			))
		},
	)? {
		b.node(
			NodeKind::Entity,
			id,
			name,
			&[("Entity type", entity_type), ("Confidence", confidence)],
		);
	}

	for (id, name, evidence_type, status) in store.query_all(
		"SELECT id, name, evidence_type, status FROM evidence_items ORDER BY id",
		|r| {
			Ok((
				r.get::<_, i64>(0)?,
				r.get::<_, String>(1)?,
				r.get::<_, Option<String>>(2)?,
				r.get::<_, Option<String>>(3)?,
			))
		},
	)? {
		b.node(
			NodeKind::Evidence,
			id,
			name,
			&[("Evidence type", evidence_type), ("Status", status)],
		);
	}

	for (id, description, timestamp, confidence) in store.query_all(
		"SELECT id, description, timestamp_start, confidence FROM events
		 ORDER BY timestamp_start, id",
		|r| {
			Ok((
				r.get::<_, i64>(0)?,
				r.get::<_, String>(1)?,
				r.get::<_, Option<String>>(2)?,
				r.get::<_, Option<String>>(3)?,
			))
		},
	)? {
		b.node(
			NodeKind::Event,
			id,
			truncate(&description, LABEL_LIMIT),
			&[("Time", timestamp), ("Confidence", confidence)],
		);
	}

	for (id, description, tier) in store.query_all(
		"SELECT id, description, tier FROM hypotheses ORDER BY id",
		|r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?, r.get::<_, Option<String>>(2)?)),
	)? {
		b.node(NodeKind::Hypothesis, id, truncate(&description, LABEL_LIMIT), &[("Tier", tier)]);
	}

	for (id, category, priority) in store.query_all(
		"SELECT id, category, priority FROM suspect_pools ORDER BY id",
		|r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?, r.get::<_, Option<String>>(2)?)),
	)? {
		b.node(NodeKind::Suspect, id, category, &[("Priority", priority)]);
	}

	for (id, source_type) in store.query_all(
		"SELECT id, source_type FROM sources ORDER BY id",
		|r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)),
	)? {
		let label = format!("Source {id} ({source_type})");
		b.node(NodeKind::Source, id, label, &[("Source type", Some(source_type))]);
	}

	for (id, filename, mime_type) in store.query_all(
		"SELECT id, filename, mime_type FROM attachments ORDER BY id",
		|r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?, r.get::<_, Option<String>>(2)?)),
	)? {
		b.node(NodeKind::Attachment, id, filename, &[("MIME type", mime_type)]);
	}

	for (a, b_id, kind) in store.query_all(
		"SELECT entity_a_id, entity_b_id, relationship_type FROM relationships ORDER BY id",
		|r| Ok((r.get::<_, i64>(0)?, r.get::<_, i64>(1)?, r.get::<_, String>(2)?)),
	)? {
		b.edge(NodeRef::new(NodeKind::Entity, a), NodeRef::new(NodeKind::Entity, b_id), kind);
	}

	for (id, canonical) in store.query_all(
		"SELECT id, canonical_id FROM entities WHERE canonical_id IS NOT NULL ORDER BY id",
		|r| Ok((r.get::<_, i64>(0)?, r.get::<_, i64>(1)?)),
	)? {
		b.edge(
			NodeRef::new(NodeKind::Entity, id),
			NodeRef::new(NodeKind::Entity, canonical),
			"alias",
		);
	}

	for (kind, table) in [
		(NodeKind::Evidence, "evidence_items"),
		(NodeKind::Event, "events"),
		(NodeKind::Entity, "entities"),
	] {
		let sql =
			format!("SELECT id, source_id FROM {table} WHERE source_id IS NOT NULL ORDER BY id");
		let links = store.query_all(&sql, |r| Ok((r.get::<_, i64>(0)?, r.get::<_, i64>(1)?)))?;
		for (id, source) in links {
			b.edge(NodeRef::new(kind, id), NodeRef::new(NodeKind::Source, source), "sourced_from");
		}
	}

	for (hypothesis, evidence, consistency) in store.query_all(
		"SELECT hypothesis_id, evidence_id, consistency FROM hypothesis_evidence_scores
		 ORDER BY id",
		|r| Ok((r.get::<_, i64>(0)?, r.get::<_, i64>(1)?, r.get::<_, String>(2)?)),
	)? {
		b.edge(
			NodeRef::new(NodeKind::Hypothesis, hypothesis),
			NodeRef::new(NodeKind::Evidence, evidence),
			format!("ACH:{consistency}"),
		);
	}

	for (attachment, linked_kind, linked_id) in store.query_all(
		"SELECT attachment_id, entity_type, entity_id FROM attachment_links ORDER BY id",
		|r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?, r.get::<_, i64>(2)?)),
	)? {
		let Ok(linked_kind) = linked_kind.parse::<NodeKind>() else {
			debug!("skipping attachment link to unknown kind '{}'", linked_kind);
			continue;
		};
		b.edge(
			NodeRef::new(NodeKind::Attachment, attachment),
			NodeRef::new(linked_kind, linked_id),
			"attached_to",
		);
	}

	debug!(
		"case graph built: {} nodes, {} edges",
		b.snapshot.nodes.len(),
		b.snapshot.edges.len()
	);
	Ok(b.snapshot)
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	/// The fixture case used across the server tests.
	pub(crate) const CASE_SQL: &str = "
		INSERT INTO sources (raw_text, source_type, notes)
			VALUES ('FBI report', 'official', 'Primary source');
		INSERT INTO sources (raw_text, source_type, notes)
			VALUES ('News article', 'news', 'Secondary source');
		INSERT INTO entities (name, entity_type, source_id) VALUES ('Victim A', 'person', 1);
		INSERT INTO entities (name, entity_type, source_id) VALUES ('Suspect B', 'person', 1);
		INSERT INTO entities (name, entity_type, source_id) VALUES ('Location X', 'location', 2);
		INSERT INTO relationships (entity_a_id, entity_b_id, relationship_type, strength)
			VALUES (1, 2, 'known_associate', 0.7);
		INSERT INTO evidence_items (name, evidence_type, status, source_id)
			VALUES ('Knife', 'physical', 'known', 1);
		INSERT INTO hypotheses (description, tier)
			VALUES ('Suspect B committed the crime', 'plausible');
		INSERT INTO hypothesis_evidence_scores
			(hypothesis_id, evidence_id, consistency, diagnostic_weight)
			VALUES (1, 1, 'C', 'H');
		INSERT INTO events (description, timestamp_start, confidence, source_id)
			VALUES ('Crime occurred', '2026-01-15T22:00', 'high', 1);
		INSERT INTO suspect_pools (category, description, priority)
			VALUES ('Known associates', 'People who knew the victim', 'high');
	";

	pub(crate) fn case_store() -> CaseStore {
		let store = CaseStore::open_in_memory().unwrap();
		store.execute_batch(CASE_SQL).unwrap();
		store
	}

	#[test]
	fn builds_nodes_for_every_table() {
		let snapshot = build_snapshot(&case_store()).unwrap();
		let ids: Vec<_> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(
			ids,
			vec![
				"entity:1",
				"entity:2",
				"entity:3",
				"evidence:1",
				"event:1",
				"hypothesis:1",
				"suspect:1",
				"source:1",
				"source:2",
			]
		);
		let source = snapshot.node("source:2").unwrap();
		assert_eq!(source.label, "Source 2 (news)");
		assert_eq!(source.group, "source");
	}

	#[test]
	fn builds_edges_from_links() {
		let snapshot = build_snapshot(&case_store()).unwrap();
		let edges: Vec<_> = snapshot
			.edges
			.iter()
			.map(|e| (e.from.as_str(), e.to.as_str(), e.label.as_deref().unwrap_or("")))
			.collect();
		assert!(edges.contains(&("entity:1", "entity:2", "known_associate")));
		assert!(edges.contains(&("evidence:1", "source:1", "sourced_from")));
		assert!(edges.contains(&("event:1", "source:1", "sourced_from")));
		assert!(edges.contains(&("entity:3", "source:2", "sourced_from")));
		assert!(edges.contains(&("hypothesis:1", "evidence:1", "ACH:C")));
		assert_eq!(edges.len(), 7);
	}

	#[test]
	fn skips_edges_with_missing_endpoints() {
		let store = case_store();
		store
			.execute_batch(
				"PRAGMA foreign_keys = OFF;
				 INSERT INTO relationships (entity_a_id, entity_b_id, relationship_type)
				 VALUES (1, 99, 'sibling');",
			)
			.unwrap();
		let snapshot = build_snapshot(&store).unwrap();
		assert!(!snapshot.edges.iter().any(|e| e.to == "entity:99"));
	}

	#[test]
	fn links_attachments_to_their_records() {
		let store = case_store();
		store
			.execute_batch(
				"INSERT INTO attachments (filename, mime_type) VALUES ('photo.jpg', 'image/jpeg');
				 INSERT INTO attachment_links (attachment_id, entity_type, entity_id)
				 	VALUES (1, 'evidence', 1);",
			)
			.unwrap();
		let snapshot = build_snapshot(&store).unwrap();
		assert_eq!(snapshot.node("attachment:1").unwrap().label, "photo.jpg");
		assert!(
			snapshot
				.edges
				.iter()
				.any(|e| e.from == "attachment:1" && e.to == "evidence:1")
		);
	}

	#[test]
	fn tooltips_list_present_details_only() {
		let snapshot = build_snapshot(&case_store()).unwrap();
		let title = snapshot.node("evidence:1").unwrap().title.clone().unwrap();
		assert_eq!(
			title,
			"Knife\nID: evidence:1\nType: evidence\nEvidence type: physical\nStatus: known"
		);
		let suspect = snapshot.node("suspect:1").unwrap().title.clone().unwrap();
		assert!(suspect.ends_with("Priority: high"));
	}

	#[test]
	fn truncates_on_char_boundaries() {
		assert_eq!(truncate("short", 60), "short");
		assert_eq!(truncate("ééééé", 3), "ééé...");
	}

	#[test]
	fn empty_case_has_empty_graph() {
		let snapshot = build_snapshot(&CaseStore::open_in_memory().unwrap()).unwrap();
		assert!(snapshot.is_empty());
		assert!(snapshot.edges.is_empty());
	}
}
