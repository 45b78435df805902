//! Network statistics over the case graph: components, hubs, bridges, paths.

use std::collections::{BTreeMap, HashMap};

use deeptrace_model::{GraphNode, GraphSnapshot};
use petgraph::algo::{astar, connected_components};
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::error::{Error, Result};

/// Hubs listed by [`CaseNetwork::most_connected`].
pub const TOP_CONNECTED: usize = 20;

/// A node with its degree, as reported by every analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSummary {
	/// `"<type>:<id>"` identifier.
	pub id: String,
	/// Display label.
	pub label: String,
	/// Group tag of the node.
	pub kind: String,
	/// Number of incident edges, duplicates included.
	pub degree: usize,
}

/// Whole-graph statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSummary {
	/// Node count.
	pub nodes: usize,
	/// Edge count.
	pub edges: usize,
	/// Number of connected components.
	pub components: usize,
	/// Absent for graphs with fewer than two nodes.
	pub density: Option<f64>,
	/// Node count per group tag.
	pub nodes_by_kind: BTreeMap<String, usize>,
	/// Edge count per label.
	pub edges_by_label: BTreeMap<String, usize>,
	/// Nodes without any edge.
	pub isolated: Vec<NodeSummary>,
}

/// One node adjacent to the one asked about.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
	/// The adjacent node.
	pub node: NodeSummary,
	/// Label of the linking edge.
	pub via: String,
}

/// A node with its direct neighbours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeConnections {
	/// The node asked about.
	pub node: NodeSummary,
	/// Everything one edge away.
	pub neighbors: Vec<Neighbor>,
}

/// One connected component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
	/// Number of nodes.
	pub size: usize,
	/// Node count per group tag.
	pub kinds: BTreeMap<String, usize>,
	/// Members, most connected first.
	pub nodes: Vec<NodeSummary>,
}

/// An edge whose removal disconnects the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BridgeEdge {
	/// One endpoint.
	pub from: NodeSummary,
	/// The other endpoint.
	pub to: NodeSummary,
	/// Edge label.
	pub label: String,
}

/// Single points of failure in the case graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BridgeReport {
	/// Set when the graph is too small for the analysis to mean anything.
	pub insufficient: bool,
	/// Nodes whose removal splits a component.
	pub articulation_points: Vec<NodeSummary>,
	/// Edges whose removal splits a component.
	pub bridges: Vec<BridgeEdge>,
}

/// One hop of a shortest path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathStep {
	/// Node reached at this step.
	pub node: NodeSummary,
	/// Edge label from the previous step; `None` on the first step.
	pub via: Option<String>,
}

/// Undirected multigraph view of a snapshot. Edges with unknown endpoints
/// are left out.
pub struct CaseNetwork {
	graph: UnGraph<GraphNode, String>,
	index: HashMap<String, NodeIndex>,
}

impl CaseNetwork {
	/// Indexes a snapshot.
	pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
		let mut graph = UnGraph::with_capacity(snapshot.nodes.len(), snapshot.edges.len());
		let mut index = HashMap::new();
		for node in &snapshot.nodes {
			if index.contains_key(&node.id) {
				continue;
			}
			let idx = graph.add_node(node.clone());
			index.insert(node.id.clone(), idx);
		}
		for edge in &snapshot.edges {
			if let (Some(&a), Some(&b)) = (index.get(&edge.from), index.get(&edge.to)) {
				let label = edge.label.clone().unwrap_or_else(|| "unknown".into());
				graph.add_edge(a, b, label);
			}
		}
		Self { graph, index }
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.graph.node_count()
	}

	/// Number of edges, duplicates included.
	pub fn edge_count(&self) -> usize {
		self.graph.edge_count()
	}

	fn degree(&self, idx: NodeIndex) -> usize {
		self.graph.edges(idx).count()
	}

	fn summary_of(&self, idx: NodeIndex) -> NodeSummary {
		let node = &self.graph[idx];
		NodeSummary {
			id: node.id.clone(),
			label: node.label.clone(),
			kind: node.group.clone(),
			degree: self.degree(idx),
		}
	}

	fn lookup(&self, id: &str) -> Result<NodeIndex> {
		self.index
			.get(id)
			.copied()
			.ok_or_else(|| Error::NotFound(format!("node '{id}'")))
	}

	fn other_end(&self, edge: EdgeIndex, from: NodeIndex) -> NodeIndex {
		let (a, b) = self.graph.edge_endpoints(edge).unwrap_or((from, from));
		if a == from { b } else { a }
	}

	/// Totals, per-kind and per-label counts, and isolated nodes.
	pub fn summary(&self) -> NetworkSummary {
		let n = self.node_count();
		let m = self.edge_count();

		let mut nodes_by_kind = BTreeMap::new();
		for node in self.graph.node_weights() {
			*nodes_by_kind.entry(node.group.clone()).or_insert(0) += 1;
		}
		let mut edges_by_label = BTreeMap::new();
		for label in self.graph.edge_weights() {
			*edges_by_label.entry(label.clone()).or_insert(0) += 1;
		}

		NetworkSummary {
			nodes: n,
			edges: m,
			components: connected_components(&self.graph),
			density: (n > 1).then(|| 2.0 * m as f64 / (n as f64 * (n as f64 - 1.0))),
			nodes_by_kind,
			edges_by_label,
			isolated: self
				.graph
				.node_indices()
				.filter(|&idx| self.degree(idx) == 0)
				.map(|idx| self.summary_of(idx))
				.collect(),
		}
	}

	/// A node and everything directly linked to it, sorted by neighbour id.
	pub fn connections(&self, id: &str) -> Result<NodeConnections> {
		let idx = self.lookup(id)?;
		let mut neighbors: Vec<Neighbor> = self
			.graph
			.edges(idx)
			.map(|edge| Neighbor {
				node: self.summary_of(self.other_end(edge.id(), idx)),
				via: edge.weight().clone(),
			})
			.collect();
		neighbors.sort_by(|a, b| a.node.id.cmp(&b.node.id));
		Ok(NodeConnections {
			node: self.summary_of(idx),
			neighbors,
		})
	}

	/// Highest-degree nodes, optionally of one kind. Unconnected nodes are
	/// never listed.
	pub fn most_connected(&self, kind: Option<&str>, limit: usize) -> Vec<NodeSummary> {
		let mut ranked: Vec<NodeSummary> = self
			.graph
			.node_indices()
			.filter(|&idx| kind.is_none_or(|k| self.graph[idx].group == k))
			.map(|idx| self.summary_of(idx))
			.filter(|s| s.degree > 0)
			.collect();
		ranked.sort_by(|a, b| b.degree.cmp(&a.degree));
		ranked.truncate(limit);
		ranked
	}

	/// Connected components, largest first.
	pub fn clusters(&self) -> Vec<Cluster> {
		let mut sets = UnionFind::<usize>::new(self.node_count());
		for edge in self.graph.edge_references() {
			sets.union(edge.source().index(), edge.target().index());
		}

		let mut grouped: BTreeMap<usize, Vec<NodeIndex>> = BTreeMap::new();
		for idx in self.graph.node_indices() {
			grouped.entry(sets.find(idx.index())).or_default().push(idx);
		}

		let mut clusters: Vec<Cluster> = grouped
			.into_values()
			.map(|members| {
				let mut kinds = BTreeMap::new();
				for &idx in &members {
					*kinds.entry(self.graph[idx].group.clone()).or_insert(0) += 1;
				}
				Cluster {
					size: members.len(),
					kinds,
					nodes: members.into_iter().map(|idx| self.summary_of(idx)).collect(),
				}
			})
			.collect();
		clusters.sort_by(|a, b| b.size.cmp(&a.size));
		clusters
	}

	/// Articulation points and bridge edges (Tarjan, iterative).
	pub fn bridges(&self) -> BridgeReport {
		if self.node_count() < 3 {
			return BridgeReport {
				insufficient: true,
				..BridgeReport::default()
			};
		}

		const UNSEEN: usize = usize::MAX;
		let n = self.node_count();
		let mut disc = vec![UNSEEN; n];
		let mut low = vec![0; n];
		let mut is_cut = vec![false; n];
		let mut bridge_edges = Vec::new();
		let mut timer = 0;

		let adjacent = |u: NodeIndex| -> Vec<(NodeIndex, EdgeIndex)> {
			self.graph
				.edges(u)
				.map(|e| (self.other_end(e.id(), u), e.id()))
				.collect()
		};

		for root in self.graph.node_indices() {
			if disc[root.index()] != UNSEEN {
				continue;
			}
			disc[root.index()] = timer;
			low[root.index()] = timer;
			timer += 1;
			let mut root_children = 0;

			// (node, edge we arrived by, neighbours, cursor)
			let mut stack = vec![(root, None::<EdgeIndex>, adjacent(root), 0usize)];
			while let Some(frame) = stack.last_mut() {
				let (u, arrived_by) = (frame.0, frame.1);
				let next = frame.2.get(frame.3).copied();
				frame.3 += 1;

				match next {
					Some((_, e)) if Some(e) == arrived_by => {}
					Some((v, e)) if disc[v.index()] == UNSEEN => {
						disc[v.index()] = timer;
						low[v.index()] = timer;
						timer += 1;
						if u == root {
							root_children += 1;
						}
						stack.push((v, Some(e), adjacent(v), 0));
					}
					Some((v, _)) => {
						low[u.index()] = low[u.index()].min(disc[v.index()]);
					}
					None => {
						stack.pop();
						if let Some(parent) = stack.last() {
							let p = parent.0;
							low[p.index()] = low[p.index()].min(low[u.index()]);
							if low[u.index()] > disc[p.index()] {
								bridge_edges.extend(arrived_by);
							}
							if p != root && low[u.index()] >= disc[p.index()] {
								is_cut[p.index()] = true;
							}
						}
					}
				}
			}
			if root_children > 1 {
				is_cut[root.index()] = true;
			}
		}

		let mut articulation_points: Vec<NodeSummary> = self
			.graph
			.node_indices()
			.filter(|idx| is_cut[idx.index()])
			.map(|idx| self.summary_of(idx))
			.collect();
		articulation_points.sort_by(|a, b| b.degree.cmp(&a.degree).then_with(|| a.id.cmp(&b.id)));

		let bridges = bridge_edges
			.into_iter()
			.filter_map(|e| {
				let (a, b) = self.graph.edge_endpoints(e)?;
				Some(BridgeEdge {
					from: self.summary_of(a),
					to: self.summary_of(b),
					label: self.graph[e].clone(),
				})
			})
			.collect();

		BridgeReport {
			insufficient: false,
			articulation_points,
			bridges,
		}
	}

	/// Fewest-hops path from `source` to `target`, or `None` when they are
	/// in different components.
	pub fn shortest_path(&self, source: &str, target: &str) -> Result<Option<Vec<PathStep>>> {
		let (start, goal) = (self.lookup(source)?, self.lookup(target)?);
		let Some((_, path)) = astar(&self.graph, start, |n| n == goal, |_| 1usize, |_| 0) else {
			return Ok(None);
		};

		let steps = path
			.iter()
			.enumerate()
			.map(|(i, &idx)| PathStep {
				node: self.summary_of(idx),
				via: i
					.checked_sub(1)
					.and_then(|prev| self.graph.find_edge(path[prev], idx))
					.map(|e| self.graph[e].clone()),
			})
			.collect();
		Ok(Some(steps))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::provider::build_snapshot;
	use crate::provider::tests::case_store;
	use deeptrace_model::GraphEdge;

	fn network(nodes: &[(&str, &str)], edges: &[(&str, &str)]) -> CaseNetwork {
		CaseNetwork::from_snapshot(&GraphSnapshot {
			nodes: nodes.iter().map(|(id, group)| GraphNode::new(*id, *id, *group)).collect(),
			edges: edges
				.iter()
				.map(|(a, b)| GraphEdge::new(*a, *b, Some("link".into())))
				.collect(),
		})
	}

	fn ids(nodes: &[NodeSummary]) -> Vec<&str> {
		nodes.iter().map(|n| n.id.as_str()).collect()
	}

	#[test]
	fn summary_of_fixture_case() {
		let net = CaseNetwork::from_snapshot(&build_snapshot(&case_store()).unwrap());
		let summary = net.summary();
		assert_eq!(summary.nodes, 9);
		assert_eq!(summary.edges, 7);
		assert_eq!(summary.nodes_by_kind["entity"], 3);
		assert_eq!(summary.edges_by_label["sourced_from"], 5);
		assert_eq!(ids(&summary.isolated), vec!["suspect:1"]);
		// suspect pool alone, everything else hangs off the two sources
		assert_eq!(summary.components, 3);
		assert!(summary.density.unwrap() > 0.0);
	}

	#[test]
	fn empty_network_has_no_density() {
		let summary = network(&[], &[]).summary();
		assert_eq!(summary.nodes, 0);
		assert_eq!(summary.density, None);
	}

	#[test]
	fn connections_list_neighbours_with_edge_labels() {
		let net = CaseNetwork::from_snapshot(&build_snapshot(&case_store()).unwrap());
		let conn = net.connections("entity:1").unwrap();
		assert_eq!(conn.node.label, "Victim A");
		let via: Vec<_> = conn
			.neighbors
			.iter()
			.map(|n| (n.node.id.as_str(), n.via.as_str()))
			.collect();
		assert_eq!(via, vec![("entity:2", "known_associate"), ("source:1", "sourced_from")]);
		assert!(matches!(net.connections("entity:99"), Err(Error::NotFound(_))));
	}

	#[test]
	fn most_connected_ranks_by_degree_and_filters_kind() {
		let net = CaseNetwork::from_snapshot(&build_snapshot(&case_store()).unwrap());
		let top = net.most_connected(None, TOP_CONNECTED);
		assert_eq!(top[0].id, "source:1");
		assert_eq!(top[0].degree, 4);
		assert!(top.iter().all(|n| n.degree > 0));

		let entities = net.most_connected(Some("entity"), TOP_CONNECTED);
		assert!(entities.iter().all(|n| n.kind == "entity"));
		assert_eq!(entities.len(), 3);
	}

	#[test]
	fn clusters_are_sorted_largest_first() {
		let net = network(
			&[
				("a:1", "entity"),
				("a:2", "entity"),
				("a:3", "entity"),
				("b:1", "source"),
				("b:2", "source"),
			],
			&[("a:1", "a:2"), ("a:2", "a:3"), ("b:1", "b:2")],
		);
		let clusters = net.clusters();
		assert_eq!(clusters.len(), 2);
		assert_eq!(clusters[0].size, 3);
		assert_eq!(clusters[0].kinds["entity"], 3);
		assert_eq!(clusters[1].kinds["source"], 2);
	}

	#[test]
	fn chain_has_middle_cut_vertices_and_every_edge_is_a_bridge() {
		let net = network(
			&[("n:1", "x"), ("n:2", "x"), ("n:3", "x"), ("n:4", "x")],
			&[("n:1", "n:2"), ("n:2", "n:3"), ("n:3", "n:4")],
		);
		let report = net.bridges();
		assert!(!report.insufficient);
		let mut cut = ids(&report.articulation_points);
		cut.sort();
		assert_eq!(cut, vec!["n:2", "n:3"]);
		assert_eq!(report.bridges.len(), 3);
	}

	#[test]
	fn cycles_and_parallel_edges_are_not_bridges() {
		let triangle = network(
			&[("t:1", "x"), ("t:2", "x"), ("t:3", "x")],
			&[("t:1", "t:2"), ("t:2", "t:3"), ("t:3", "t:1")],
		);
		let report = triangle.bridges();
		assert!(report.articulation_points.is_empty());
		assert!(report.bridges.is_empty());

		let doubled = network(
			&[("d:1", "x"), ("d:2", "x"), ("d:3", "x")],
			&[("d:1", "d:2"), ("d:1", "d:2"), ("d:2", "d:3")],
		);
		let report = doubled.bridges();
		assert_eq!(report.bridges.len(), 1);
		assert_eq!(report.bridges[0].from.id, "d:2");
		assert_eq!(ids(&report.articulation_points), vec!["d:2"]);
	}

	#[test]
	fn small_graphs_are_insufficient_for_bridges() {
		let report = network(&[("a:1", "x"), ("a:2", "x")], &[("a:1", "a:2")]).bridges();
		assert!(report.insufficient);
		assert!(report.bridges.is_empty());
	}

	#[test]
	fn path_through_source_reports_hops() {
		let net = CaseNetwork::from_snapshot(&build_snapshot(&case_store()).unwrap());
		let path = net.shortest_path("evidence:1", "event:1").unwrap().unwrap();
		let hops: Vec<_> = path
			.iter()
			.map(|s| (s.node.id.as_str(), s.via.as_deref()))
			.collect();
		assert_eq!(
			hops,
			vec![
				("evidence:1", None),
				("source:1", Some("sourced_from")),
				("event:1", Some("sourced_from")),
			]
		);
	}

	#[test]
	fn path_between_components_is_none() {
		let net = CaseNetwork::from_snapshot(&build_snapshot(&case_store()).unwrap());
		assert_eq!(net.shortest_path("entity:1", "suspect:1").unwrap(), None);
		assert!(matches!(net.shortest_path("entity:1", "nope:1"), Err(Error::NotFound(_))));
	}
}
