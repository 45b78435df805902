//! Case graph and network analysis routes.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use deeptrace_model::GraphSnapshot;
use serde::Deserialize;

use crate::AppState;
use crate::analysis::{
	BridgeReport, CaseNetwork, Cluster, NetworkSummary, NodeConnections, NodeSummary, PathStep,
	TOP_CONNECTED,
};
use crate::error::{Error, Result};
use crate::provider::build_snapshot;

/// Routes mounted under `/network`.
pub fn routes() -> Router<Arc<AppState>> {
	Router::new()
		.route("/graph", get(get_graph))
		.route("/summary", get(get_summary))
		.route("/connections", get(get_connections))
		.route("/clusters", get(get_clusters))
		.route("/bridges", get(get_bridges))
		.route("/path", get(get_path))
}

fn network(state: &AppState) -> Result<CaseNetwork> {
	Ok(CaseNetwork::from_snapshot(&build_snapshot(&state.store)?))
}

/// GET /network/graph: the full `{nodes, edges}` snapshot.
async fn get_graph(State(state): State<Arc<AppState>>) -> Result<Json<GraphSnapshot>> {
	let snapshot = build_snapshot(&state.store)?;
	tracing::debug!(
		"serving graph for case '{}': {} nodes, {} edges",
		state.config.case,
		snapshot.nodes.len(),
		snapshot.edges.len()
	);
	Ok(Json(snapshot))
}

/// GET /network/summary
async fn get_summary(State(state): State<Arc<AppState>>) -> Result<Json<NetworkSummary>> {
	Ok(Json(network(&state)?.summary()))
}

#[derive(Debug, Deserialize)]
struct ConnectionsQuery {
	node: Option<String>,
	#[serde(rename = "type")]
	kind: Option<String>,
}

#[derive(Debug, serde::Serialize)]
#[serde(untagged)]
enum ConnectionsResponse {
	Node(NodeConnections),
	Ranked { most_connected: Vec<NodeSummary> },
}

/// GET /network/connections?node=evidence:3 or ?type=entity
async fn get_connections(
	State(state): State<Arc<AppState>>,
	Query(query): Query<ConnectionsQuery>,
) -> Result<Json<ConnectionsResponse>> {
	let network = network(&state)?;
	let response = match query.node.as_deref() {
		Some(node) => ConnectionsResponse::Node(network.connections(node)?),
		None => ConnectionsResponse::Ranked {
			most_connected: network.most_connected(query.kind.as_deref(), TOP_CONNECTED),
		},
	};
	Ok(Json(response))
}

/// GET /network/clusters
async fn get_clusters(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Cluster>>> {
	Ok(Json(network(&state)?.clusters()))
}

/// GET /network/bridges
async fn get_bridges(State(state): State<Arc<AppState>>) -> Result<Json<BridgeReport>> {
	Ok(Json(network(&state)?.bridges()))
}

#[derive(Debug, Deserialize)]
struct PathQuery {
	source: Option<String>,
	target: Option<String>,
}

#[derive(Debug, serde::Serialize)]
struct PathResponse {
	path: Option<Vec<PathStep>>,
}

/// GET /network/path?source=entity:1&target=suspect:3
async fn get_path(
	State(state): State<Arc<AppState>>,
	Query(query): Query<PathQuery>,
) -> Result<Json<PathResponse>> {
	let (Some(source), Some(target)) = (
		query.source.filter(|s| !s.is_empty()),
		query.target.filter(|t| !t.is_empty()),
	) else {
		return Err(Error::BadRequest("both source and target are required".into()));
	};
	let path = network(&state)?.shortest_path(&source, &target)?;
	Ok(Json(PathResponse { path }))
}
