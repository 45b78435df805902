//! Case-graph records shared by the DeepTrace server and the browser graph view.
//!
//! Nothing in here touches the DOM or the database: the node kinds and their
//! detail routes, the `{nodes, edges}` snapshot, filter derivation, side-nav
//! matching and the graph asset load state machine are all plain data.

mod edge;
mod filter;
mod loader;
mod nav;
mod node;
mod snapshot;

pub use edge::EdgeKind;
pub use filter::FilterState;
pub use loader::{AssetLoader, LoadState, LoadStep};
pub use nav::{is_nav_active, normalize_path};
pub use node::{NodeKind, NodeRef, NodeRefError, NodeShape, UNKNOWN_COLOR};
pub use snapshot::{GraphEdge, GraphNode, GraphSnapshot};
