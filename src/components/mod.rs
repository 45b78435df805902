pub mod legend;
pub mod network_graph;
pub mod notice;
