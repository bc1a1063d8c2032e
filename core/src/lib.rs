//! roadnet-core: analysis engine for weighted road networks.
//!
//! A pure Rust library over an undirected graph of named locations joined by
//! distance-weighted roads. Provides weighted shortest paths, a loop-free
//! alternative route, the fewest-stop cycle through a location, per-location
//! eccentricity and whole-graph radius, diameter and center.
//!
//! Everything is synchronous and side-effect free: algorithms borrow a
//! [`Graph`] and return owned result values. Ingestion, storage and display
//! belong to the caller.

mod alternative;
mod cycle;
mod eccentricity;
mod error;
mod graph;
mod metrics;
mod path;

pub use alternative::{find_alternative, k_shortest_paths};
pub use cycle::{has_cycle, shortest_cycle_through};
pub use eccentricity::{eccentricity, EccentricityResult};
pub use error::{GraphError, Result};
pub use graph::{Edge, EdgeRecord, Graph, NodeId};
pub use metrics::{
    graph_metrics, graph_metrics_with, CancelFlag, GraphMetricsResult, MetricsConfig,
    CENTER_TOLERANCE,
};
pub use path::{dijkstra, path_distance, shortest_path_tree, PathResult, ShortestPathTree};
