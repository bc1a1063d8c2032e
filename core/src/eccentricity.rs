use tracing::trace;

use crate::graph::{Graph, NodeId};
use crate::path::ShortestPathTree;

/// How far the most distant reachable location is from one source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EccentricityResult {
    pub source: String,
    /// Greatest shortest-path distance to any other reachable location.
    pub eccentricity: f64,
    /// A location at that distance. `None` if nothing else is reachable at a
    /// positive distance.
    pub farthest: Option<String>,
    /// Shortest route from `source` to `farthest`; empty when `farthest` is `None`.
    pub path: Vec<String>,
}

/// Eccentricity of `source`, or `None` if it is not in the graph.
///
/// Locations in other components are skipped, so on a disconnected graph the
/// value covers only the component containing `source`. Ties keep the first
/// location in insertion order.
pub fn eccentricity(graph: &Graph, source: &str) -> Option<EccentricityResult> {
    graph.node_id(source).map(|s| eccentricity_of(graph, s))
}

pub(crate) fn eccentricity_of(graph: &Graph, source: NodeId) -> EccentricityResult {
    let tree = ShortestPathTree::from_id(graph, source);

    let mut max_distance = 0.0;
    let mut farthest: Option<NodeId> = None;
    for target in graph.node_ids() {
        if target == tree.source_id() {
            continue;
        }
        let d = tree.distance_to_id(target);
        if d.is_finite() && d > max_distance {
            max_distance = d;
            farthest = Some(target);
        }
    }

    trace!(
        source = graph.name_of(source),
        eccentricity = max_distance,
        "eccentricity computed"
    );

    EccentricityResult {
        source: graph.name_of(source).to_string(),
        eccentricity: max_distance,
        farthest: farthest.map(|f| graph.name_of(f).to_string()),
        path: farthest
            .map(|f| graph.names_of(&tree.path_to_id(f)))
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::dijkstra;

    fn triangle() -> Graph {
        Graph::from_edges([("A", "B", 1.0), ("B", "C", 1.0), ("C", "A", 1.0)])
    }

    #[test]
    fn test_triangle() {
        let g = triangle();
        let e = eccentricity(&g, "A").unwrap();
        assert_eq!(e.source, "A");
        assert_eq!(e.eccentricity, 1.0);
        let far = e.farthest.as_deref().unwrap();
        assert!(far == "B" || far == "C");
        assert_eq!(e.path, vec!["A", far]);
    }

    #[test]
    fn test_path_graph_end() {
        let g = Graph::from_edges([("A", "B", 2.0), ("B", "C", 3.0)]);
        let e = eccentricity(&g, "A").unwrap();
        assert_eq!(e.eccentricity, 5.0);
        assert_eq!(e.farthest.as_deref(), Some("C"));
        assert_eq!(e.path, vec!["A", "B", "C"]);

        let mid = eccentricity(&g, "B").unwrap();
        assert_eq!(mid.eccentricity, 3.0);
        assert_eq!(mid.farthest.as_deref(), Some("C"));
    }

    #[test]
    fn test_path_matches_dijkstra() {
        let g = Graph::from_edges([
            ("A", "B", 4.0),
            ("A", "C", 1.0),
            ("C", "B", 2.0),
            ("B", "D", 5.0),
        ]);
        let e = eccentricity(&g, "A").unwrap();
        let direct = dijkstra(&g, "A", "D");
        assert_eq!(e.eccentricity, direct.distance);
        assert_eq!(e.path, direct.path);
    }

    #[test]
    fn test_unknown_source() {
        assert!(eccentricity(&triangle(), "Z").is_none());
    }

    #[test]
    fn test_disconnected_uses_own_component() {
        let g = Graph::from_edges([("A", "B", 7.0), ("C", "D", 100.0)]);
        let e = eccentricity(&g, "A").unwrap();
        assert_eq!(e.eccentricity, 7.0);
        assert_eq!(e.farthest.as_deref(), Some("B"));
    }

    #[test]
    fn test_isolated_source() {
        let mut g = triangle();
        g.add_node("Island");
        let e = eccentricity(&g, "Island").unwrap();
        assert_eq!(e.eccentricity, 0.0);
        assert!(e.farthest.is_none());
        assert!(e.path.is_empty());
    }

    #[test]
    fn test_tie_keeps_first_inserted() {
        let g = Graph::from_edges([("H", "X", 2.0), ("H", "Y", 2.0)]);
        let e = eccentricity(&g, "H").unwrap();
        assert_eq!(e.farthest.as_deref(), Some("X"));
    }
}
