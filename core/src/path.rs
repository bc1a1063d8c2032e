//! Weighted shortest paths (Dijkstra).
//!
//! Every other algorithm in the crate is built on [`dijkstra`] or on the
//! id-level search underneath it. Unreachable targets are a normal outcome,
//! reported as an infinite distance with an empty path.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::trace;

use crate::graph::{Graph, NodeId};

/// A route between two locations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PathResult {
    /// Total length; `f64::INFINITY` when the target is unreachable.
    pub distance: f64,
    /// Location names from source to target; empty when unreachable.
    pub path: Vec<String>,
}

impl PathResult {
    pub fn unreachable() -> Self {
        Self {
            distance: f64::INFINITY,
            path: Vec::new(),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.distance.is_finite() && !self.path.is_empty()
    }

    /// Number of roads travelled.
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Priority-queue entry, ordered so that `BinaryHeap` pops the smallest
/// distance first. Equal distances pop the lower node id first.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    node: NodeId,
    distance: f64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Tentative distances and first-recorded predecessors after a search.
struct Search {
    dist: Vec<f64>,
    prev: Vec<Option<NodeId>>,
}

impl Search {
    /// Run Dijkstra from `source`. With `stop_at`, the loop ends as soon as
    /// that node is finalised; entries already finalised are identical either way.
    fn run(graph: &Graph, source: NodeId, stop_at: Option<NodeId>) -> Self {
        let n = graph.node_count();
        let mut dist = vec![f64::INFINITY; n];
        let mut prev: Vec<Option<NodeId>> = vec![None; n];
        let mut done = vec![false; n];
        let mut queue = BinaryHeap::new();

        dist[source as usize] = 0.0;
        queue.push(QueueEntry {
            node: source,
            distance: 0.0,
        });

        while let Some(QueueEntry { node, distance }) = queue.pop() {
            let u = node as usize;
            if done[u] {
                continue;
            }
            done[u] = true;

            if stop_at == Some(node) {
                break;
            }

            for edge in graph.neighbors(node) {
                let v = edge.target as usize;
                let candidate = distance + edge.weight;
                // Strict improvement only: the first predecessor recorded at a
                // given distance is the one the path follows.
                if candidate < dist[v] {
                    dist[v] = candidate;
                    prev[v] = Some(node);
                    queue.push(QueueEntry {
                        node: edge.target,
                        distance: candidate,
                    });
                }
            }
        }

        Self { dist, prev }
    }

    /// Walk predecessor links back from `target`. Empty if unreachable.
    fn path_to(&self, source: NodeId, target: NodeId) -> Vec<NodeId> {
        if !self.dist[target as usize].is_finite() {
            return Vec::new();
        }

        let mut path = vec![target];
        let mut current = target;
        while current != source {
            match self.prev[current as usize] {
                Some(parent) => {
                    path.push(parent);
                    current = parent;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

/// Id-level shortest path. `None` when `target` is unreachable.
pub(crate) fn shortest_path_ids(
    graph: &Graph,
    source: NodeId,
    target: NodeId,
) -> Option<(f64, Vec<NodeId>)> {
    let search = Search::run(graph, source, Some(target));
    let distance = search.dist[target as usize];
    if !distance.is_finite() {
        return None;
    }
    Some((distance, search.path_to(source, target)))
}

/// Shortest route between two named locations.
///
/// Returns [`PathResult::unreachable`] if either name is unknown or the two
/// locations lie in different components.
pub fn dijkstra(graph: &Graph, source: &str, target: &str) -> PathResult {
    let (Some(s), Some(t)) = (graph.node_id(source), graph.node_id(target)) else {
        return PathResult::unreachable();
    };

    match shortest_path_ids(graph, s, t) {
        Some((distance, ids)) => {
            trace!(source, target, distance, hops = ids.len() - 1, "shortest path found");
            PathResult {
                distance,
                path: graph.names_of(&ids),
            }
        }
        None => PathResult::unreachable(),
    }
}

/// Every shortest path out of one source, from a single full search.
///
/// Answers are identical to calling [`dijkstra`] once per target.
pub struct ShortestPathTree<'g> {
    graph: &'g Graph,
    source: NodeId,
    search: Search,
}

impl<'g> ShortestPathTree<'g> {
    pub(crate) fn from_id(graph: &'g Graph, source: NodeId) -> Self {
        Self {
            graph,
            source,
            search: Search::run(graph, source, None),
        }
    }

    pub fn source(&self) -> &str {
        self.graph.name_of(self.source)
    }

    pub(crate) fn source_id(&self) -> NodeId {
        self.source
    }

    pub(crate) fn distance_to_id(&self, target: NodeId) -> f64 {
        self.search.dist[target as usize]
    }

    pub(crate) fn path_to_id(&self, target: NodeId) -> Vec<NodeId> {
        self.search.path_to(self.source, target)
    }

    /// Distance to `target`; infinite if unknown or unreachable.
    pub fn distance_to(&self, target: &str) -> f64 {
        self.graph
            .node_id(target)
            .map(|t| self.distance_to_id(t))
            .unwrap_or(f64::INFINITY)
    }

    /// Route to `target` as a [`PathResult`].
    pub fn path_to(&self, target: &str) -> PathResult {
        let Some(t) = self.graph.node_id(target) else {
            return PathResult::unreachable();
        };
        let distance = self.distance_to_id(t);
        if !distance.is_finite() {
            return PathResult::unreachable();
        }
        PathResult {
            distance,
            path: self.graph.names_of(&self.path_to_id(t)),
        }
    }

    /// Reachable locations (source included) with their distances, in id order.
    pub fn reachable(&self) -> impl Iterator<Item = (&'g str, f64)> + '_ {
        let graph = self.graph;
        self.search
            .dist
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_finite())
            .map(move |(i, &d)| (graph.name_of(i as NodeId), d))
    }
}

/// Full single-source search. `None` if `source` is not in the graph.
pub fn shortest_path_tree<'g>(graph: &'g Graph, source: &str) -> Option<ShortestPathTree<'g>> {
    graph
        .node_id(source)
        .map(|s| ShortestPathTree::from_id(graph, s))
}

pub(crate) fn path_distance_ids(graph: &Graph, path: &[NodeId]) -> f64 {
    if path.is_empty() {
        return f64::INFINITY;
    }
    let mut total = 0.0;
    for pair in path.windows(2) {
        match graph.edge_weight(pair[0], pair[1]) {
            Some(w) => total += w,
            None => return f64::INFINITY,
        }
    }
    total
}

/// Length of a route given as location names, using the lightest road
/// between each consecutive pair.
///
/// Infinite if the route is empty, names an unknown location, or steps
/// between two locations that are not adjacent.
pub fn path_distance<S: AsRef<str>>(graph: &Graph, path: &[S]) -> f64 {
    match graph.ids_of(path) {
        Some(ids) => path_distance_ids(graph, &ids),
        None => f64::INFINITY,
    }
}
