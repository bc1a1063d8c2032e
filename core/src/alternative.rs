//! Alternative routes via Yen's deviation search.
//!
//! For every node of a known route (the spur node), the search works on a
//! private copy of the graph with the known route's next road removed and the
//! prefix before the spur node cut off, then joins that prefix with the best
//! remaining spur path. The original graph is never modified.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use crate::graph::{Graph, NodeId};
use crate::path::{path_distance_ids, shortest_path_ids, PathResult};

/// A full candidate route, ordered for a min-heap on distance. Ties pop in
/// discovery order.
#[derive(Debug, Clone)]
struct Candidate {
    distance: f64,
    seq: usize,
    path: Vec<NodeId>,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Candidate pool shared across deviation rounds.
#[derive(Default)]
struct Candidates {
    heap: BinaryHeap<Candidate>,
    next_seq: usize,
}

impl Candidates {
    fn contains(&self, path: &[NodeId]) -> bool {
        self.heap.iter().any(|c| c.path == path)
    }

    fn push(&mut self, distance: f64, path: Vec<NodeId>) {
        self.heap.push(Candidate {
            distance,
            seq: self.next_seq,
            path,
        });
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<Candidate> {
        self.heap.pop()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Deviate from every spur node of `base` and add the surviving routes to `pool`.
///
/// `accepted` holds every route already chosen (including `base`); any of them
/// sharing the root up to the spur node has its next road removed, and no
/// accepted or pooled route is added twice.
fn push_deviations(
    graph: &Graph,
    target: NodeId,
    base: &[NodeId],
    accepted: &[Vec<NodeId>],
    pool: &mut Candidates,
) {
    for i in 0..base.len().saturating_sub(1) {
        let spur = base[i];
        let root = &base[..=i];

        let mut pruned = graph.clone();
        for route in accepted {
            if route.len() > i + 1 && route[..=i] == *root {
                pruned.remove_edge(route[i], route[i + 1]);
            }
        }
        for &node in &root[..i] {
            pruned.detach_node(node);
        }

        let Some((_, spur_path)) = shortest_path_ids(&pruned, spur, target) else {
            trace!(spur = graph.name_of(spur), "no spur path");
            continue;
        };

        let mut full: Vec<NodeId> = root[..i].to_vec();
        full.extend(spur_path);

        // Report the length on the unpruned graph.
        let distance = path_distance_ids(graph, &full);
        if !distance.is_finite() {
            continue;
        }

        if accepted.iter().any(|r| *r == full) || pool.contains(&full) {
            continue;
        }

        trace!(
            spur = graph.name_of(spur),
            distance,
            hops = full.len() - 1,
            "candidate route"
        );
        pool.push(distance, full);
    }
}

/// Best route between `source` and `target` that differs from `primary`.
///
/// `primary` is the route already known, usually the result of
/// [`crate::dijkstra`]. Returns `None` if it has fewer than two locations,
/// names an unknown location, does not run from `source` to `target`, or if no
/// different loop-free route exists.
pub fn find_alternative<S: AsRef<str>>(
    graph: &Graph,
    source: &str,
    target: &str,
    primary: &[S],
) -> Option<PathResult> {
    if primary.len() < 2 {
        return None;
    }
    let primary_ids = graph.ids_of(primary)?;
    let (s, t) = (graph.node_id(source)?, graph.node_id(target)?);
    if primary_ids.first() != Some(&s) || primary_ids.last() != Some(&t) {
        debug!(source, target, "primary route does not connect the requested endpoints");
        return None;
    }

    let accepted = vec![primary_ids];
    let mut pool = Candidates::default();
    push_deviations(graph, t, &accepted[0], &accepted, &mut pool);
    debug!(source, target, candidates = pool.len(), "alternative search finished");

    while let Some(best) = pool.pop() {
        if best.path != accepted[0] {
            return Some(PathResult {
                distance: best.distance,
                path: graph.names_of(&best.path),
            });
        }
    }
    None
}

/// Up to `k` loop-free routes from `source` to `target`, shortest first.
///
/// The first route is the [`crate::dijkstra`] result; each further route is the
/// best deviation from all routes accepted so far. Returns fewer than `k`
/// routes when the graph runs out of distinct ones, and none when `target` is
/// unreachable.
pub fn k_shortest_paths(graph: &Graph, source: &str, target: &str, k: usize) -> Vec<PathResult> {
    if k == 0 {
        return Vec::new();
    }
    let (Some(s), Some(t)) = (graph.node_id(source), graph.node_id(target)) else {
        return Vec::new();
    };
    let Some((first_distance, first)) = shortest_path_ids(graph, s, t) else {
        return Vec::new();
    };

    let mut accepted: Vec<Vec<NodeId>> = vec![first];
    let mut distances = vec![first_distance];
    let mut pool = Candidates::default();

    while accepted.len() < k {
        let base = accepted[accepted.len() - 1].clone();
        push_deviations(graph, t, &base, &accepted, &mut pool);

        let Some(next) = pool.pop() else {
            break;
        };
        distances.push(next.distance);
        accepted.push(next.path);
    }

    debug!(source, target, k, found = accepted.len(), "k shortest paths finished");

    accepted
        .iter()
        .zip(distances)
        .map(|(ids, distance)| PathResult {
            distance,
            path: graph.names_of(ids),
        })
        .collect()
}
