//! Cycle search: the fewest-stop loop through a location, and whole-graph
//! cycle detection.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::graph::{Graph, NodeId};

/// Unweighted BFS from `start` to `target` that never enters `excluded`.
///
/// Stores parent pointers and rebuilds the path once `target` is reached.
fn bfs_path_excluding(
    graph: &Graph,
    start: NodeId,
    target: NodeId,
    excluded: NodeId,
) -> Option<Vec<NodeId>> {
    if start == target {
        return Some(vec![start]);
    }

    // Start node's parent is itself.
    let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    parent.insert(start, start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for edge in graph.neighbors(current) {
            let next = edge.target;
            if next == excluded || parent.contains_key(&next) {
                continue;
            }
            parent.insert(next, current);
            if next == target {
                return Some(reconstruct(&parent, start, target));
            }
            queue.push_back(next);
        }
    }

    None
}

fn reconstruct(parent: &HashMap<NodeId, NodeId>, start: NodeId, target: NodeId) -> Vec<NodeId> {
    let mut path = vec![target];
    let mut current = target;
    while current != start {
        current = parent[&current];
        path.push(current);
    }
    path.reverse();
    path
}

/// Loop through `start` visiting the fewest locations, ignoring road lengths.
///
/// Returned as `[start, n1, ..., n2, start]`. Every pair of roads leaving
/// `start` is tried: the two far ends are joined by a BFS that may not pass
/// back through `start`. Two parallel roads to the same neighbour form the
/// loop `[start, n, start]`. Self-loops on `start` are ignored.
///
/// `None` if `start` is unknown, has fewer than two roads to other locations,
/// or no pair of its neighbours is connected without it.
pub fn shortest_cycle_through(graph: &Graph, start: &str) -> Option<Vec<String>> {
    let s = graph.node_id(start)?;
    let exits: Vec<NodeId> = graph
        .neighbors(s)
        .iter()
        .map(|e| e.target)
        .filter(|&t| t != s)
        .collect();
    if exits.len() < 2 {
        return None;
    }

    let mut best: Option<Vec<NodeId>> = None;
    let mut pairs_tried = 0usize;
    for (i, &n1) in exits.iter().enumerate() {
        for &n2 in &exits[i + 1..] {
            pairs_tried += 1;
            let Some(between) = bfs_path_excluding(graph, n1, n2, s) else {
                continue;
            };

            let mut cycle = Vec::with_capacity(between.len() + 2);
            cycle.push(s);
            cycle.extend(between);
            cycle.push(s);

            if best.as_ref().map_or(true, |b| cycle.len() < b.len()) {
                best = Some(cycle);
            }
        }
    }

    debug!(
        start,
        pairs_tried,
        found = ?best.as_ref().map(|c| c.len()),
        "cycle search finished"
    );

    best.map(|ids| graph.names_of(&ids))
}

/// Whether the graph contains any cycle.
///
/// Depth-first over every component. Stepping back along the road just
/// arrived on does not count; a self-loop or a second parallel road does.
pub fn has_cycle(graph: &Graph) -> bool {
    let n = graph.node_count();
    let mut visited = vec![false; n];

    for root in graph.node_ids() {
        if visited[root as usize] {
            continue;
        }
        visited[root as usize] = true;

        // (node, parent, index of the next adjacency entry to look at)
        let mut stack: Vec<(NodeId, Option<NodeId>, usize)> = vec![(root, None, 0)];
        while let Some(top) = stack.last_mut() {
            let (node, parent, cursor) = *top;
            let Some(edge) = graph.neighbors(node).get(cursor) else {
                stack.pop();
                continue;
            };
            top.2 += 1;

            let next = edge.target;
            if !visited[next as usize] {
                visited[next as usize] = true;
                stack.push((next, Some(node), 0));
            } else if Some(next) != parent {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cycle(n: usize) -> Graph {
        Graph::from_edges((0..n).map(|i| (format!("n{i}"), format!("n{}", (i + 1) % n), 1.0)))
    }

    #[test]
    fn test_triangle_cycle() {
        let g = Graph::from_edges([("A", "B", 1.0), ("B", "C", 1.0), ("C", "A", 1.0)]);
        let cycle = shortest_cycle_through(&g, "A").unwrap();
        assert_eq!(cycle, vec!["A", "B", "C", "A"]);
    }

    #[test]
    fn test_path_graph_has_no_cycle() {
        let g = Graph::from_edges([("A", "B", 2.0), ("B", "C", 3.0)]);
        assert!(shortest_cycle_through(&g, "B").is_none());
        assert!(shortest_cycle_through(&g, "A").is_none());
        assert!(!has_cycle(&g));
    }

    #[test]
    fn test_unknown_start() {
        let g = make_cycle(4);
        assert!(shortest_cycle_through(&g, "nope").is_none());
    }

    #[test]
    fn test_ring_cycle_covers_ring() {
        let g = make_cycle(6);
        let cycle = shortest_cycle_through(&g, "n0").unwrap();
        assert_eq!(cycle.len(), 7);
        assert_eq!(cycle.first(), cycle.last());
    }

    #[test]
    fn test_picks_fewest_stops_not_lightest() {
        // Short-in-km loop has more stops than the heavy triangle.
        let g = Graph::from_edges([
            ("S", "A", 100.0),
            ("S", "B", 100.0),
            ("A", "B", 100.0),
            ("S", "C", 1.0),
            ("C", "D", 1.0),
            ("D", "E", 1.0),
            ("E", "S", 1.0),
        ]);
        let cycle = shortest_cycle_through(&g, "S").unwrap();
        assert_eq!(cycle, vec!["S", "A", "B", "S"]);
    }

    #[test]
    fn test_cycle_does_not_revisit_start() {
        let g = Graph::from_edges([
            ("S", "A", 1.0),
            ("S", "B", 1.0),
            ("A", "X", 1.0),
            ("X", "Y", 1.0),
            ("Y", "B", 1.0),
        ]);
        let cycle = shortest_cycle_through(&g, "S").unwrap();
        assert_eq!(cycle, vec!["S", "A", "X", "Y", "B", "S"]);
        assert_eq!(cycle.iter().filter(|n| *n == "S").count(), 2);
    }

    #[test]
    fn test_parallel_roads_form_a_loop() {
        let g = Graph::from_edges([("A", "B", 1.0), ("A", "B", 4.0)]);
        assert_eq!(shortest_cycle_through(&g, "A").unwrap(), vec!["A", "B", "A"]);
        assert!(has_cycle(&g));
    }

    #[test]
    fn test_self_loop_is_ignored_for_cycle_through() {
        let g = Graph::from_edges([("A", "A", 1.0), ("A", "B", 1.0)]);
        assert!(shortest_cycle_through(&g, "A").is_none());
        assert!(has_cycle(&g));
    }

    #[test]
    fn test_dead_end_neighbors() {
        // Star: degree 3 at the hub but no pair of leaves is connected.
        let g = Graph::from_edges([("H", "A", 1.0), ("H", "B", 1.0), ("H", "C", 1.0)]);
        assert!(shortest_cycle_through(&g, "H").is_none());
        assert!(!has_cycle(&g));
    }

    #[test]
    fn test_has_cycle_in_second_component() {
        let mut g = Graph::from_edges([("A", "B", 1.0)]);
        g.load_edges([("C", "D", 1.0), ("D", "E", 1.0), ("E", "C", 1.0)]);
        assert!(has_cycle(&g));
    }

    #[test]
    fn test_has_cycle_empty() {
        assert!(!has_cycle(&Graph::new()));
    }
}
