use proptest::prelude::*;
use roadnet_core::{
    dijkstra, eccentricity, find_alternative, graph_metrics, graph_metrics_with, path_distance,
    shortest_cycle_through, Graph, MetricsConfig, CENTER_TOLERANCE,
};

const EPS: f64 = 1e-6;

fn name(i: usize) -> String {
    format!("v{i}")
}

/// Node `i` gets id `i`. With `simple`, self-loops and repeated pairs are dropped.
fn build(n: usize, edges: &[(usize, usize, u32)], simple: bool) -> Graph {
    let mut g = Graph::with_capacity(n);
    for i in 0..n {
        g.add_node(&name(i));
    }
    let mut seen = std::collections::HashSet::new();
    for &(a, b, w) in edges {
        if simple && (a == b || !seen.insert((a.min(b), a.max(b)))) {
            continue;
        }
        g.add_edge(&name(a), &name(b), f64::from(w));
    }
    g
}

fn arb_edges() -> impl Strategy<Value = (usize, Vec<(usize, usize, u32)>)> {
    (2usize..8).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n, 0u32..20), 1..18),
        )
    })
}

/// Reference distances by repeated relaxation.
fn bellman_ford(n: usize, edges: &[(usize, usize, u32)], source: usize) -> Vec<f64> {
    let mut dist = vec![f64::INFINITY; n];
    dist[source] = 0.0;
    for _ in 0..n {
        for &(a, b, w) in edges {
            let w = f64::from(w);
            if dist[a] + w < dist[b] {
                dist[b] = dist[a] + w;
            }
            if dist[b] + w < dist[a] {
                dist[a] = dist[b] + w;
            }
        }
    }
    dist
}

/// Edge count of the shortest simple cycle through `start`, by exhaustive DFS.
fn brute_force_cycle(g: &Graph, start: usize) -> Option<usize> {
    fn walk(
        g: &Graph,
        start: u32,
        current: u32,
        depth: usize,
        visited: &mut Vec<bool>,
        best: &mut Option<usize>,
    ) {
        for e in g.neighbors(current) {
            if e.target == start && depth >= 2 {
                let len = depth + 1;
                if best.map_or(true, |b| len < b) {
                    *best = Some(len);
                }
            } else if !visited[e.target as usize] {
                visited[e.target as usize] = true;
                walk(g, start, e.target, depth + 1, visited, best);
                visited[e.target as usize] = false;
            }
        }
    }

    let mut visited = vec![false; g.node_count()];
    visited[start] = true;
    let mut best = None;
    walk(g, start as u32, start as u32, 0, &mut visited, &mut best);
    best
}

proptest! {
    #[test]
    fn adjacency_is_symmetric((n, edges) in arb_edges()) {
        let g = build(n, &edges, false);
        for a in g.node_ids() {
            for e in g.neighbors(a) {
                let forth = g.neighbors(a).iter().filter(|x| x.target == e.target && x.weight == e.weight).count();
                let back = g.neighbors(e.target).iter().filter(|x| x.target == a && x.weight == e.weight).count();
                prop_assert_eq!(forth, back);
            }
        }
    }

    #[test]
    fn shortest_paths_are_valid_and_optimal((n, edges) in arb_edges(), s in 0usize..8, t in 0usize..8) {
        let (s, t) = (s % n, t % n);
        let g = build(n, &edges, false);
        let reference = bellman_ford(n, &edges, s);
        let r = dijkstra(&g, &name(s), &name(t));

        if reference[t].is_infinite() {
            prop_assert!(r.distance.is_infinite());
            prop_assert!(r.path.is_empty());
        } else {
            prop_assert!((r.distance - reference[t]).abs() < EPS);
            prop_assert_eq!(r.path.first().cloned(), Some(name(s)));
            prop_assert_eq!(r.path.last().cloned(), Some(name(t)));
            prop_assert!((path_distance(&g, &r.path) - r.distance).abs() < EPS);
        }
    }

    #[test]
    fn alternative_differs_and_is_not_shorter((n, edges) in arb_edges(), s in 0usize..8, t in 0usize..8) {
        let (s, t) = (s % n, t % n);
        let g = build(n, &edges, false);
        let primary = dijkstra(&g, &name(s), &name(t));
        if let Some(alt) = find_alternative(&g, &name(s), &name(t), &primary.path) {
            prop_assert_ne!(&alt.path, &primary.path);
            prop_assert!(alt.distance + EPS >= primary.distance);
            prop_assert!((path_distance(&g, &alt.path) - alt.distance).abs() < EPS);
            prop_assert_eq!(alt.path.first().cloned(), Some(name(s)));
            prop_assert_eq!(alt.path.last().cloned(), Some(name(t)));
            let unique: std::collections::HashSet<_> = alt.path.iter().collect();
            prop_assert_eq!(unique.len(), alt.path.len());
        }
    }

    #[test]
    fn cycle_is_minimal((n, edges) in arb_edges(), start in 0usize..8) {
        let start = start % n;
        let g = build(n, &edges, true);
        let found = shortest_cycle_through(&g, &name(start));
        let expected = brute_force_cycle(&g, start);

        if g.degree(start as u32) < 2 {
            prop_assert!(found.is_none());
        }
        match (found, expected) {
            (None, None) => {}
            (Some(cycle), Some(edges_in_cycle)) => {
                prop_assert_eq!(cycle.len(), edges_in_cycle + 1);
                prop_assert_eq!(cycle.first(), cycle.last());
                prop_assert!((path_distance(&g, &cycle)).is_finite());
            }
            (found, expected) => prop_assert!(false, "found {:?}, expected {:?}", found, expected),
        }
    }

    #[test]
    fn eccentricity_is_max_reachable_distance((n, edges) in arb_edges(), s in 0usize..8) {
        let s = s % n;
        let g = build(n, &edges, false);
        let reference = bellman_ford(n, &edges, s);
        let expected = reference.iter().copied().filter(|d| d.is_finite()).fold(0.0, f64::max);
        let e = eccentricity(&g, &name(s)).unwrap();
        prop_assert!((e.eccentricity - expected).abs() < EPS);
    }

    #[test]
    fn metrics_are_consistent((n, edges) in arb_edges()) {
        let g = build(n, &edges, false);
        let m = graph_metrics(&g).unwrap();
        prop_assert!(m.radius <= m.diameter);
        prop_assert!(!m.center.is_empty());
        for (node, &ecc) in &m.eccentricities {
            let near = (ecc - m.radius).abs() < CENTER_TOLERANCE;
            prop_assert_eq!(near, m.is_center(node));
        }

        let seq = graph_metrics_with(&g, &MetricsConfig::new().sequential()).unwrap().unwrap();
        prop_assert_eq!(m, seq);
    }
}
