use std::collections::HashMap;

use tracing::warn;

use crate::error::{GraphError, Result};

/// Interned node identifier. Dense: ids run from 0 to `node_count() - 1` in
/// insertion order, which is also the tie-break order for every algorithm.
pub type NodeId = u32;

/// One half of an undirected road in the adjacency list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: NodeId,
    pub weight: f64,
}

/// A road between two named locations, as supplied by an ingestion layer.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    /// Distance in kilometres. Must be non-negative.
    pub weight: f64,
}

impl EdgeRecord {
    pub fn new(from: impl Into<String>, to: impl Into<String>, weight: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight,
        }
    }
}

impl<A: Into<String>, B: Into<String>> From<(A, B, f64)> for EdgeRecord {
    fn from((from, to, weight): (A, B, f64)) -> Self {
        Self::new(from, to, weight)
    }
}

/// Undirected weighted graph keyed by location name.
///
/// Names are interned to [`NodeId`]s on insertion. Every road `(a, b, w)` is
/// stored twice, `b` in `a`'s list and `a` in `b`'s list, so the adjacency is
/// always symmetric. Parallel roads are all kept; searches naturally prefer the
/// lighter one.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    names: Vec<String>,
    index: HashMap<String, NodeId>,
    adjacency: Vec<Vec<Edge>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known number of locations.
    pub fn with_capacity(node_count: usize) -> Self {
        Self {
            names: Vec::with_capacity(node_count),
            index: HashMap::with_capacity(node_count),
            adjacency: Vec::with_capacity(node_count),
        }
    }

    /// Build from an edge list without validating weights.
    ///
    /// Negative weights break the shortest-path engine's assumptions; use
    /// [`Graph::try_from_edges`] when the source is not trusted.
    pub fn from_edges<I, E>(edges: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<EdgeRecord>,
    {
        let mut graph = Self::new();
        graph.load_edges(edges);
        graph
    }

    /// Build from an edge list, rejecting negative, NaN and infinite weights.
    pub fn try_from_edges<I, E>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<EdgeRecord>,
    {
        let mut graph = Self::new();
        for record in edges {
            let record = record.into();
            if !record.weight.is_finite() || record.weight < 0.0 {
                warn!(
                    from = %record.from,
                    to = %record.to,
                    weight = record.weight,
                    "rejecting edge with invalid weight"
                );
                return Err(GraphError::InvalidWeight {
                    from: record.from,
                    to: record.to,
                    weight: record.weight,
                });
            }
            graph.add_edge(&record.from, &record.to, record.weight);
        }
        Ok(graph)
    }

    /// Bulk load. Unknown endpoints are registered on first sight.
    pub fn load_edges<I, E>(&mut self, edges: I)
    where
        I: IntoIterator<Item = E>,
        E: Into<EdgeRecord>,
    {
        for record in edges {
            let record = record.into();
            self.add_edge(&record.from, &record.to, record.weight);
        }
    }

    /// Register a location, returning its id. Idempotent.
    pub fn add_node(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = NodeId::try_from(self.names.len())
            .unwrap_or_else(|_| panic!("graph exceeded maximum of {} nodes", NodeId::MAX));
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), id);
        self.adjacency.push(Vec::new());
        id
    }

    /// Add an undirected road. Both directions are inserted.
    pub fn add_edge(&mut self, from: &str, to: &str, weight: f64) {
        let a = self.add_node(from);
        let b = self.add_node(to);
        self.adjacency[a as usize].push(Edge { target: b, weight });
        self.adjacency[b as usize].push(Edge { target: a, weight });
    }

    /// Look up a location by name.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Resolve an id back to its name.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    /// Name lookup for ids produced by this graph.
    pub(crate) fn name_of(&self, id: NodeId) -> &str {
        &self.names[id as usize]
    }

    pub(crate) fn names_of(&self, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|&id| self.name_of(id).to_string()).collect()
    }

    /// Resolve a whole name sequence; `None` if any name is unknown.
    pub(crate) fn ids_of<S: AsRef<str>>(&self, names: &[S]) -> Option<Vec<NodeId>> {
        names.iter().map(|n| self.node_id(n.as_ref())).collect()
    }

    /// Adjacent roads of a node, in insertion order.
    pub fn neighbors(&self, id: NodeId) -> &[Edge] {
        self.adjacency
            .get(id as usize)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Number of adjacency entries (a self-loop counts twice).
    pub fn degree(&self, id: NodeId) -> usize {
        self.neighbors(id).len()
    }

    /// Weight of the lightest road between `a` and `b`, if they are adjacent.
    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<f64> {
        self.neighbors(a)
            .iter()
            .filter(|e| e.target == b)
            .map(|e| e.weight)
            .min_by(f64::total_cmp)
    }

    /// All node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.names.len()).map(|i| i as NodeId)
    }

    /// All location names in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Number of undirected roads (parallel roads counted separately).
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|v| v.len()).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let names_mem: usize = self.names.iter().map(|n| n.capacity() * 2 + 48).sum();
        let edges_mem: usize = self
            .adjacency
            .iter()
            .map(|v| v.capacity() * size_of::<Edge>() + size_of::<Vec<Edge>>())
            .sum();

        names_mem + edges_mem + self.index.len() * size_of::<NodeId>()
    }

    /// Drop every road between `a` and `b`, in both directions.
    pub(crate) fn remove_edge(&mut self, a: NodeId, b: NodeId) {
        self.adjacency[a as usize].retain(|e| e.target != b);
        self.adjacency[b as usize].retain(|e| e.target != a);
    }

    /// Cut a node off from the rest of the graph. The name stays interned so
    /// ids remain stable, but no search can reach it any more.
    pub(crate) fn detach_node(&mut self, id: NodeId) {
        let edges = std::mem::take(&mut self.adjacency[id as usize]);
        for edge in edges {
            if edge.target != id {
                self.adjacency[edge.target as usize].retain(|e| e.target != id);
            }
        }
    }
}
