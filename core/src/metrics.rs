//! Whole-graph metrics: radius, diameter, center and periphery.
//!
//! One eccentricity per location, then a sequential reduction in insertion
//! order so results are reproducible whether or not the per-node loop ran on
//! the rayon pool.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::debug;

use crate::eccentricity::{eccentricity_of, EccentricityResult};
use crate::error::{GraphError, Result};
use crate::graph::{Graph, NodeId};

/// Eccentricities within this distance of the radius (or diameter) count as equal.
pub const CENTER_TOLERANCE: f64 = 1e-4;

/// Shared flag a caller can raise to stop a running metrics computation.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options for [`graph_metrics_with`].
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Tolerance for center and periphery membership.
    pub tolerance: f64,
    /// Run the per-node eccentricity loop on the rayon pool.
    pub parallel: bool,
    /// Give up once this instant has passed.
    pub deadline: Option<Instant>,
    pub cancel: Option<CancelFlag>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            tolerance: CENTER_TOLERANCE,
            parallel: true,
            deadline: None,
            cancel: None,
        }
    }
}

impl MetricsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn should_stop(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn stop_error(&self, completed: usize, total: usize) -> GraphError {
        if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
            GraphError::Cancelled { completed, total }
        } else {
            GraphError::DeadlineExceeded { completed, total }
        }
    }
}

/// Radius, diameter, center and the per-location detail behind them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GraphMetricsResult {
    /// Smallest eccentricity.
    pub radius: f64,
    /// Largest eccentricity.
    pub diameter: f64,
    /// Locations whose eccentricity is within tolerance of the radius, in insertion order.
    pub center: Vec<String>,
    /// Locations whose eccentricity is within tolerance of the diameter, in insertion order.
    pub periphery: Vec<String>,
    pub eccentricities: HashMap<String, f64>,
    pub details: HashMap<String, EccentricityResult>,
    /// First location (insertion order) whose eccentricity is the radius.
    pub radius_node: String,
    /// First location (insertion order) whose eccentricity is the diameter.
    pub diameter_node: String,
    /// Route from `radius_node` to its farthest location.
    pub radius_path: Vec<String>,
    /// Route from `diameter_node` to its farthest location; a longest shortest path.
    pub diameter_path: Vec<String>,
}

impl GraphMetricsResult {
    pub fn is_center(&self, name: &str) -> bool {
        self.center.iter().any(|c| c == name)
    }

    fn single(name: &str) -> Self {
        let detail = EccentricityResult {
            source: name.to_string(),
            eccentricity: 0.0,
            farthest: Some(name.to_string()),
            path: vec![name.to_string()],
        };
        Self {
            radius: 0.0,
            diameter: 0.0,
            center: vec![name.to_string()],
            periphery: vec![name.to_string()],
            eccentricities: HashMap::from([(name.to_string(), 0.0)]),
            details: HashMap::from([(name.to_string(), detail)]),
            radius_node: name.to_string(),
            diameter_node: name.to_string(),
            radius_path: vec![name.to_string()],
            diameter_path: vec![name.to_string()],
        }
    }
}

/// Metrics with the default configuration: parallel, `1e-4` tolerance, no deadline.
///
/// `None` for an empty graph or when no location has a finite eccentricity.
pub fn graph_metrics(graph: &Graph) -> Option<GraphMetricsResult> {
    // No deadline or cancel flag, so the error arm cannot occur.
    graph_metrics_with(graph, &MetricsConfig::default())
        .ok()
        .flatten()
}

/// Metrics with explicit options.
///
/// Errors only when the deadline passes or the cancel flag is raised before
/// every eccentricity is known.
pub fn graph_metrics_with(
    graph: &Graph,
    config: &MetricsConfig,
) -> Result<Option<GraphMetricsResult>> {
    let total = graph.node_count();
    match total {
        0 => return Ok(None),
        1 => return Ok(Some(GraphMetricsResult::single(graph.name_of(0)))),
        _ => {}
    }

    let per_node = compute_eccentricities(graph, config)?;
    let result = reduce(graph, per_node, config.tolerance);

    if let Some(ref m) = result {
        debug!(
            nodes = total,
            radius = m.radius,
            diameter = m.diameter,
            center = m.center.len(),
            parallel = config.parallel,
            "graph metrics computed"
        );
    }

    Ok(result)
}

/// One eccentricity per node, in id order.
fn compute_eccentricities(
    graph: &Graph,
    config: &MetricsConfig,
) -> Result<Vec<EccentricityResult>> {
    let total = graph.node_count();
    let completed = AtomicUsize::new(0);

    let one = |id: NodeId| -> Option<EccentricityResult> {
        if config.should_stop() {
            return None;
        }
        let result = eccentricity_of(graph, id);
        completed.fetch_add(1, Ordering::Relaxed);
        Some(result)
    };

    let collected: Option<Vec<EccentricityResult>> = if config.parallel {
        let ids: Vec<NodeId> = graph.node_ids().collect();
        // Indexed collect keeps id order regardless of completion order.
        let partial: Vec<Option<EccentricityResult>> = ids.into_par_iter().map(one).collect();
        partial.into_iter().collect()
    } else {
        graph.node_ids().map(one).collect()
    };

    collected.ok_or_else(|| config.stop_error(completed.load(Ordering::Relaxed), total))
}

fn reduce(
    graph: &Graph,
    per_node: Vec<EccentricityResult>,
    tolerance: f64,
) -> Option<GraphMetricsResult> {
    let mut radius = f64::INFINITY;
    let mut diameter = f64::NEG_INFINITY;
    let mut radius_id: Option<NodeId> = None;
    let mut diameter_id: Option<NodeId> = None;

    for (id, result) in graph.node_ids().zip(&per_node) {
        let e = result.eccentricity;
        if !e.is_finite() {
            continue;
        }
        if e < radius {
            radius = e;
            radius_id = Some(id);
        }
        if e > diameter {
            diameter = e;
            diameter_id = Some(id);
        }
    }

    let (radius_id, diameter_id) = (radius_id?, diameter_id?);

    let within = |e: f64, target: f64| e.is_finite() && (e - target).abs() < tolerance;
    let mut center = Vec::new();
    let mut periphery = Vec::new();
    for result in &per_node {
        if within(result.eccentricity, radius) {
            center.push(result.source.clone());
        }
        if within(result.eccentricity, diameter) {
            periphery.push(result.source.clone());
        }
    }

    let radius_path = per_node[radius_id as usize].path.clone();
    let diameter_path = per_node[diameter_id as usize].path.clone();

    let eccentricities = per_node
        .iter()
        .map(|r| (r.source.clone(), r.eccentricity))
        .collect();
    let details = per_node
        .into_iter()
        .map(|r| (r.source.clone(), r))
        .collect();

    Some(GraphMetricsResult {
        radius,
        diameter,
        center,
        periphery,
        eccentricities,
        details,
        radius_node: graph.name_of(radius_id).to_string(),
        diameter_node: graph.name_of(diameter_id).to_string(),
        radius_path,
        diameter_path,
    })
}

impl Graph {
    /// Shorthand for [`graph_metrics`].
    pub fn metrics(&self) -> Option<GraphMetricsResult> {
        graph_metrics(self)
    }

    /// Radius, or `f64::INFINITY` when metrics are undefined.
    pub fn radius(&self) -> f64 {
        self.metrics().map_or(f64::INFINITY, |m| m.radius)
    }

    /// Diameter, or `0.0` when metrics are undefined.
    pub fn diameter(&self) -> f64 {
        self.metrics().map_or(0.0, |m| m.diameter)
    }

    /// Center locations, empty when metrics are undefined.
    pub fn center(&self) -> Vec<String> {
        self.metrics().map(|m| m.center).unwrap_or_default()
    }
}
