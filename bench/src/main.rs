use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use roadnet_core::{
    dijkstra, eccentricity, find_alternative, graph_metrics_with, has_cycle,
    shortest_cycle_through, EccentricityResult, Graph, GraphMetricsResult, MetricsConfig,
    PathResult,
};
use serde::Serialize;
use tracing::{debug, info};

/// Benchmark the road-network analysis engine on synthetic networks.
#[derive(Parser)]
#[command(name = "roadnet-bench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Network generator to run
    #[arg(value_enum, default_value = "all")]
    mode: Mode,

    /// Number of locations per generated network
    #[arg(default_value_t = 500)]
    node_count: u64,

    /// Output format
    #[arg(long, default_value = "table")]
    format: OutputFormat,

    /// Run the metrics loop on one thread
    #[arg(long)]
    sequential: bool,

    /// Suppress progress and info messages
    #[arg(long, short)]
    quiet: bool,

    /// Enable verbose debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Run all generators
    All,
    /// Square lattice of towns with jittered road lengths
    Grid,
    /// Branching tree of roads (no cycles)
    Tree,
    /// Ring road with random shortcuts (Watts-Strogatz)
    Smallworld,
    /// Uniform random roads (Erdos-Renyi)
    Random,
    /// Two dense regions joined by a single highway
    Barbell,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

/// Timings and results for one generated network.
#[derive(Serialize)]
struct Report {
    generator: &'static str,
    nodes: usize,
    edges: usize,
    memory_mb: f64,
    has_cycle: bool,
    shortest_path_ms: f64,
    shortest_path: PathResult,
    alternative_ms: f64,
    alternative: Option<PathResult>,
    cycle_ms: f64,
    cycle: Option<Vec<String>>,
    eccentricity_ms: f64,
    eccentricity: Option<EccentricityResult>,
    metrics_ms: f64,
    #[serde(skip)]
    metrics: Option<GraphMetricsResult>,
    radius: Option<f64>,
    diameter: Option<f64>,
    center: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else if !cli.quiet {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    if cli.node_count < 2 {
        bail!("node_count must be at least 2, got {}", cli.node_count);
    }

    let generators: Vec<(&'static str, fn(u64) -> Graph)> = match cli.mode {
        Mode::Grid => vec![("Grid lattice", gen_grid)],
        Mode::Tree => vec![("Branching tree", gen_tree)],
        Mode::Smallworld => vec![("Small-world ring", gen_small_world)],
        Mode::Random => vec![("Erdos-Renyi random", gen_random)],
        Mode::Barbell => vec![("Barbell (region-highway-region)", gen_barbell)],
        Mode::All => vec![
            ("Grid lattice", gen_grid as fn(u64) -> Graph),
            ("Branching tree", gen_tree),
            ("Small-world ring", gen_small_world),
            ("Erdos-Renyi random", gen_random),
            ("Barbell (region-highway-region)", gen_barbell),
        ],
    };

    let config = if cli.sequential {
        MetricsConfig::new().sequential()
    } else {
        MetricsConfig::new()
    };

    let mut reports = Vec::with_capacity(generators.len());
    for (name, generator) in generators {
        info!(generator = name, target_nodes = cli.node_count, "generating network");
        let report = run_benchmark(name, generator, cli.node_count, &config)?;
        if let OutputFormat::Table = cli.format {
            print_table(&report);
        }
        reports.push(report);
    }

    if let OutputFormat::Json = cli.format {
        let json = serde_json::to_string_pretty(&reports).context("serializing reports")?;
        println!("{json}");
    }

    Ok(())
}

fn millis(t: Instant) -> f64 {
    t.elapsed().as_secs_f64() * 1000.0
}

fn run_benchmark(
    name: &'static str,
    generator: fn(u64) -> Graph,
    node_count: u64,
    config: &MetricsConfig,
) -> anyhow::Result<Report> {
    let graph = generator(node_count);
    let first = location(0);
    let last = location(graph.node_count() as u64 - 1);
    debug!(nodes = graph.node_count(), edges = graph.edge_count(), "network ready");

    let t = Instant::now();
    let shortest_path = dijkstra(&graph, &first, &last);
    let shortest_path_ms = millis(t);

    let t = Instant::now();
    let alternative = find_alternative(&graph, &first, &last, &shortest_path.path);
    let alternative_ms = millis(t);

    let t = Instant::now();
    let cycle = shortest_cycle_through(&graph, &first);
    let cycle_ms = millis(t);

    let t = Instant::now();
    let ecc = eccentricity(&graph, &first);
    let eccentricity_ms = millis(t);

    let t = Instant::now();
    let metrics = graph_metrics_with(&graph, config)
        .with_context(|| format!("computing metrics for {name}"))?;
    let metrics_ms = millis(t);

    Ok(Report {
        generator: name,
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        memory_mb: graph.memory_usage() as f64 / 1_048_576.0,
        has_cycle: has_cycle(&graph),
        shortest_path_ms,
        shortest_path,
        alternative_ms,
        alternative,
        cycle_ms,
        cycle,
        eccentricity_ms,
        eccentricity: ecc,
        metrics_ms,
        radius: metrics.as_ref().map(|m| m.radius),
        diameter: metrics.as_ref().map(|m| m.diameter),
        center: metrics.as_ref().map(|m| m.center.clone()).unwrap_or_default(),
        metrics,
    })
}

fn print_table(r: &Report) {
    println!("--- {} ---", r.generator);
    println!(
        "{} locations, {} roads, ~{:.2}MB, cyclic: {}",
        r.nodes, r.edges, r.memory_mb, r.has_cycle
    );
    println!();
    println!("{:<14} {:>10} {:>14} {:>8}", "operation", "time", "distance", "stops");
    println!("{:-<14} {:->10} {:->14} {:->8}", "", "", "", "");

    let row = |op: &str, ms: f64, distance: Option<f64>, stops: Option<usize>| {
        let d = distance.map_or_else(|| "-".to_string(), |d| format!("{d:.1}"));
        let s = stops.map_or_else(|| "-".to_string(), |s| s.to_string());
        println!("{op:<14} {ms:>8.2}ms {d:>14} {s:>8}");
    };

    let sp = &r.shortest_path;
    row(
        "shortest",
        r.shortest_path_ms,
        sp.is_reachable().then_some(sp.distance),
        sp.is_reachable().then_some(sp.path.len()),
    );
    row(
        "alternative",
        r.alternative_ms,
        r.alternative.as_ref().map(|a| a.distance),
        r.alternative.as_ref().map(|a| a.path.len()),
    );
    row("cycle", r.cycle_ms, None, r.cycle.as_ref().map(|c| c.len()));
    row(
        "eccentricity",
        r.eccentricity_ms,
        r.eccentricity.as_ref().map(|e| e.eccentricity),
        r.eccentricity.as_ref().map(|e| e.path.len()),
    );
    row(
        "metrics",
        r.metrics_ms,
        r.diameter,
        r.metrics.as_ref().map(|m| m.diameter_path.len()),
    );

    if let Some(m) = &r.metrics {
        println!();
        println!(
            "radius {:.1} at {}, diameter {:.1} from {}, center size {}",
            m.radius,
            m.radius_node,
            m.diameter,
            m.diameter_node,
            m.center.len()
        );
    }
    println!();
}

// ---------------------------------------------------------------------------
// Generators: deterministic, single-threaded, road lengths 1..=100 km
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
    fn km(&mut self) -> f64 {
        1.0 + (self.next_f64() * 99.0).round()
    }
}

fn location(i: u64) -> String {
    format!("loc_{i}")
}

/// Register locations up front so ids follow numbering.
fn with_locations(node_count: u64) -> Graph {
    let mut graph = Graph::with_capacity(node_count as usize);
    for i in 0..node_count {
        graph.add_node(&location(i));
    }
    graph
}

/// Square lattice: every town joined to its right and lower neighbour.
fn gen_grid(node_count: u64) -> Graph {
    let side = (node_count as f64).sqrt().ceil() as u64;
    let mut graph = with_locations(node_count);
    let mut rng = FastRng::new(2024);

    for i in 0..node_count {
        let (row, col) = (i / side, i % side);
        if col + 1 < side && i + 1 < node_count {
            graph.add_edge(&location(i), &location(i + 1), rng.km());
        }
        if row + 1 < side && i + side < node_count {
            graph.add_edge(&location(i), &location(i + side), rng.km());
        }
    }

    graph
}

/// Branching tree: each town spawns three children. No cycles at all.
fn gen_tree(node_count: u64) -> Graph {
    let mut graph = with_locations(node_count);
    let mut rng = FastRng::new(42);
    let branching = 3u64;

    let mut next_id: u64 = 1;
    let mut frontier: Vec<u64> = vec![0];
    while next_id < node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching as usize);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id >= node_count {
                    break;
                }
                graph.add_edge(&location(parent), &location(next_id), rng.km());
                next_frontier.push(next_id);
                next_id += 1;
            }
        }
        frontier = next_frontier;
    }

    graph
}

/// Small-world (Watts-Strogatz): ring road to K nearest towns, rewired with
/// probability p.
fn gen_small_world(node_count: u64) -> Graph {
    let k = 3u64;
    let p = 0.05f64;
    let mut graph = with_locations(node_count);
    let mut rng = FastRng::new(67890);

    for i in 0..node_count {
        for j in 1..=k {
            let mut neighbor = (i + j) % node_count;
            if rng.next_f64() < p {
                let rewired = rng.next(node_count);
                if rewired != i {
                    neighbor = rewired;
                }
            }
            if neighbor != i {
                graph.add_edge(&location(i), &location(neighbor), rng.km());
            }
        }
    }

    graph
}

/// Erdos-Renyi: ~3 random roads per town. May be disconnected.
fn gen_random(node_count: u64) -> Graph {
    let mut graph = with_locations(node_count);
    let mut rng = FastRng::new(54321);

    for _ in 0..node_count * 3 {
        let from = rng.next(node_count);
        let to = rng.next(node_count);
        if from != to {
            graph.add_edge(&location(from), &location(to), rng.km());
        }
    }

    graph
}

/// Barbell: two dense regions joined by a chain of highway towns.
fn gen_barbell(node_count: u64) -> Graph {
    let bridge_len = 10u64.min(node_count / 3);
    let region = (node_count - bridge_len) / 2;
    let mut graph = with_locations(node_count);
    let mut rng = FastRng::new(99999);

    let mut dense = |graph: &mut Graph, offset: u64, size: u64| {
        if size < 2 {
            return;
        }
        for i in 0..size {
            // Chain first so the region is connected, then random shortcuts.
            if i + 1 < size {
                graph.add_edge(&location(offset + i), &location(offset + i + 1), rng.km());
            }
            for _ in 0..4 {
                let target = rng.next(size);
                if target != i {
                    graph.add_edge(&location(offset + i), &location(offset + target), rng.km());
                }
            }
        }
    };

    dense(&mut graph, 0, region);
    let b_start = region + bridge_len;
    dense(&mut graph, b_start, node_count - b_start);

    // Highway: last town of region A, through the bridge, to first town of region B.
    for id in region.saturating_sub(1)..b_start {
        if id + 1 < node_count {
            graph.add_edge(&location(id), &location(id + 1), rng.km());
        }
    }

    graph
}
