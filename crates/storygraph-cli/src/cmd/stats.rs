//! `sgraph stats`: summary statistics for a story graph.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use storygraph_core::{GraphStats, ValidationConfig};

use super::Outcome;
use crate::input::load_graph;
use crate::output::{OutputMode, kv, render, section};

/// Arguments for `sgraph stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Story graph export (JSON).
    pub file: PathBuf,
}

/// Execute `sgraph stats`. Always [`Outcome::Clean`]; use `check` to gate.
pub fn run_stats(
    args: &StatsArgs,
    output: OutputMode,
    config: &ValidationConfig,
    w: &mut dyn Write,
) -> anyhow::Result<Outcome> {
    let graph = load_graph(&args.file, config.max_nodes)?;
    let stats = GraphStats::from_graph(&graph);
    render(output, &stats, w, render_stats_human)?;
    Ok(Outcome::Clean)
}

fn render_stats_human(stats: &GraphStats, w: &mut dyn Write) -> std::io::Result<()> {
    section(w, "Story graph")?;
    kv(w, "nodes", stats.node_count.to_string())?;
    kv(w, "edges", stats.edge_count.to_string())?;
    kv(w, "parallel edges", stats.parallel_edge_count.to_string())?;
    kv(w, "self-loops", stats.self_loop_count.to_string())?;
    kv(w, "cycles", stats.cycle_count.to_string())?;
    kv(w, "nodes in cycles", stats.nodes_in_cycles.to_string())?;
    kv(w, "isolated nodes", stats.isolated_node_count.to_string())?;
    kv(w, "max out-degree", stats.max_out_degree.to_string())?;
    kv(w, "density", format!("{:.4}", stats.density))
}
