//! `sgraph check`: validate a story graph and list its loops.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use storygraph_core::{ErrorCode, ValidationConfig, ValidationReport, validate};

use super::Outcome;
use crate::input::load_graph;
use crate::output::{OutputMode, finding, kv, render, section};

/// Arguments for `sgraph check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Story graph export (JSON).
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    #[serde(flatten)]
    report: ValidationReport,
    /// `E2002` when any loop was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
}

/// Execute `sgraph check`.
pub fn run_check(
    args: &CheckArgs,
    output: OutputMode,
    config: &ValidationConfig,
    w: &mut dyn Write,
) -> anyhow::Result<Outcome> {
    let graph = load_graph(&args.file, config.max_nodes)?;
    let report = validate(&graph, config);
    let clean = report.is_clean();
    let payload = CheckOutput {
        report,
        error_code: (!clean).then_some(ErrorCode::CycleDetected.code()),
    };
    render(output, &payload, w, render_check_human)?;
    Ok(Outcome::from_clean(clean))
}

fn render_check_human(payload: &CheckOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let report = &payload.report;
    let loops: Vec<_> = report.cycles.iter().filter(|c| !c.is_self_loop()).collect();

    if report.is_clean() {
        writeln!(
            w,
            "No cycles found ({} nodes, {} edges).",
            report.stats.node_count, report.stats.edge_count
        )?;
        return Ok(());
    }

    if !loops.is_empty() {
        section(w, &format!("Cycles ({})", loops.len()))?;
        for (idx, cycle) in loops.iter().enumerate() {
            let members = cycle
                .members
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(w, "Cycle {}: {members}", idx + 1)?;
            for (from, to) in &cycle.suggested_breaks {
                writeln!(w, "  break: {from} → {to}")?;
            }
        }
    }

    if !report.self_loops.is_empty() {
        if !loops.is_empty() {
            writeln!(w)?;
        }
        section(w, &format!("Self-loops ({})", report.self_loops.len()))?;
        for node in &report.self_loops {
            writeln!(w, "  {node} → {node}")?;
        }
    }

    writeln!(w)?;
    kv(w, "nodes in cycles", report.stats.nodes_in_cycles.to_string())?;
    finding(w, ErrorCode::CycleDetected)
}
