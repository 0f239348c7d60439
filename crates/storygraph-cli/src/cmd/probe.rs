//! `sgraph probe`: would a proposed link close a loop?

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use storygraph_core::{CycleWarning, ErrorCode, NodeId, ValidationConfig, find_cycle_path};

use super::Outcome;
use crate::input::load_graph;
use crate::output::{OutputMode, finding, render};

/// Arguments for `sgraph probe`.
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Story graph export (JSON).
    pub file: PathBuf,
    /// Source node of the proposed edge.
    pub from: u64,
    /// Target node of the proposed edge.
    pub to: u64,
}

#[derive(Debug, Serialize)]
struct ProbeOutput {
    from: NodeId,
    to: NodeId,
    would_create_cycle: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cycle: Option<CycleWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
}

/// Execute `sgraph probe`.
pub fn run_probe(
    args: &ProbeArgs,
    output: OutputMode,
    config: &ValidationConfig,
    w: &mut dyn Write,
) -> anyhow::Result<Outcome> {
    let graph = load_graph(&args.file, config.max_nodes)?;
    let (from, to) = (NodeId(args.from), NodeId(args.to));
    let cycle = find_cycle_path(&graph, from, to);
    let payload = ProbeOutput {
        from,
        to,
        would_create_cycle: cycle.is_some(),
        error_code: cycle.is_some().then_some(ErrorCode::CycleDetected.code()),
        cycle,
    };

    render(output, &payload, w, render_probe_human)?;
    Ok(Outcome::from_clean(!payload.would_create_cycle))
}

fn render_probe_human(payload: &ProbeOutput, w: &mut dyn Write) -> std::io::Result<()> {
    match &payload.cycle {
        Some(warning) => {
            writeln!(w, "{warning}")?;
            finding(w, ErrorCode::CycleDetected)
        }
        None => writeln!(w, "ok: {} → {} keeps the graph acyclic", payload.from, payload.to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CHAIN: &str = r#"{"nodes": [1, 2, 3], "edges": [[1, 2], [2, 3]]}"#;

    fn run(from: u64, to: u64, mode: OutputMode) -> (Outcome, String) {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("story.json");
        std::fs::write(&file, CHAIN).unwrap();

        let args = ProbeArgs { file, from, to };
        let mut out = Vec::new();
        let outcome = run_probe(&args, mode, &ValidationConfig::default(), &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn probe_args_parse_positionals() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ProbeArgs,
        }

        let parsed = Wrapper::parse_from(["test", "story.json", "3", "1"]);
        assert_eq!(parsed.args.from, 3);
        assert_eq!(parsed.args.to, 1);
    }

    #[test]
    fn forward_link_is_safe() {
        let (outcome, text) = run(1, 3, OutputMode::Human);
        assert_eq!(outcome, Outcome::Clean);
        assert_eq!(text, "ok: 1 → 3 keeps the graph acyclic\n");
    }

    #[test]
    fn back_link_prints_closing_path() {
        let (outcome, text) = run(3, 1, OutputMode::Human);
        assert_eq!(outcome, Outcome::Findings);
        assert!(text.contains("3 → 1 → 2 → 3"), "text: {text}");
        assert!(text.contains("hint: Remove one"), "text: {text}");
    }

    #[test]
    fn json_includes_cycle_path() {
        let (_, text) = run(3, 1, OutputMode::Json);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["would_create_cycle"], true);
        assert_eq!(parsed["cycle"]["cycle_path"], serde_json::json!([3, 1, 2, 3]));
        assert_eq!(parsed["error_code"], "E2002");
    }

    #[test]
    fn json_omits_cycle_when_safe() {
        let (_, text) = run(1, 2, OutputMode::Json);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["would_create_cycle"], false);
        assert!(parsed.get("cycle").is_none());
        assert!(parsed.get("error_code").is_none());
    }
}
