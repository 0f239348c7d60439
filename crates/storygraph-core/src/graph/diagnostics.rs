//! Validation reports built on the probe and the SCC analyzer.
//!
//! # Overview
//!
//! [`validate`] is what the editor runs on save or on an explicit "check
//! story" action. It never changes the answers of
//! [`detect_cycles`](crate::graph::scc::detect_cycles); it only decorates them:
//!
//! - **Cycle reports**: each non-trivial SCC with sorted members and the
//!   back-edges whose removal breaks it.
//! - **Self-loops**: listed separately by [`self_loops`], and optionally
//!   turned into one-node reports via
//!   [`ValidationConfig::include_self_loops`].
//! - **Stats**: node/edge counts, density, degree and cycle summaries.
//!
//! # Statistics Provided
//!
//! - **density**: `edge_count / (node_count * (node_count - 1))`, zero for
//!   graphs with fewer than two nodes. Parallel edges count, so a heavily
//!   duplicated graph can exceed 1.0.
//! - **parallel_edge_count**: edges beyond the first between the same pair.
//! - **isolated_node_count**: nodes with neither incoming nor outgoing edges.

#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, instrument};

use super::scc::detect_cycles;
use super::store::{NodeId, StoryGraph};
use crate::config::ValidationConfig;

// ---------------------------------------------------------------------------
// Self-loops
// ---------------------------------------------------------------------------

/// Nodes with an edge to themselves, ascending and deduplicated.
#[must_use]
pub fn self_loops(graph: &StoryGraph) -> Vec<NodeId> {
    graph
        .nodes()
        .filter(|&node| graph.neighbors(node).contains(&node))
        .collect()
}

// ---------------------------------------------------------------------------
// CycleReport
// ---------------------------------------------------------------------------

/// One detected loop and the edges suggested to break it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Nodes of the strongly connected component, ascending.
    pub members: Vec<NodeId>,
    /// Suggested `(from, to)` edges to remove.
    ///
    /// These are the back-edges of a DFS restricted to the component.
    /// Removing all of them leaves the component acyclic; usually one is
    /// enough. Empty when break suggestions are disabled.
    pub suggested_breaks: Vec<(NodeId, NodeId)>,
}

impl CycleReport {
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.members.len() == 1
    }
}

fn cycle_reports(graph: &StoryGraph, config: &ValidationConfig) -> Vec<CycleReport> {
    let mut reports: Vec<CycleReport> = detect_cycles(graph.nodes(), graph)
        .into_iter()
        .map(|component| {
            let suggested_breaks = if config.suggest_breaks {
                find_back_edges_in_scc(graph, &component)
            } else {
                Vec::new()
            };
            let mut members = component;
            if config.sort_output {
                members.sort_unstable();
            }
            CycleReport {
                members,
                suggested_breaks,
            }
        })
        .collect();

    if config.include_self_loops {
        reports.extend(self_loops(graph).into_iter().map(|node| CycleReport {
            members: vec![node],
            suggested_breaks: if config.suggest_breaks {
                vec![(node, node)]
            } else {
                Vec::new()
            },
        }));
    }

    if config.sort_output {
        reports.sort_unstable_by(|a, b| a.members.cmp(&b.members));
    }
    reports
}

/// Run DFS within the nodes of an SCC and collect back-edges.
///
/// A back-edge `(u, v)` points at an ancestor on the current DFS path;
/// removing it eliminates the loop it closes. Self-loops inside a larger
/// component are back-edges too. The DFS starts from the smallest member and
/// is iterative, so large components are safe.
fn find_back_edges_in_scc(graph: &StoryGraph, component: &[NodeId]) -> Vec<(NodeId, NodeId)> {
    let member_set: HashSet<NodeId> = component.iter().copied().collect();
    let mut starts: Vec<NodeId> = component.to_vec();
    starts.sort_unstable();

    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut on_path: HashSet<NodeId> = HashSet::new();
    let mut back_edges: Vec<(NodeId, NodeId)> = Vec::new();

    for start in starts {
        if !visited.insert(start) {
            continue;
        }
        on_path.insert(start);
        let mut call_stack: Vec<(NodeId, usize)> = vec![(start, 0)];

        while let Some(&(current, cursor)) = call_stack.last() {
            let next = graph
                .neighbors(current)
                .iter()
                .enumerate()
                .skip(cursor)
                .find(|(_, n)| member_set.contains(*n));

            let Some((offset, &neighbor)) = next else {
                call_stack.pop();
                on_path.remove(&current);
                continue;
            };
            if let Some(frame) = call_stack.last_mut() {
                frame.1 = offset + 1;
            }

            if on_path.contains(&neighbor) {
                back_edges.push((current, neighbor));
            } else if visited.insert(neighbor) {
                on_path.insert(neighbor);
                call_stack.push((neighbor, 0));
            }
        }
    }

    back_edges.sort_unstable();
    back_edges.dedup();
    back_edges
}

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Summary statistics for a story graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    /// Edges including parallel duplicates and self-loops.
    pub edge_count: usize,
    pub parallel_edge_count: usize,
    pub self_loop_count: usize,
    /// Number of non-trivial SCCs.
    pub cycle_count: usize,
    /// Nodes that sit on a loop of two or more nodes.
    pub nodes_in_cycles: usize,
    pub isolated_node_count: usize,
    pub max_out_degree: usize,
    pub density: f64,
}

impl GraphStats {
    /// Compute statistics, running the SCC analyzer once.
    #[must_use]
    pub fn from_graph(graph: &StoryGraph) -> Self {
        let cycles = detect_cycles(graph.nodes(), graph);
        Self::with_cycles(graph, &cycles)
    }

    fn with_cycles(graph: &StoryGraph, cycles: &[Vec<NodeId>]) -> Self {
        let node_count = graph.node_count();
        let edge_count = graph.edge_count();

        let mut distinct: HashSet<(NodeId, NodeId)> = HashSet::new();
        let mut has_incoming: HashSet<NodeId> = HashSet::new();
        let mut out_degree: HashMap<NodeId, usize> = HashMap::new();
        for (from, to) in graph.edges() {
            distinct.insert((from, to));
            has_incoming.insert(to);
            *out_degree.entry(from).or_default() += 1;
        }

        let isolated_node_count = graph
            .nodes()
            .filter(|n| !has_incoming.contains(n) && graph.neighbors(*n).is_empty())
            .count();

        Self {
            node_count,
            edge_count,
            parallel_edge_count: edge_count - distinct.len(),
            self_loop_count: self_loops(graph).len(),
            cycle_count: cycles.len(),
            nodes_in_cycles: cycles.iter().map(Vec::len).sum(),
            isolated_node_count,
            max_out_degree: out_degree.values().copied().max().unwrap_or(0),
            density: compute_density(node_count, edge_count),
        }
    }
}

fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0;
    }
    edge_count as f64 / (node_count as f64 * (node_count - 1) as f64)
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

/// Everything the editor shows after a validation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub cycles: Vec<CycleReport>,
    pub self_loops: Vec<NodeId>,
    pub stats: GraphStats,
}

impl ValidationReport {
    /// `true` when the graph has no loops of any length.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.cycles.is_empty() && self.self_loops.is_empty()
    }
}

/// Run a full validation pass over `graph`.
#[must_use]
#[instrument(skip_all, fields(nodes = graph.node_count()))]
pub fn validate(graph: &StoryGraph, config: &ValidationConfig) -> ValidationReport {
    let cycles = cycle_reports(graph, config);
    let loops = self_loops(graph);
    let components: Vec<Vec<NodeId>> = cycles
        .iter()
        .filter(|r| !r.is_self_loop())
        .map(|r| r.members.clone())
        .collect();
    let stats = GraphStats::with_cycles(graph, &components);

    debug!(
        cycles = stats.cycle_count,
        self_loops = loops.len(),
        edges = stats.edge_count,
        "story graph validated"
    );

    ValidationReport {
        cycles,
        self_loops: loops,
        stats,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(nodes: &[u64], edges: &[(u64, u64)]) -> StoryGraph {
        StoryGraph::from_edges(
            nodes.iter().copied().map(NodeId),
            edges.iter().map(|&(a, b)| (NodeId(a), NodeId(b))),
        )
        .unwrap_or_else(|e| panic!("fixture graph is invalid: {e}"))
    }

    fn ids(raw: &[u64]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId).collect()
    }

    fn edge(a: u64, b: u64) -> (NodeId, NodeId) {
        (NodeId(a), NodeId(b))
    }

    // -----------------------------------------------------------------------
    // self_loops
    // -----------------------------------------------------------------------

    #[test]
    fn self_loops_are_listed_once() {
        let g = graph(&[1, 2, 3], &[(3, 3), (1, 1), (1, 1), (1, 2)]);
        assert_eq!(self_loops(&g), ids(&[1, 3]));
    }

    // -----------------------------------------------------------------------
    // cycle reports
    // -----------------------------------------------------------------------

    #[test]
    fn acyclic_graph_is_clean() {
        let g = graph(&[1, 2, 3, 4], &[(1, 2), (1, 3), (2, 4), (3, 4)]);
        let report = validate(&g, &ValidationConfig::default());
        assert!(report.is_clean());
        assert!(report.cycles.is_empty());
    }

    #[test]
    fn two_node_cycle_has_one_break() {
        let g = graph(&[1, 2], &[(1, 2), (2, 1)]);
        let report = validate(&g, &ValidationConfig::default());

        assert_eq!(report.cycles.len(), 1);
        let r = &report.cycles[0];
        assert_eq!(r.members, ids(&[1, 2]));
        assert_eq!(r.suggested_breaks, vec![edge(2, 1)]);
    }

    #[test]
    fn three_node_cycle_back_edge() {
        let g = graph(&[1, 2, 3], &[(1, 2), (2, 3), (3, 1)]);
        let report = validate(&g, &ValidationConfig::default());

        assert_eq!(report.cycles[0].members, ids(&[1, 2, 3]));
        assert_eq!(report.cycles[0].suggested_breaks, vec![edge(3, 1)]);
    }

    #[test]
    fn parallel_back_edges_collapse() {
        let g = graph(&[1, 2], &[(1, 2), (2, 1), (2, 1)]);
        let report = validate(&g, &ValidationConfig::default());
        assert_eq!(report.cycles[0].suggested_breaks, vec![edge(2, 1)]);
    }

    #[test]
    fn removing_suggested_breaks_makes_graph_acyclic() {
        let mut g = graph(
            &[1, 2, 3, 4, 5],
            &[(1, 2), (2, 3), (3, 1), (2, 4), (4, 2), (4, 5), (5, 4)],
        );
        let report = validate(&g, &ValidationConfig::default());
        for r in &report.cycles {
            for &(from, to) in &r.suggested_breaks {
                assert!(g.contains_edge(from, to), "break {from}→{to} must exist");
                while g.remove_edge(from, to) {}
            }
        }
        assert!(g.detect_cycles().is_empty());
    }

    #[test]
    fn self_loops_excluded_from_reports_by_default() {
        let g = graph(&[1, 2, 3], &[(1, 1), (2, 3), (3, 2)]);
        let report = validate(&g, &ValidationConfig::default());

        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].members, ids(&[2, 3]));
        assert_eq!(report.self_loops, ids(&[1]));
        assert!(!report.is_clean());
    }

    #[test]
    fn self_loops_reported_when_configured() {
        let g = graph(&[1, 2, 3], &[(3, 3), (1, 2), (2, 1)]);
        let config = ValidationConfig {
            include_self_loops: true,
            ..ValidationConfig::default()
        };
        let report = validate(&g, &config);

        assert_eq!(report.cycles.len(), 2);
        assert_eq!(report.cycles[0].members, ids(&[1, 2]));
        assert_eq!(report.cycles[1].members, ids(&[3]));
        assert!(report.cycles[1].is_self_loop());
        assert_eq!(report.cycles[1].suggested_breaks, vec![edge(3, 3)]);
        assert_eq!(report.stats.cycle_count, 1, "stats count multi-node loops only");
    }

    #[test]
    fn breaks_can_be_disabled() {
        let g = graph(&[1, 2], &[(1, 2), (2, 1)]);
        let config = ValidationConfig {
            suggest_breaks: false,
            ..ValidationConfig::default()
        };
        let report = validate(&g, &config);
        assert!(report.cycles[0].suggested_breaks.is_empty());
    }

    #[test]
    fn reports_sorted_by_members() {
        let g = graph(&[1, 2, 3, 4, 5, 6], &[(5, 6), (6, 5), (1, 2), (2, 1)]);
        let report = validate(&g, &ValidationConfig::default());
        let members: Vec<Vec<NodeId>> = report.cycles.iter().map(|r| r.members.clone()).collect();
        assert_eq!(members, vec![ids(&[1, 2]), ids(&[5, 6])]);
    }

    // -----------------------------------------------------------------------
    // GraphStats
    // -----------------------------------------------------------------------

    #[test]
    fn stats_for_empty_graph() {
        let stats = GraphStats::from_graph(&StoryGraph::new());
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.edge_count, 0);
        assert!(stats.density.abs() < f64::EPSILON);
        assert_eq!(stats.max_out_degree, 0);
    }

    #[test]
    fn stats_count_parallel_edges_and_isolated_nodes() {
        let g = graph(&[1, 2, 3, 4], &[(1, 2), (1, 2), (2, 1), (2, 2)]);
        let stats = GraphStats::from_graph(&g);

        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.edge_count, 4);
        assert_eq!(stats.parallel_edge_count, 1);
        assert_eq!(stats.self_loop_count, 1);
        assert_eq!(stats.cycle_count, 1);
        assert_eq!(stats.nodes_in_cycles, 2);
        assert_eq!(stats.isolated_node_count, 2);
        assert_eq!(stats.max_out_degree, 2);
        assert!((stats.density - 4.0 / 12.0).abs() < 1e-9);
    }
}
