//! Reachability probe: would a proposed link close a loop?
//!
//! # Design
//!
//! - **Reachability, not mutation**: adding `from → to` closes a cycle exactly
//!   when `to` can already reach `from`. The probe searches from `to` and never
//!   touches the graph.
//! - **Self-loops**: `from == to` always closes a cycle, even on an empty graph.
//! - **Absent nodes**: an id the graph does not know has no outgoing edges, so
//!   the editor can probe before committing new nodes.
//! - **Iterative DFS**: an explicit stack plus a visited set. Each reachable
//!   node and edge is visited at most once, so long story chains cannot
//!   overflow the call stack.
//!
//! # Usage
//!
//! ```rust
//! use storygraph_core::{NodeId, StoryGraph, find_cycle_path};
//!
//! let graph = StoryGraph::from_edges(
//!     [NodeId(1), NodeId(2), NodeId(3)],
//!     [(NodeId(1), NodeId(2)), (NodeId(2), NodeId(3))],
//! )?;
//!
//! let warning = find_cycle_path(&graph, NodeId(3), NodeId(1)).expect("closes a loop");
//! assert_eq!(warning.to_string(), "cycle detected (3 nodes): 3 → 1 → 2 → 3");
//! # Ok::<(), storygraph_core::GraphError>(())
//! ```

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use super::store::{Adjacency, NodeId};

// ---------------------------------------------------------------------------
// CycleWarning
// ---------------------------------------------------------------------------

/// The loop a proposed edge would close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleWarning {
    /// Closed path starting and ending at `edge_from`.
    ///
    /// For a proposed edge `A → B` closing `A → B → C → A` the path is
    /// `[A, B, C, A]`. A self-loop on `A` is `[A, A]`.
    pub cycle_path: Vec<NodeId>,

    /// Source of the proposed edge.
    pub edge_from: NodeId,

    /// Target of the proposed edge.
    pub edge_to: NodeId,
}

impl CycleWarning {
    /// Number of distinct nodes in the loop.
    #[must_use]
    pub fn cycle_len(&self) -> usize {
        self.cycle_path.len().saturating_sub(1)
    }

    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.edge_from == self.edge_to
    }

    /// Two scenes that would branch into each other.
    #[must_use]
    pub fn is_mutual(&self) -> bool {
        self.cycle_len() == 2
    }
}

impl fmt::Display for CycleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_self_loop() {
            write!(f, "cycle detected: self-loop on node {}", self.edge_from)
        } else if self.is_mutual() {
            write!(
                f,
                "cycle detected: nodes {} and {} lead into each other",
                self.edge_from, self.edge_to
            )
        } else {
            let path = self
                .cycle_path
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" → ");
            write!(f, "cycle detected ({} nodes): {path}", self.cycle_len())
        }
    }
}

// ---------------------------------------------------------------------------
// Probe
// ---------------------------------------------------------------------------

/// Return `true` iff adding `from → to` would introduce a directed cycle.
///
/// Equivalent to `from == to` or "`to` can reach `from` through one or more
/// existing edges". Cycles already present elsewhere in the graph do not
/// affect the answer. Parallel edges are irrelevant.
///
/// # Complexity
///
/// O(V+E) over the nodes and edges reachable from `to`.
#[must_use]
pub fn would_create_cycle<A: Adjacency + ?Sized>(adjacency: &A, from: NodeId, to: NodeId) -> bool {
    if from == to {
        return true;
    }

    let mut stack = vec![to];
    let mut visited: HashSet<NodeId> = HashSet::from([to]);

    while let Some(current) = stack.pop() {
        for &next in adjacency.neighbors(current) {
            if next == from {
                return true;
            }
            if visited.insert(next) {
                stack.push(next);
            }
        }
    }

    false
}

/// Like [`would_create_cycle`], but returns the loop the edge would close.
///
/// `find_cycle_path(g, a, b).is_some()` always equals
/// `would_create_cycle(g, a, b)`.
#[must_use]
pub fn find_cycle_path<A: Adjacency + ?Sized>(
    adjacency: &A,
    from: NodeId,
    to: NodeId,
) -> Option<CycleWarning> {
    if from == to {
        return Some(CycleWarning {
            cycle_path: vec![from, from],
            edge_from: from,
            edge_to: to,
        });
    }

    let mut stack = vec![to];
    let mut visited: HashSet<NodeId> = HashSet::from([to]);
    let mut parent: HashMap<NodeId, NodeId> = HashMap::new();

    while let Some(current) = stack.pop() {
        for &next in adjacency.neighbors(current) {
            if next == from {
                parent.insert(from, current);
                return Some(CycleWarning {
                    cycle_path: reconstruct_cycle_path(&parent, from, to),
                    edge_from: from,
                    edge_to: to,
                });
            }
            if visited.insert(next) {
                parent.insert(next, current);
                stack.push(next);
            }
        }
    }

    None
}

/// Rebuild `from → to → … → from` from DFS parent links.
///
/// Parent links describe the path `to → … → from`; walking them backwards
/// from `from` and reversing yields that path, and prepending `from` adds the
/// proposed edge that closes the loop.
fn reconstruct_cycle_path(
    parent: &HashMap<NodeId, NodeId>,
    from: NodeId,
    to: NodeId,
) -> Vec<NodeId> {
    let mut to_to_from = vec![from];
    let mut cursor = from;

    while cursor != to {
        match parent.get(&cursor) {
            Some(&prev) => {
                cursor = prev;
                to_to_from.push(cursor);
            }
            None => break,
        }
    }

    to_to_from.reverse();

    let mut cycle = Vec::with_capacity(to_to_from.len() + 1);
    cycle.push(from);
    cycle.extend(to_to_from);
    cycle
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::store::StoryGraph;

    fn graph(nodes: &[u64], edges: &[(u64, u64)]) -> StoryGraph {
        StoryGraph::from_edges(
            nodes.iter().copied().map(NodeId),
            edges.iter().map(|&(a, b)| (NodeId(a), NodeId(b))),
        )
        .unwrap_or_else(|e| panic!("fixture graph is invalid: {e}"))
    }

    fn path(raw: &[u64]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId).collect()
    }

    // -----------------------------------------------------------------------
    // CycleWarning display and properties
    // -----------------------------------------------------------------------

    #[test]
    fn cycle_warning_self_loop_display() {
        let w = CycleWarning {
            cycle_path: path(&[4, 4]),
            edge_from: NodeId(4),
            edge_to: NodeId(4),
        };
        assert!(w.is_self_loop());
        assert!(!w.is_mutual());
        assert_eq!(w.cycle_len(), 1);
        assert_eq!(w.to_string(), "cycle detected: self-loop on node 4");
    }

    #[test]
    fn cycle_warning_mutual_display() {
        let w = CycleWarning {
            cycle_path: path(&[1, 2, 1]),
            edge_from: NodeId(1),
            edge_to: NodeId(2),
        };
        assert!(w.is_mutual());
        let display = w.to_string();
        assert!(display.contains("lead into each other"), "display: {display}");
    }

    #[test]
    fn cycle_warning_long_display() {
        let w = CycleWarning {
            cycle_path: path(&[1, 2, 3, 4, 1]),
            edge_from: NodeId(1),
            edge_to: NodeId(2),
        };
        assert_eq!(w.cycle_len(), 4);
        assert_eq!(w.to_string(), "cycle detected (4 nodes): 1 → 2 → 3 → 4 → 1");
    }

    // -----------------------------------------------------------------------
    // would_create_cycle
    // -----------------------------------------------------------------------

    #[test]
    fn self_loop_is_cycle_even_on_empty_graph() {
        let g = StoryGraph::new();
        assert!(would_create_cycle(&g, NodeId(1), NodeId(1)));
        assert!(would_create_cycle(&g, NodeId(0), NodeId(0)));
    }

    #[test]
    fn empty_graph_distinct_nodes_no_cycle() {
        let g = StoryGraph::new();
        assert!(!would_create_cycle(&g, NodeId(1), NodeId(2)));
    }

    #[test]
    fn closing_a_chain_is_a_cycle() {
        let g = graph(&[1, 2, 3], &[(1, 2), (2, 3)]);
        assert!(would_create_cycle(&g, NodeId(3), NodeId(1)));
        assert!(!would_create_cycle(&g, NodeId(1), NodeId(3)));
    }

    #[test]
    fn duplicate_forward_edge_is_not_a_cycle() {
        let g = graph(&[1, 2], &[(1, 2), (1, 2)]);
        assert!(!would_create_cycle(&g, NodeId(1), NodeId(2)));
        assert!(would_create_cycle(&g, NodeId(2), NodeId(1)));
    }

    #[test]
    fn existing_unrelated_cycle_does_not_leak() {
        // 1 ⇄ 2 already cyclic; 3 → 4 is unrelated.
        let g = graph(&[1, 2, 3, 4], &[(1, 2), (2, 1), (3, 4)]);
        assert!(!would_create_cycle(&g, NodeId(3), NodeId(1)));
        assert!(!would_create_cycle(&g, NodeId(2), NodeId(4)));
    }

    #[test]
    fn absent_nodes_have_no_outgoing_edges() {
        let g = graph(&[1, 2], &[(1, 2)]);
        assert!(!would_create_cycle(&g, NodeId(2), NodeId(99)));
        assert!(!would_create_cycle(&g, NodeId(99), NodeId(1)));
    }

    #[test]
    fn probe_accepts_plain_hashmap() {
        let mut adjacency: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        adjacency.insert(NodeId(1), path(&[2]));
        adjacency.insert(NodeId(2), path(&[3]));

        assert!(would_create_cycle(&adjacency, NodeId(3), NodeId(1)));
        assert!(!would_create_cycle(&adjacency, NodeId(1), NodeId(3)));
    }

    // -----------------------------------------------------------------------
    // find_cycle_path
    // -----------------------------------------------------------------------

    #[test]
    fn path_for_self_loop() {
        let g = StoryGraph::new();
        let w = find_cycle_path(&g, NodeId(7), NodeId(7)).unwrap();
        assert_eq!(w.cycle_path, path(&[7, 7]));
        assert!(w.is_self_loop());
    }

    #[test]
    fn path_for_mutual_link() {
        let g = graph(&[1, 2], &[(1, 2)]);
        let w = find_cycle_path(&g, NodeId(2), NodeId(1)).unwrap();
        assert_eq!(w.cycle_path, path(&[2, 1, 2]));
        assert!(w.is_mutual());
    }

    #[test]
    fn path_for_three_node_loop() {
        let g = graph(&[1, 2, 3], &[(1, 2), (2, 3)]);
        let w = find_cycle_path(&g, NodeId(3), NodeId(1)).unwrap();
        assert_eq!(w.cycle_path, path(&[3, 1, 2, 3]));
        assert_eq!(w.edge_from, NodeId(3));
        assert_eq!(w.edge_to, NodeId(1));
    }

    #[test]
    fn path_is_none_for_safe_edge() {
        let g = graph(&[1, 2, 3], &[(1, 2), (2, 3)]);
        assert!(find_cycle_path(&g, NodeId(1), NodeId(3)).is_none());
    }

    #[test]
    fn path_follows_existing_edges() {
        // Diamond plus a back route: 1 → 2 → 4, 1 → 3 → 4, 4 → 5.
        let g = graph(&[1, 2, 3, 4, 5], &[(1, 2), (1, 3), (2, 4), (3, 4), (4, 5)]);
        let w = find_cycle_path(&g, NodeId(5), NodeId(1)).unwrap();

        assert_eq!(w.cycle_path.first(), Some(&NodeId(5)));
        assert_eq!(w.cycle_path.last(), Some(&NodeId(5)));
        for pair in w.cycle_path[1..].windows(2) {
            assert!(g.contains_edge(pair[0], pair[1]), "{} → {} is not an edge", pair[0], pair[1]);
        }
    }

    #[test]
    fn long_chain_path_length() {
        let nodes: Vec<u64> = (0..1000).collect();
        let edges: Vec<(u64, u64)> = (0..999).map(|i| (i, i + 1)).collect();
        let g = graph(&nodes, &edges);

        let w = find_cycle_path(&g, NodeId(999), NodeId(0)).unwrap();
        assert_eq!(w.cycle_len(), 1000);
        assert!(find_cycle_path(&g, NodeId(0), NodeId(999)).is_none());
    }
}
