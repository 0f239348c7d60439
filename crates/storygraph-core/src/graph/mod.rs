//! Story graph store and cycle analysis.
//!
//! # Overview
//!
//! The editor owns one [`StoryGraph`]. Before committing a user-drawn link it
//! asks the reachability probe whether the link would close a loop; on save
//! or explicit validation it runs the SCC analyzer over the whole graph.
//!
//! ```text
//! StoryGraph (node set + ordered outgoing adjacency)
//!        ├─ probe::would_create_cycle(u, v)   "can v already reach u?"
//!        ├─ scc::detect_cycles(nodes, adj)    non-trivial SCCs (Tarjan)
//!        └─ diagnostics::validate(graph, cfg) reports, self-loops, stats
//! ```
//!
//! The probe and the analyzer only read the graph through the [`Adjacency`]
//! trait, so they also accept a plain `HashMap<NodeId, Vec<NodeId>>`.
//!
//! ## Typical Usage
//!
//! ```rust
//! use storygraph_core::{NodeId, StoryGraph};
//!
//! let mut graph = StoryGraph::new();
//! for id in 1..=3 {
//!     graph.insert_node(NodeId(id));
//! }
//! graph.insert_edge(NodeId(1), NodeId(2))?;
//! graph.insert_edge(NodeId(2), NodeId(3))?;
//!
//! assert!(graph.would_create_cycle(NodeId(3), NodeId(1)));
//! assert!(graph.detect_cycles().is_empty());
//! # Ok::<(), storygraph_core::GraphError>(())
//! ```

pub mod diagnostics;
pub mod probe;
pub mod scc;
pub mod store;

pub use diagnostics::{CycleReport, GraphStats, ValidationReport, self_loops, validate};
pub use probe::{CycleWarning, find_cycle_path, would_create_cycle};
pub use scc::detect_cycles;
pub use store::{Adjacency, NodeId, StoryGraph};
