#![forbid(unsafe_code)]
//! storygraph-core library.
//!
//! The story graph is the directed multigraph of narrative nodes an editor
//! builds while authoring branching scenes. This crate owns the graph store
//! and the two questions the editor asks of it:
//!
//! - **Incremental**: would adding `u → v` make the graph cyclic?
//!   See [`graph::probe::would_create_cycle`].
//! - **Batch**: which groups of nodes currently form cycles?
//!   See [`graph::scc::detect_cycles`].
//!
//! # Conventions
//!
//! - **Errors**: Typed [`GraphError`] for graph operations; `anyhow::Result`
//!   for config loading.
//! - **Logging**: Use `tracing` macros (`debug!`, `trace!`). The library never
//!   installs a subscriber.

pub mod config;
pub mod error;
pub mod graph;

pub use config::ValidationConfig;
pub use error::{ErrorCode, GraphError};
pub use graph::{
    Adjacency, CycleReport, CycleWarning, GraphStats, NodeId, StoryGraph, ValidationReport,
    detect_cycles, find_cycle_path, self_loops, validate, would_create_cycle,
};
