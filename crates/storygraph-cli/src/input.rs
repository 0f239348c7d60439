//! Loading story graph exports from disk.
//!
//! The editor exports its graph as JSON:
//!
//! ```json
//! { "nodes": [1, 2, 3], "edges": [[1, 2], [2, 3]] }
//! ```
//!
//! Edge order within `edges` is the authoring order and is preserved.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use storygraph_core::{ErrorCode, GraphError, NodeId, StoryGraph};
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct StoryExport {
    #[serde(default)]
    pub nodes: Vec<NodeId>,
    #[serde(default)]
    pub edges: Vec<(NodeId, NodeId)>,
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid edge in export: {0}")]
    Graph(#[from] GraphError),
    #[error("story graph has {nodes} nodes, limit is {max}")]
    TooLarge { nodes: usize, max: usize },
}

impl InputError {
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } | Self::Parse { .. } => ErrorCode::InputParseError,
            Self::Graph(err) => err.code(),
            Self::TooLarge { .. } => ErrorCode::GraphTooLarge,
        }
    }
}

/// Build a graph from an already-parsed export.
///
/// The node cap is checked before any edge is inserted.
pub fn build_graph(export: StoryExport, max_nodes: Option<usize>) -> Result<StoryGraph, InputError> {
    if let Some(max) = max_nodes {
        let distinct = export
            .nodes
            .iter()
            .collect::<std::collections::HashSet<_>>()
            .len();
        if distinct > max {
            return Err(InputError::TooLarge {
                nodes: distinct,
                max,
            });
        }
    }
    Ok(StoryGraph::from_edges(export.nodes, export.edges)?)
}

/// Read and parse an export file into a [`StoryGraph`].
pub fn load_graph(path: &Path, max_nodes: Option<usize>) -> Result<StoryGraph, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let export: StoryExport =
        serde_json::from_str(&content).map_err(|source| InputError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let graph = build_graph(export, max_nodes)?;
    debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded story graph"
    );
    Ok(graph)
}
