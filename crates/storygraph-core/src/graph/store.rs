//! Node set and ordered outgoing adjacency for the story graph.
//!
//! # Data Model
//!
//! - Every node present in the graph owns an adjacency entry, possibly empty,
//!   so the key set of the map is the node set.
//! - Neighbor order reflects authoring order and is preserved across reads.
//! - Duplicate neighbors are parallel edges. They are kept in the store and
//!   ignored by the probe and the analyzer.
//! - Every neighbor id is itself a node. `insert_edge` checks both endpoints
//!   and `remove_node` scrubs the id from every other sequence.
//!
//! Nodes are kept in an ordered map, so [`StoryGraph::nodes`] yields ids in
//! ascending order and batch analysis is deterministic across runs.

#![allow(clippy::module_name_repetitions, clippy::missing_const_for_fn)]

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Opaque identifier of a story node, assigned by the editor.
///
/// The core never allocates or renumbers ids and makes no assumption about
/// density. Zero is a valid id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl From<u64> for NodeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Adjacency
// ---------------------------------------------------------------------------

/// Read access to outgoing adjacency.
///
/// An id with no entry has no outgoing edges. This is the only view the
/// probe and the analyzer need.
pub trait Adjacency {
    /// Ordered outgoing neighbors of `id`, empty if `id` is unknown.
    fn neighbors(&self, id: NodeId) -> &[NodeId];
}

impl Adjacency for HashMap<NodeId, Vec<NodeId>> {
    fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.get(&id).map_or(&[], Vec::as_slice)
    }
}

impl Adjacency for BTreeMap<NodeId, Vec<NodeId>> {
    fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.get(&id).map_or(&[], Vec::as_slice)
    }
}

impl<A: Adjacency + ?Sized> Adjacency for &A {
    fn neighbors(&self, id: NodeId) -> &[NodeId] {
        (**self).neighbors(id)
    }
}

// ---------------------------------------------------------------------------
// StoryGraph
// ---------------------------------------------------------------------------

/// Directed multigraph over story nodes.
///
/// Created empty, mutated only by its owner, dropped as a unit. Not
/// internally synchronized; wrap it in a lock if it must be shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryGraph {
    /// node → ordered outgoing neighbors. Keys are the node set.
    adjacency: BTreeMap<NodeId, Vec<NodeId>>,
}

impl StoryGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a node list and an edge list.
    ///
    /// All nodes are inserted before any edge, so edge order in `edges` does
    /// not matter for validity.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] for the first edge whose endpoint
    /// is missing from `nodes`.
    pub fn from_edges(
        nodes: impl IntoIterator<Item = NodeId>,
        edges: impl IntoIterator<Item = (NodeId, NodeId)>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for id in nodes {
            graph.insert_node(id);
        }
        for (from, to) in edges {
            graph.insert_edge(from, to)?;
        }
        Ok(graph)
    }

    /// Add `id` to the node set. Returns `true` if it was not present.
    pub fn insert_node(&mut self, id: NodeId) -> bool {
        if self.adjacency.contains_key(&id) {
            return false;
        }
        self.adjacency.insert(id, Vec::new());
        true
    }

    /// Remove `id`, its outgoing edges and every edge pointing at it.
    ///
    /// Returns `true` if the node was present. Absent ids are a no-op.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if self.adjacency.remove(&id).is_none() {
            return false;
        }
        for neighbors in self.adjacency.values_mut() {
            neighbors.retain(|&n| n != id);
        }
        true
    }

    /// Append `to` to the outgoing sequence of `from`.
    ///
    /// Parallel edges are permitted. No cycle check is performed here; call
    /// [`StoryGraph::would_create_cycle`] first if the edge must keep the
    /// graph acyclic.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] carrying `from` if it is absent,
    /// otherwise carrying `to` if that is absent.
    pub fn insert_edge(&mut self, from: NodeId, to: NodeId) -> Result<(), GraphError> {
        if !self.adjacency.contains_key(&to) {
            let missing = if self.adjacency.contains_key(&from) { to } else { from };
            return Err(GraphError::UnknownNode(missing));
        }
        let neighbors = self
            .adjacency
            .get_mut(&from)
            .ok_or(GraphError::UnknownNode(from))?;
        neighbors.push(to);
        Ok(())
    }

    /// Remove the first occurrence of `to` from the outgoing sequence of
    /// `from`. Returns whether an edge was removed.
    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        let Some(neighbors) = self.adjacency.get_mut(&from) else {
            return false;
        };
        match neighbors.iter().position(|&n| n == to) {
            Some(pos) => {
                neighbors.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Iterate the node set in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Ordered outgoing neighbors of `id`; empty if `id` is absent.
    #[must_use]
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.adjacency.neighbors(id)
    }

    /// Iterate every edge `(from, to)`, parallel edges included.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.adjacency
            .iter()
            .flat_map(|(&from, neighbors)| neighbors.iter().map(move |&to| (from, to)))
    }

    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.adjacency.contains_key(&id)
    }

    #[must_use]
    pub fn contains_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.neighbors(from).contains(&to)
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges, counting each parallel edge separately.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Would adding `from → to` make the graph cyclic?
    ///
    /// See [`would_create_cycle`](crate::graph::probe::would_create_cycle).
    #[must_use]
    pub fn would_create_cycle(&self, from: NodeId, to: NodeId) -> bool {
        super::probe::would_create_cycle(self, from, to)
    }

    /// Non-trivial strongly connected components of the current graph.
    ///
    /// See [`detect_cycles`](crate::graph::scc::detect_cycles).
    #[must_use]
    pub fn detect_cycles(&self) -> Vec<Vec<NodeId>> {
        super::scc::detect_cycles(self.nodes(), self)
    }
}

impl Adjacency for StoryGraph {
    fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.adjacency.neighbors(id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
