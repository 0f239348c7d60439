//! Batch cycle analysis: non-trivial strongly connected components.
//!
//! # Algorithm
//!
//! Tarjan's SCC algorithm. Each node gets a discovery index and a lowlink on
//! first visit and is pushed onto an active stack (with a membership set for
//! O(1) on-stack checks). For each outgoing neighbor `w` of `v`:
//!
//! - `w` unindexed: visit `w`, then `lowlink[v] = min(lowlink[v], lowlink[w])`.
//! - `w` on the stack: `lowlink[v] = min(lowlink[v], index[w])`.
//!
//! When `v` finishes with `lowlink[v] == index[v]`, the stack is popped down
//! to `v` to form one component.
//!
//! The recursion is unrolled onto an explicit work stack of
//! `(node, next neighbor cursor)` frames. A frame is "entered" when pushed and
//! "returned from" when its cursor runs past the last neighbor, at which point
//! its lowlink is folded into the parent frame. Results match the recursive
//! formulation exactly, and depth is bounded by heap memory instead of the
//! thread stack.
//!
//! # Output
//!
//! Only components with two or more nodes are returned. A single node with a
//! self-loop is not reported; see [`would_create_cycle`] for self-loops and
//! [`self_loops`] for listing them.
//!
//! [`would_create_cycle`]: crate::graph::probe::would_create_cycle
//! [`self_loops`]: crate::graph::diagnostics::self_loops

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use super::store::{Adjacency, NodeId};

/// Enumerate every strongly connected component with more than one node.
///
/// `nodes` drives the outer traversal; already-indexed nodes are skipped.
/// Components are disjoint, and their union is exactly the set of nodes that
/// sit on a cycle of length two or more. Component order and member order
/// follow the traversal and are deterministic for a fixed `nodes` order.
/// Parallel edges never duplicate a component.
///
/// # Complexity
///
/// O(V+E) time, O(V) auxiliary space.
#[must_use]
#[instrument(skip_all)]
pub fn detect_cycles<A, I>(nodes: I, adjacency: &A) -> Vec<Vec<NodeId>>
where
    A: Adjacency + ?Sized,
    I: IntoIterator<Item = NodeId>,
{
    let mut tarjan = Tarjan::new(adjacency);
    for root in nodes {
        if !tarjan.index.contains_key(&root) {
            tarjan.visit(root);
        }
    }

    debug!(
        visited = tarjan.index.len(),
        components = tarjan.components.len(),
        "cycle analysis finished"
    );
    tarjan.components
}

// ---------------------------------------------------------------------------
// Tarjan internals
// ---------------------------------------------------------------------------

struct Tarjan<'a, A: ?Sized> {
    adjacency: &'a A,
    next_index: usize,
    index: HashMap<NodeId, usize>,
    lowlink: HashMap<NodeId, usize>,
    /// Active nodes not yet assigned to a component.
    stack: Vec<NodeId>,
    on_stack: HashSet<NodeId>,
    components: Vec<Vec<NodeId>>,
}

impl<'a, A: Adjacency + ?Sized> Tarjan<'a, A> {
    fn new(adjacency: &'a A) -> Self {
        Self {
            adjacency,
            next_index: 0,
            index: HashMap::new(),
            lowlink: HashMap::new(),
            stack: Vec::new(),
            on_stack: HashSet::new(),
            components: Vec::new(),
        }
    }

    /// Assign index and lowlink and push onto the active stack.
    fn enter(&mut self, node: NodeId) {
        self.index.insert(node, self.next_index);
        self.lowlink.insert(node, self.next_index);
        self.next_index += 1;
        self.stack.push(node);
        self.on_stack.insert(node);
    }

    fn lower(&mut self, node: NodeId, candidate: usize) {
        if let Some(low) = self.lowlink.get_mut(&node) {
            *low = (*low).min(candidate);
        }
    }

    /// Depth-first visit from `root` using an explicit frame stack.
    fn visit(&mut self, root: NodeId) {
        let adjacency = self.adjacency;
        // (node, index of the next neighbor to examine)
        let mut work: Vec<(NodeId, usize)> = vec![(root, 0)];
        self.enter(root);

        while let Some(&(node, cursor)) = work.last() {
            if let Some(&next) = adjacency.neighbors(node).get(cursor) {
                if let Some(frame) = work.last_mut() {
                    frame.1 += 1;
                }

                match self.index.get(&next).copied() {
                    None => {
                        self.enter(next);
                        work.push((next, 0));
                    }
                    Some(next_index) if self.on_stack.contains(&next) => {
                        self.lower(node, next_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            // Every neighbor examined: return from this frame.
            work.pop();
            let node_low = self.lowlink[&node];
            if let Some(&(parent, _)) = work.last() {
                self.lower(parent, node_low);
            }
            if node_low == self.index[&node] {
                self.pop_component(node);
            }
        }
    }

    /// Pop the active stack down to and including `root`.
    fn pop_component(&mut self, root: NodeId) {
        let mut component = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack.remove(&member);
            component.push(member);
            if member == root {
                break;
            }
        }
        if component.len() > 1 {
            self.components.push(component);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
