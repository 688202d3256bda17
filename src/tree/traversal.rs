//! Sequential traversals over the parent relation
//!
//! These are the "ordinary" walks the parallel pipelines replace: cycle
//! checking at build time, the depth oracle, and Euler tour construction.

use super::{NodeId, ParentId, TreeModel};
use crate::tour::EulerTour;
use crate::PramError;

const UNVISITED: u8 = 0;
const ON_PATH: u8 = 1;
const REACHES_ROOT: u8 = 2;

/// Verify every parent chain ends at the root marker
///
/// Each node is walked at most once: a chain stops as soon as it meets a
/// node already known to reach the root.
pub(crate) fn check_acyclic(parents: &[ParentId]) -> Result<(), PramError> {
    let mut state = vec![UNVISITED; parents.len()];
    let mut path = Vec::new();

    for start in 0..parents.len() {
        let mut current = start;
        loop {
            match state[current] {
                REACHES_ROOT => break,
                ON_PATH => {
                    return Err(PramError::InvalidInput(format!(
                        "cycle through node {} does not reach the root",
                        current
                    )));
                }
                _ => {}
            }
            state[current] = ON_PATH;
            path.push(current);
            match parents[current] {
                ParentId::Root => break,
                ParentId::Node(p) => current = p.0,
            }
        }
        for v in path.drain(..) {
            state[v] = REACHES_ROOT;
        }
    }

    Ok(())
}

/// Iterator from a node up to the root, inclusive
#[derive(Debug)]
pub struct AncestorsIter<'a, V> {
    tree: &'a TreeModel<V>,
    current: Option<NodeId>,
}

impl<'a, V> AncestorsIter<'a, V> {
    pub(crate) fn new(tree: &'a TreeModel<V>, start: NodeId) -> Self {
        Self {
            tree,
            current: Some(start),
        }
    }
}

impl<V> Iterator for AncestorsIter<'_, V> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.tree.parent(current).node();
        Some(current)
    }
}

impl<V> TreeModel<V> {
    /// Children lists, each in ascending id order
    pub fn children(&self) -> Vec<Vec<NodeId>> {
        let mut children = vec![Vec::new(); self.len()];
        for node in self.iter_nodes() {
            if let ParentId::Node(p) = node.parent() {
                children[p.0].push(node.id());
            }
        }
        children
    }

    /// Depth of every node by walking parent chains (memoised)
    ///
    /// Sequential reference for the pointer-jumping engine.
    pub fn depths(&self) -> Vec<usize> {
        let n = self.len();
        let mut depth: Vec<Option<usize>> = vec![None; n];
        depth[self.root().0] = Some(0);
        let mut path = Vec::new();

        for start in 0..n {
            let mut current = start;
            let base = loop {
                if let Some(d) = depth[current] {
                    break d;
                }
                path.push(current);
                // Only the root has no parent, and its depth is seeded above
                current = match self.parent(NodeId(current)) {
                    ParentId::Node(p) => p.0,
                    ParentId::Root => break 0,
                };
            };
            for (offset, v) in path.drain(..).rev().enumerate() {
                depth[v] = Some(base + offset + 1);
            }
        }

        depth.into_iter().map(|d| d.unwrap_or(0)).collect()
    }

    /// Maximum depth over all nodes (0 for a lone root)
    pub fn height(&self) -> usize {
        self.depths().into_iter().max().unwrap_or(0)
    }

    /// Euler tour by iterative DFS, children in ascending id order
    ///
    /// A node is emitted on entry and again after each child returns,
    /// giving `2n - 1` entries.
    pub fn euler_tour(&self) -> EulerTour {
        let children = self.children();
        let mut tour = Vec::with_capacity(2 * self.len() - 1);
        let mut stack = vec![(self.root().0, 0usize)];
        tour.push(self.root().0);

        while let Some((node, next_child)) = stack.last_mut() {
            let node = *node;
            if let Some(child) = children[node].get(*next_child) {
                *next_child += 1;
                tour.push(child.0);
                stack.push((child.0, 0));
            } else {
                stack.pop();
                if let Some((parent, _)) = stack.last() {
                    tour.push(*parent);
                }
            }
        }

        EulerTour::from_validated(tour)
    }
}
