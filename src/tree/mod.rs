//! Rooted tree held as parent pointers
//!
//! Foundation for both pipelines: the discovery-order pipeline reads the
//! parent relation to classify tour steps, the rank engine seeds its
//! ancestor buffer from it. Neither mutates it, so topology stays
//! inspectable after ranks are computed.

mod node;
mod traversal;

pub use node::{Node, NodeId, ParentId};
pub use traversal::AncestorsIter;

use crate::PramError;
use tracing::debug;

/// Rooted tree over nodes `0..n`
#[derive(Debug, Clone)]
pub struct TreeModel<V = usize> {
    nodes: Vec<Node<V>>,
    root: NodeId,
}

impl TreeModel<usize> {
    /// Build `n` nodes from a parent array
    ///
    /// Input convention: the root is the single node whose entry points at
    /// itself. It is stored as [`ParentId::Root`]. Node values are the ids.
    pub fn build(n: usize, parent_ids: &[usize]) -> Result<Self, PramError> {
        if parent_ids.len() != n {
            return Err(PramError::InvalidInput(format!(
                "parent array has {} entries for {} nodes",
                parent_ids.len(),
                n
            )));
        }
        Self::with_values(parent_ids, (0..n).collect())
    }

    /// Build from explicit links, `None` marking the root
    pub fn from_parent_links(links: &[Option<usize>]) -> Result<Self, PramError> {
        let parents = links
            .iter()
            .map(|link| match link {
                None => ParentId::Root,
                Some(p) => ParentId::Node(NodeId(*p)),
            })
            .collect();
        Self::from_parents(parents, (0..links.len()).collect())
    }
}

impl<V> TreeModel<V> {
    /// Build from a self-loop-rooted parent array, carrying caller values
    pub fn with_values(parent_ids: &[usize], values: Vec<V>) -> Result<Self, PramError> {
        if parent_ids.len() != values.len() {
            return Err(PramError::InvalidInput(format!(
                "{} parent entries but {} values",
                parent_ids.len(),
                values.len()
            )));
        }
        let parents = parent_ids
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                if p == i {
                    ParentId::Root
                } else {
                    ParentId::Node(NodeId(p))
                }
            })
            .collect();
        Self::from_parents(parents, values)
    }

    fn from_parents(parents: Vec<ParentId>, values: Vec<V>) -> Result<Self, PramError> {
        let n = parents.len();
        if n == 0 {
            return Err(PramError::InvalidInput(
                "tree must have at least one node".to_string(),
            ));
        }

        let mut root = None;
        for (i, parent) in parents.iter().enumerate() {
            match parent {
                ParentId::Root => {
                    if let Some(first) = root {
                        return Err(PramError::InvalidInput(format!(
                            "multiple roots: {} and {}",
                            first, i
                        )));
                    }
                    root = Some(i);
                }
                ParentId::Node(p) if p.0 >= n => {
                    return Err(PramError::InvalidInput(format!(
                        "node {} has parent {} outside [0, {})",
                        i, p.0, n
                    )));
                }
                ParentId::Node(_) => {}
            }
        }
        let root = root.ok_or_else(|| {
            PramError::InvalidInput("no root: every node has a parent".to_string())
        })?;

        traversal::check_acyclic(&parents)?;

        let nodes = parents
            .into_iter()
            .zip(values)
            .enumerate()
            .map(|(i, (parent, value))| Node {
                id: NodeId(i),
                value,
                parent,
            })
            .collect();

        debug!(n, root, "tree built");
        Ok(Self {
            nodes,
            root: NodeId(root),
        })
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Parent reference of `id`
    ///
    /// # Panics
    ///
    /// If `id` is not a node of this tree; see [`TreeModel::get`].
    #[inline]
    pub fn parent(&self, id: NodeId) -> ParentId {
        self.nodes[id.0].parent
    }

    /// Node record
    ///
    /// # Panics
    ///
    /// If `id` is not a node of this tree.
    pub fn node(&self, id: NodeId) -> &Node<V> {
        &self.nodes[id.0]
    }

    /// Node record, or `None` if `id` is out of range
    pub fn get(&self, id: NodeId) -> Option<&Node<V>> {
        self.nodes.get(id.0)
    }

    /// Value carried by `id`
    ///
    /// # Panics
    ///
    /// If `id` is not a node of this tree.
    pub fn value(&self, id: NodeId) -> &V {
        &self.nodes[id.0].value
    }

    /// All nodes in id order
    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node<V>> + '_ {
        self.nodes.iter()
    }

    /// All node ids
    pub fn iter_node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Walk from `start` up to the root (both inclusive)
    pub fn iter_ancestors(&self, start: NodeId) -> AncestorsIter<'_, V> {
        AncestorsIter::new(self, start)
    }

    /// Raw parent indices with the root mapped to itself
    ///
    /// This is the seed of the pointer-jumping ancestor buffer, where the
    /// root acts as an absorbing identity.
    pub fn ancestor_seed(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .map(|node| match node.parent {
                ParentId::Root => node.id.0,
                ParentId::Node(p) => p.0,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_fixture_with_root_marker() {
        let tree = TreeModel::build(6, &[0, 0, 0, 1, 3, 3]).unwrap();
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.root(), NodeId(0));
        assert_eq!(tree.parent(NodeId(0)), ParentId::Root);
        assert_eq!(tree.parent(NodeId(4)), ParentId::Node(NodeId(3)));
        assert_eq!(*tree.value(NodeId(5)), 5);
    }

    #[test]
    fn rejects_out_of_range_parent() {
        let err = TreeModel::build(3, &[0, 0, 3]).unwrap_err();
        assert!(matches!(err, PramError::InvalidInput(_)));
    }

    #[test]
    fn rejects_two_roots() {
        let err = TreeModel::build(3, &[0, 1, 0]).unwrap_err();
        assert!(matches!(err, PramError::InvalidInput(msg) if msg.contains("multiple roots")));
    }

    #[test]
    fn rejects_cycle_detached_from_root() {
        // 1 -> 2 -> 1 never reaches the root
        let err = TreeModel::build(4, &[0, 2, 1, 0]).unwrap_err();
        assert!(matches!(err, PramError::InvalidInput(msg) if msg.contains("cycle")));
    }

    #[test]
    fn explicit_links_and_values() {
        let tree = TreeModel::from_parent_links(&[Some(2), Some(2), None]).unwrap();
        assert_eq!(tree.root(), NodeId(2));
        assert_eq!(tree.ancestor_seed(), vec![2, 2, 2]);

        let named = TreeModel::with_values(&[1, 1], vec!["leaf", "root"]).unwrap();
        assert_eq!(*named.value(NodeId(0)), "leaf");
        assert!(named.node(NodeId(1)).is_root());
    }

    #[test]
    fn get_is_checked() {
        let tree = TreeModel::build(2, &[0, 0]).unwrap();
        assert_eq!(
            tree.get(NodeId::from(1)).map(|node| node.parent()),
            Some(ParentId::Node(NodeId(0)))
        );
        assert!(tree.get(NodeId::from(2)).is_none());
    }
}
