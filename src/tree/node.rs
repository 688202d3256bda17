//! Node identifiers and the tagged parent reference
//!
//! The root is marked with [`ParentId::Root`] rather than a self-loop, so
//! "root" and "cycle of length one" can never be confused.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Typed index of a node, `0..n`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw index into per-node arrays
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(i: usize) -> Self {
        NodeId(i)
    }
}

impl From<NodeId> for usize {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Parent reference of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParentId {
    /// No parent: this node is the root
    Root,
    /// Regular parent link
    Node(NodeId),
}

impl ParentId {
    /// Check if this is the root marker
    pub fn is_root(&self) -> bool {
        matches!(self, ParentId::Root)
    }

    /// Parent node, if any
    pub fn node(&self) -> Option<NodeId> {
        match self {
            ParentId::Root => None,
            ParentId::Node(id) => Some(*id),
        }
    }

    /// Does this parent reference point at `id`
    ///
    /// The root marker never matches a node.
    #[inline]
    pub fn is(&self, id: usize) -> bool {
        matches!(self, ParentId::Node(p) if p.0 == id)
    }
}

/// Tree node: immutable identity and value, plus its parent link
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node<V> {
    pub(crate) id: NodeId,
    pub(crate) value: V,
    pub(crate) parent: ParentId,
}

impl<V> Node<V> {
    /// Node identifier
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Payload carried by the node
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Parent reference
    pub fn parent(&self) -> ParentId {
        self.parent
    }

    /// Check if root
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_root()
    }
}
