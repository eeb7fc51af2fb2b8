//! Stand-ins for children that vanished mid-read.
//!
//! A view reads a node's child count and then asks for each child by index.
//! A background thread may shrink the child list in between. Instead of
//! failing that read, the adapter hands back an [`InProgressNode`] and
//! schedules a structure-changed notification that makes the view re-read the
//! parent.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::node::TreeNode;

static NEXT_PLACEHOLDER_ID: AtomicU64 = AtomicU64::new(1);

/// A data-less leaf shown while the real child list settles.
///
/// Every placeholder is distinct: it equals only itself and never equals a
/// real node.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct InProgressNode {
    id: u64,
}

impl InProgressNode {
    /// Label a view may render for the placeholder.
    pub const LABEL: &'static str = "In Progress...";

    /// Creates a new placeholder.
    pub fn new() -> Self {
        Self {
            id: NEXT_PLACEHOLDER_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Always zero.
    pub fn child_count(&self) -> usize {
        0
    }

    /// Always `true`.
    pub fn is_leaf(&self) -> bool {
        true
    }
}

impl Default for InProgressNode {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InProgressNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::LABEL)
    }
}

/// Result of [`TreeAdapter::child`](crate::TreeAdapter::child).
pub enum ChildLookup<N> {
    /// The child at the requested index.
    Node(Arc<N>),
    /// The index was stale; a correcting notification has been scheduled.
    InProgress(InProgressNode),
}

impl<N: TreeNode> ChildLookup<N> {
    /// The real child, if the lookup found one.
    pub fn node(&self) -> Option<&Arc<N>> {
        match self {
            Self::Node(node) => Some(node),
            Self::InProgress(_) => None,
        }
    }

    /// Consumes the lookup, returning the real child if any.
    pub fn into_node(self) -> Option<Arc<N>> {
        match self {
            Self::Node(node) => Some(node),
            Self::InProgress(_) => None,
        }
    }

    /// Returns `true` for a placeholder.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress(_))
    }

    /// Returns `true` if this is exactly `node` (pointer identity).
    pub fn is(&self, node: &Arc<N>) -> bool {
        self.node().is_some_and(|n| Arc::ptr_eq(n, node))
    }

    /// Child count of the real child, zero for a placeholder.
    pub fn child_count(&self) -> usize {
        match self {
            Self::Node(node) => node.child_count(),
            Self::InProgress(placeholder) => placeholder.child_count(),
        }
    }

    /// Leaf status of the real child, `true` for a placeholder.
    pub fn is_leaf(&self) -> bool {
        match self {
            Self::Node(node) => node.is_leaf(),
            Self::InProgress(placeholder) => placeholder.is_leaf(),
        }
    }

    /// Index of `child` under the real child; a placeholder has no children.
    pub fn index_of_child(&self, child: &Arc<N>) -> Option<usize> {
        self.node().and_then(|node| node.index_of_child(child))
    }
}

impl<N: fmt::Debug> fmt::Debug for ChildLookup<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::InProgress(placeholder) => f.debug_tuple("InProgress").field(placeholder).finish(),
        }
    }
}
