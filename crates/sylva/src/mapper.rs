//! Model-to-view node resolution.
//!
//! When a view filters the tree it displays copies of the model nodes that
//! pass the filter. Change requests still arrive for model nodes, so before a
//! notification goes out the adapter looks up the node standing for the same
//! entity in the displayed tree. Nodes already reachable from the displayed
//! root are their own view node. Everything else is resolved by path through
//! the root's [`ViewResolver`](crate::ViewResolver).
//!
//! Nothing is cached: the filtered tree can be rebuilt between two calls.

use std::sync::Arc;

use sylva_core::logging::targets;

use crate::node::{TreeNode, TreeNodeExt};

/// Resolves model nodes against the tree rooted at the displayed root.
pub struct ViewMapper<'a, N: TreeNode> {
    root: Option<&'a Arc<N>>,
}

impl<'a, N: TreeNode> ViewMapper<'a, N> {
    /// A mapper for the tree currently displayed under `root`.
    pub fn new(root: Option<&'a Arc<N>>) -> Self {
        Self { root }
    }

    /// The displayed node for `node`, or `None` when it is filtered out or no
    /// view is attached.
    pub fn to_view_node(&self, node: &Arc<N>) -> Option<Arc<N>> {
        let root = self.root?;
        if Arc::ptr_eq(&node.root(), root) {
            return Some(Arc::clone(node));
        }

        let Some(resolver) = root.view_resolver() else {
            tracing::trace!(target: targets::VIEW_MAPPER, "no view attached to root; node has no view counterpart");
            return None;
        };

        let view_node = resolver.view_node_for_path(&node.tree_path());
        if view_node.is_none() {
            tracing::trace!(target: targets::VIEW_MAPPER, "node is filtered out of the view");
        }
        view_node
    }
}
