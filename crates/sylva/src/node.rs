//! Node and view traits the adapter is generic over.
//!
//! The node graph is owned by the application. The adapter only needs the
//! introspection and the handful of mutations listed on [`TreeNode`]; how a
//! node stores, loads or filters its children is up to the implementation.

use std::sync::Arc;

use crate::path::TreePath;

/// A node in a tree shown through a [`TreeAdapter`](crate::TreeAdapter).
///
/// Nodes are shared as `Arc<Self>` and may be mutated from background threads
/// while the UI thread reads them, so every method takes `&self` and
/// implementations use interior mutability.
///
/// # Identity
///
/// The adapter compares nodes by pointer identity ([`Arc::ptr_eq`]) when it
/// needs to know whether a node belongs to the displayed tree.
/// [`index_of_child`](TreeNode::index_of_child) is different: it is asked to
/// locate a *model* node among the children of a *view* node, so it should
/// match on logical identity (the same entity in a filtered copy).
pub trait TreeNode: Send + Sync + Sized + 'static {
    /// The value type accepted by [`value_changed`](TreeNode::value_changed).
    type Value;

    /// Number of children currently loaded.
    fn child_count(&self) -> usize;

    /// The child at `index`, or `None` when out of range.
    fn child(&self, index: usize) -> Option<Arc<Self>>;

    /// Position of `child` among this node's children.
    fn index_of_child(&self, child: &Arc<Self>) -> Option<usize>;

    /// The parent node, `None` for a root.
    fn parent(&self) -> Option<Arc<Self>>;

    /// Whether the node is a leaf.
    fn is_leaf(&self) -> bool {
        self.child_count() == 0
    }

    /// Request a value update, typically after an in-place edit in the view.
    fn value_changed(&self, value: Self::Value);

    /// Replace the children. `None` discards them so they are derived again
    /// on next access.
    fn set_children(&self, children: Option<Vec<Arc<Self>>>);

    /// Physically remove `child` from this node.
    fn remove_node(&self, child: &Arc<Self>);

    /// The view that displays the tree this node is the root of.
    ///
    /// Only consulted on the adapter's root. Returns `None` while the tree is
    /// not attached to a view.
    fn view_resolver(&self) -> Option<Arc<dyn ViewResolver<Self>>> {
        None
    }
}

/// The display-widget side of model-to-view resolution.
pub trait ViewResolver<N: TreeNode>: Send + Sync {
    /// The node standing for `path` in the currently displayed (possibly
    /// filtered) tree, or `None` when the path is filtered out.
    fn view_node_for_path(&self, path: &TreePath<N>) -> Option<Arc<N>>;
}

/// Navigation helpers derived from [`TreeNode::parent`].
pub trait TreeNodeExt<N: TreeNode> {
    /// The topmost ancestor, or the node itself when it has no parent.
    fn root(&self) -> Arc<N>;

    /// The path from the root down to this node.
    fn tree_path(&self) -> TreePath<N>;

    /// This node's index within its parent, `None` for a root or a node its
    /// parent no longer lists.
    fn index_in_parent(&self) -> Option<usize>;
}

impl<N: TreeNode> TreeNodeExt<N> for Arc<N> {
    fn root(&self) -> Arc<N> {
        let mut current = Arc::clone(self);
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    fn tree_path(&self) -> TreePath<N> {
        let mut components = vec![Arc::clone(self)];
        let mut current = Arc::clone(self);
        while let Some(parent) = current.parent() {
            components.push(Arc::clone(&parent));
            current = parent;
        }
        components.reverse();
        TreePath::new(components)
    }

    fn index_in_parent(&self) -> Option<usize> {
        self.parent()?.index_of_child(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestNode, attach};

    #[test]
    fn test_root_and_path() {
        let root = TestNode::new("root");
        let a = attach(&root, TestNode::new("a"));
        let b = attach(&a, TestNode::new("b"));

        assert!(Arc::ptr_eq(&b.root(), &root));
        assert!(Arc::ptr_eq(&root.root(), &root));

        let path = b.tree_path();
        let names: Vec<_> = path.iter().map(|n| n.name().to_string()).collect();
        assert_eq!(names, ["root", "a", "b"]);
    }

    #[test]
    fn test_index_in_parent() {
        let root = TestNode::new("root");
        attach(&root, TestNode::new("a"));
        let b = attach(&root, TestNode::new("b"));

        assert_eq!(b.index_in_parent(), Some(1));
        assert_eq!(root.index_in_parent(), None);

        root.remove_node(&b);
        assert_eq!(b.index_in_parent(), None);
    }

    #[test]
    fn test_default_is_leaf() {
        let root = TestNode::new("root");
        assert!(root.is_leaf());
        attach(&root, TestNode::new("a"));
        assert!(!root.is_leaf());
    }
}
