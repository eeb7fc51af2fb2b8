//! Root-to-node paths.

use std::fmt;
use std::sync::Arc;

/// The sequence of nodes from a tree's root down to one node, inclusive.
///
/// Components are compared by identity: two paths are equal when they name the
/// same node objects in the same order.
pub struct TreePath<N> {
    components: Vec<Arc<N>>,
}

impl<N> TreePath<N> {
    /// Creates a path from root-first components.
    pub fn new(components: Vec<Arc<N>>) -> Self {
        Self { components }
    }

    /// A single-component path for a root node.
    pub fn from_root(root: Arc<N>) -> Self {
        Self {
            components: vec![root],
        }
    }

    /// The terminal node, or `None` for an empty path.
    pub fn last_component(&self) -> Option<&Arc<N>> {
        self.components.last()
    }

    /// The first component.
    pub fn root(&self) -> Option<&Arc<N>> {
        self.components.first()
    }

    /// All components, root first.
    pub fn components(&self) -> &[Arc<N>] {
        &self.components
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if the path has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The path of the terminal node's parent, `None` for root or empty paths.
    pub fn parent_path(&self) -> Option<Self> {
        match self.components.len() {
            0 | 1 => None,
            n => Some(Self::new(self.components[..n - 1].to_vec())),
        }
    }

    /// A new path extended by `child`.
    pub fn with_child(&self, child: Arc<N>) -> Self {
        let mut components = self.components.clone();
        components.push(child);
        Self { components }
    }

    /// Iterates over the components, root first.
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<N>> {
        self.components.iter()
    }
}

impl<N> Clone for TreePath<N> {
    fn clone(&self) -> Self {
        Self {
            components: self.components.clone(),
        }
    }
}

impl<N> PartialEq for TreePath<N> {
    fn eq(&self, other: &Self) -> bool {
        self.components.len() == other.components.len()
            && self
                .components
                .iter()
                .zip(&other.components)
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }
}

impl<N> Eq for TreePath<N> {}

impl<N: fmt::Debug> fmt::Debug for TreePath<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.components.iter()).finish()
    }
}

impl<'a, N> IntoIterator for &'a TreePath<N> {
    type Item = &'a Arc<N>;
    type IntoIter = std::slice::Iter<'a, Arc<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
