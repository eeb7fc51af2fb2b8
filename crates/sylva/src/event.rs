//! Change notifications delivered to tree views.

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::node::TreeNode;
use crate::path::TreePath;

new_key_type! {
    /// Identifies one listener registration.
    ///
    /// Returned by [`TreeAdapter::add_listener`](crate::TreeAdapter::add_listener)
    /// and used to remove that registration again.
    pub struct ListenerId;
}

/// Describes a change to the tree.
///
/// `path` addresses the parent of the affected children, or for
/// structure-changed events the root of the subtree to re-read. When the root
/// node's own data changes, the event addresses the root's path and carries no
/// children.
pub struct TreeModelEvent<N> {
    path: TreePath<N>,
    child_indices: Option<Vec<usize>>,
    children: Option<Vec<Arc<N>>>,
}

impl<N> TreeModelEvent<N> {
    /// An event addressing `path` itself, without children.
    pub fn new(path: TreePath<N>) -> Self {
        Self {
            path,
            child_indices: None,
            children: None,
        }
    }

    /// An event naming one child of the node at `path`.
    pub fn with_child(path: TreePath<N>, index: usize, child: Arc<N>) -> Self {
        Self {
            path,
            child_indices: Some(vec![index]),
            children: Some(vec![child]),
        }
    }

    /// The addressed path.
    pub fn path(&self) -> &TreePath<N> {
        &self.path
    }

    /// Indices of the affected children, `None` when the event carries none.
    pub fn child_indices(&self) -> Option<&[usize]> {
        self.child_indices.as_deref()
    }

    /// The affected children, parallel to [`child_indices`](Self::child_indices).
    pub fn children(&self) -> Option<&[Arc<N>]> {
        self.children.as_deref()
    }
}

impl<N: std::fmt::Debug> std::fmt::Debug for TreeModelEvent<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeModelEvent")
            .field("path", &self.path)
            .field("child_indices", &self.child_indices)
            .field("children", &self.children)
            .finish()
    }
}

/// Receives tree change notifications, always on the UI thread.
///
/// All methods default to doing nothing.
pub trait TreeModelListener<N: TreeNode>: Send + Sync {
    /// Data of existing children changed, or the root's own data when the
    /// event has no children.
    fn tree_nodes_changed(&self, _event: &TreeModelEvent<N>) {}

    /// Children were inserted.
    fn tree_nodes_inserted(&self, _event: &TreeModelEvent<N>) {}

    /// Children were removed.
    fn tree_nodes_removed(&self, _event: &TreeModelEvent<N>) {}

    /// The whole subtree at the event's path must be re-read.
    fn tree_structure_changed(&self, _event: &TreeModelEvent<N>) {}
}

struct Registry<N: TreeNode> {
    listeners: SlotMap<ListenerId, Arc<dyn TreeModelListener<N>>>,
    /// Registration order; slot map iteration order is not stable across
    /// removals.
    order: Vec<ListenerId>,
}

/// Ordered listener registrations.
///
/// Notification order is registration order. The same listener may be
/// registered more than once and is then notified once per registration.
pub(crate) struct ListenerList<N: TreeNode> {
    registry: Mutex<Registry<N>>,
}

impl<N: TreeNode> ListenerList<N> {
    pub(crate) fn new() -> Self {
        Self {
            registry: Mutex::new(Registry {
                listeners: SlotMap::with_key(),
                order: Vec::new(),
            }),
        }
    }

    pub(crate) fn add(&self, listener: Arc<dyn TreeModelListener<N>>) -> ListenerId {
        let mut registry = self.registry.lock();
        let id = registry.listeners.insert(listener);
        registry.order.push(id);
        id
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut registry = self.registry.lock();
        if registry.listeners.remove(id).is_none() {
            return false;
        }
        registry.order.retain(|&other| other != id);
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.registry.lock().order.len()
    }

    /// Calls `f` for every listener in registration order.
    ///
    /// Runs on a snapshot taken before the first call, so listeners may
    /// register or remove listeners while being notified.
    pub(crate) fn notify(&self, f: impl Fn(&dyn TreeModelListener<N>)) {
        let snapshot: Vec<_> = {
            let registry = self.registry.lock();
            registry
                .order
                .iter()
                .filter_map(|id| registry.listeners.get(*id).cloned())
                .collect()
        };
        for listener in &snapshot {
            f(listener.as_ref());
        }
    }
}
