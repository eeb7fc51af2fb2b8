//! The tree model a tree view reads from and listens to.
//!
//! [`TreeAdapter`] exposes an application-owned node graph through the read
//! operations a tree view needs and relays change requests to the view as
//! [`TreeModelEvent`]s.
//!
//! # Threading
//!
//! Background threads may mutate the nodes at any time. The adapter copes by
//! confining notification delivery to the UI thread of its [`UiExecutor`]:
//!
//! - read operations and listener registration work from any thread
//! - `fire_node_structure_changed`, `fire_node_data_changed`,
//!   `fire_node_added` and `fire_node_removed` panic off the UI thread
//! - `fire_root_changed` and `set_root` marshal onto the UI thread themselves
//!
//! A child read that races a background removal gets a placeholder instead of
//! a failure; see [`TreeAdapter::child`].
//!
//! # Filtering
//!
//! Notifications name model nodes, but the view may display a filtered copy of
//! the tree. Every notification is first mapped to the displayed tree by a
//! [`ViewMapper`]. Nodes with no displayed counterpart produce no event.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sylva::{TreeAdapter, TreeModelEvent, TreeModelListener};
//! use sylva_core::UiExecutor;
//!
//! struct Repaint;
//!
//! impl TreeModelListener<MyNode> for Repaint {
//!     fn tree_nodes_inserted(&self, event: &TreeModelEvent<MyNode>) {
//!         println!("inserted at {:?}", event.child_indices());
//!     }
//! }
//!
//! let adapter = TreeAdapter::new(Some(root.clone()), UiExecutor::for_current_thread());
//! adapter.add_listener(Arc::new(Repaint));
//!
//! let child = MyNode::new("child");
//! root.add(child.clone());
//! adapter.fire_node_added(&root, &child);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use sylva_core::logging::targets;
use sylva_core::{Result, SylvaError, UiExecutor};

use crate::event::{ListenerId, ListenerList, TreeModelEvent, TreeModelListener};
use crate::mapper::ViewMapper;
use crate::node::{TreeNode, TreeNodeExt};
use crate::path::TreePath;
use crate::placeholder::{ChildLookup, InProgressNode};

struct AdapterState<N: TreeNode> {
    root: RwLock<Option<Arc<N>>>,
    listeners: ListenerList<N>,
    /// Set while a structure-changed notification is being delivered.
    firing_structure_changed: AtomicBool,
    events_enabled: AtomicBool,
    executor: UiExecutor,
}

/// Tree model adapter over a node graph of `N`.
///
/// Cloning yields another handle to the same adapter.
pub struct TreeAdapter<N: TreeNode> {
    state: Arc<AdapterState<N>>,
}

impl<N: TreeNode> Clone for TreeAdapter<N> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<N: TreeNode> TreeAdapter<N> {
    /// Creates an adapter delivering events on `executor`'s UI thread.
    pub fn new(root: Option<Arc<N>>, executor: UiExecutor) -> Self {
        Self::from_parts(root, executor, true)
    }

    /// Starts building an adapter.
    pub fn builder() -> TreeAdapterBuilder<N> {
        TreeAdapterBuilder::new()
    }

    fn from_parts(root: Option<Arc<N>>, executor: UiExecutor, events_enabled: bool) -> Self {
        Self {
            state: Arc::new(AdapterState {
                root: RwLock::new(root),
                listeners: ListenerList::new(),
                firing_structure_changed: AtomicBool::new(false),
                events_enabled: AtomicBool::new(events_enabled),
                executor,
            }),
        }
    }

    fn from_state(state: Arc<AdapterState<N>>) -> Self {
        Self { state }
    }

    fn downgrade(&self) -> Weak<AdapterState<N>> {
        Arc::downgrade(&self.state)
    }

    /// The executor notifications are delivered on.
    pub fn executor(&self) -> &UiExecutor {
        &self.state.executor
    }

    // -------------------------------------------------------------------------
    // Root
    // -------------------------------------------------------------------------

    /// The current root, `None` once disposed.
    pub fn root(&self) -> Option<Arc<N>> {
        self.state.root.read().clone()
    }

    /// Same as [`root`](Self::root).
    ///
    /// When a filter is active the root is the displayed root; model nodes
    /// hang off a different one.
    pub fn model_root(&self) -> Option<Arc<N>> {
        self.root()
    }

    /// Replaces the root and announces the new structure.
    pub fn set_root(&self, root: Option<Arc<N>>) {
        *self.state.root.write() = root;
        self.fire_root_changed();
    }

    /// Drops the root. Listeners and the enabled flag are kept.
    pub fn dispose(&self) {
        tracing::debug!(target: targets::TREE_MODEL, "disposing tree adapter");
        *self.state.root.write() = None;
    }

    // -------------------------------------------------------------------------
    // Read contract
    // -------------------------------------------------------------------------

    /// The child of `parent` at `index`.
    ///
    /// A view calls this right after [`child_count`](Self::child_count), but a
    /// background thread may have removed children in between. A stale index
    /// yields [`ChildLookup::InProgress`] and schedules
    /// [`fire_node_structure_changed`](Self::fire_node_structure_changed) for
    /// `parent` on the UI thread, which makes the view re-read it.
    pub fn child(&self, parent: &Arc<N>, index: usize) -> ChildLookup<N> {
        if let Some(child) = parent.child(index) {
            return ChildLookup::Node(child);
        }

        tracing::debug!(
            target: targets::TREE_MODEL,
            index,
            child_count = parent.child_count(),
            "child index went stale; returning placeholder and rescheduling structure change"
        );
        let adapter = self.downgrade();
        let parent = Arc::clone(parent);
        self.state.executor.run_later(move || {
            if let Some(state) = adapter.upgrade() {
                TreeAdapter::from_state(state).fire_node_structure_changed(&parent);
            }
        });
        ChildLookup::InProgress(InProgressNode::new())
    }

    /// Number of children of `parent`.
    pub fn child_count(&self, parent: &Arc<N>) -> usize {
        parent.child_count()
    }

    /// Position of `child` under `parent`.
    pub fn index_of_child(&self, parent: &Arc<N>, child: &Arc<N>) -> Option<usize> {
        parent.index_of_child(child)
    }

    /// Whether `node` is a leaf.
    pub fn is_leaf(&self, node: &Arc<N>) -> bool {
        node.is_leaf()
    }

    /// Forwards an edit made in the view to the path's terminal node.
    pub fn value_for_path_changed(&self, path: &TreePath<N>, value: N::Value) {
        if let Some(node) = path.last_component() {
            node.value_changed(value);
        }
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Registers a listener. Listeners are notified in registration order.
    pub fn add_listener(&self, listener: Arc<dyn TreeModelListener<N>>) -> ListenerId {
        self.state.listeners.add(listener)
    }

    /// Removes a registration. Returns `false` if it was already removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.state.listeners.remove(id)
    }

    /// Number of registrations.
    pub fn listener_count(&self) -> usize {
        self.state.listeners.len()
    }

    // -------------------------------------------------------------------------
    // Enable flag
    // -------------------------------------------------------------------------

    /// Enables or disables structure-changed and root-changed notifications.
    ///
    /// Data-changed, added and removed notifications are not affected.
    pub fn set_events_enabled(&self, enabled: bool) {
        self.state.events_enabled.store(enabled, Ordering::SeqCst);
    }

    /// Whether structure-changed and root-changed notifications are enabled.
    pub fn events_enabled(&self) -> bool {
        self.state.events_enabled.load(Ordering::SeqCst)
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    /// Tells the view to re-read the whole subtree under `changed`.
    ///
    /// Dropped when events are disabled, when `changed` is filtered out of the
    /// view, or when called while another structure change is being delivered.
    /// If `changed` is a model node standing behind a filtered copy, the copy's
    /// children are discarded instead; re-deriving them produces the events.
    ///
    /// # Panics
    ///
    /// Panics if called off the UI thread.
    #[track_caller]
    pub fn fire_node_structure_changed(&self, changed: &Arc<N>) {
        self.state
            .executor
            .assert_ui_thread("TreeAdapter::fire_node_structure_changed");

        if !self.events_enabled() {
            tracing::trace!(target: targets::TREE_MODEL, "events disabled; structure change dropped");
            return;
        }
        let Some(_firing) = FiringGuard::enter(&self.state.firing_structure_changed) else {
            tracing::trace!(target: targets::TREE_MODEL, "structure change already in progress; nested request dropped");
            return;
        };

        let Some(node) = self.to_view_node(changed) else {
            return;
        };
        if !Arc::ptr_eq(&node, changed) {
            tracing::trace!(target: targets::TREE_MODEL, "resetting children of filtered view node");
            node.set_children(None);
            return;
        }

        let event = TreeModelEvent::new(node.tree_path());
        tracing::trace!(target: targets::TREE_MODEL, depth = event.path().len(), "tree structure changed");
        self.state
            .listeners
            .notify(|listener| listener.tree_structure_changed(&event));
    }

    /// Announces a new root, on the UI thread.
    ///
    /// Runs immediately when called on the UI thread, otherwise it is queued.
    pub fn fire_root_changed(&self) {
        if !self.events_enabled() {
            tracing::trace!(target: targets::TREE_MODEL, "events disabled; root change dropped");
            return;
        }
        let adapter = self.downgrade();
        self.state.executor.run_now_or_later(move || {
            let Some(state) = adapter.upgrade() else {
                return;
            };
            let adapter = TreeAdapter::from_state(state);
            if let Some(root) = adapter.root() {
                adapter.fire_node_structure_changed(&root);
            }
        });
    }

    /// Tells the view that `changed`'s own data changed.
    ///
    /// For a root (a node without parent) the event addresses the displayed
    /// root and names no children.
    ///
    /// # Panics
    ///
    /// Panics if called off the UI thread.
    #[track_caller]
    pub fn fire_node_data_changed(&self, changed: &Arc<N>) {
        self.state
            .executor
            .assert_ui_thread("TreeAdapter::fire_node_data_changed");

        let Some(event) = self.changed_node_event(changed) else {
            return;
        };
        tracing::trace!(target: targets::TREE_MODEL, "tree node changed");
        self.state
            .listeners
            .notify(|listener| listener.tree_nodes_changed(&event));
    }

    /// Tells the view that `new_node` was added under `parent`.
    ///
    /// Dropped when the parent or the new node is not displayed.
    ///
    /// # Panics
    ///
    /// Panics if called off the UI thread.
    #[track_caller]
    pub fn fire_node_added(&self, parent: &Arc<N>, new_node: &Arc<N>) {
        self.state.executor.assert_ui_thread("TreeAdapter::fire_node_added");

        let Some(view_parent) = self.to_view_node(parent) else {
            return;
        };
        let Some(index) = view_parent.index_of_child(new_node) else {
            tracing::trace!(target: targets::TREE_MODEL, "added node is not displayed; insert dropped");
            return;
        };

        let event = TreeModelEvent::with_child(view_parent.tree_path(), index, Arc::clone(new_node));
        tracing::trace!(target: targets::TREE_MODEL, index, "tree node inserted");
        self.state
            .listeners
            .notify(|listener| listener.tree_nodes_inserted(&event));
    }

    /// Tells the view that `removed` was removed from `parent` at `index`.
    ///
    /// `index` is `None` when the node was not displayed. When `parent` is a
    /// model node behind a filtered copy, `removed` is taken out of the copy
    /// instead, which notifies the view on its own.
    ///
    /// # Panics
    ///
    /// Panics if called off the UI thread.
    #[track_caller]
    pub fn fire_node_removed(&self, parent: &Arc<N>, removed: &Arc<N>, index: Option<usize>) {
        self.state
            .executor
            .assert_ui_thread("TreeAdapter::fire_node_removed");

        let Some(view_parent) = self.to_view_node(parent) else {
            return;
        };
        if !Arc::ptr_eq(&view_parent, parent) {
            remove_from_filtered(&view_parent, removed);
            return;
        }
        let Some(index) = index else {
            return;
        };

        let event = TreeModelEvent::with_child(view_parent.tree_path(), index, Arc::clone(removed));
        tracing::trace!(target: targets::TREE_MODEL, index, "tree node removed");
        self.state
            .listeners
            .notify(|listener| listener.tree_nodes_removed(&event));
    }

    fn changed_node_event(&self, changed: &Arc<N>) -> Option<TreeModelEvent<N>> {
        if changed.parent().is_none() {
            let root = self.root()?;
            return Some(TreeModelEvent::new(root.tree_path()));
        }

        let node = self.to_view_node(changed)?;
        let view_parent = node.parent()?;
        let index = view_parent.index_of_child(&node)?;
        Some(TreeModelEvent::with_child(
            view_parent.tree_path(),
            index,
            Arc::clone(changed),
        ))
    }

    fn to_view_node(&self, node: &Arc<N>) -> Option<Arc<N>> {
        let root = self.root();
        ViewMapper::new(root.as_ref()).to_view_node(node)
    }
}

impl<N: TreeNode> std::fmt::Debug for TreeAdapter<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeAdapter")
            .field("has_root", &self.state.root.read().is_some())
            .field("listeners", &self.state.listeners.len())
            .field("events_enabled", &self.events_enabled())
            .finish()
    }
}

fn remove_from_filtered<N: TreeNode>(view_parent: &Arc<N>, removed: &Arc<N>) {
    if view_parent.index_of_child(removed).is_some() {
        tracing::trace!(target: targets::TREE_MODEL, "removing node from filtered view");
        view_parent.remove_node(removed);
    }
}

/// Holds the structure-changed flag for the duration of one delivery.
struct FiringGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FiringGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for FiringGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Builder for [`TreeAdapter`].
///
/// # Example
///
/// ```ignore
/// let adapter = TreeAdapter::builder()
///     .root(root)
///     .executor(UiExecutor::for_current_thread())
///     .events_enabled(false)
///     .build()?;
/// ```
pub struct TreeAdapterBuilder<N: TreeNode> {
    root: Option<Arc<N>>,
    executor: Option<UiExecutor>,
    events_enabled: bool,
}

impl<N: TreeNode> Default for TreeAdapterBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: TreeNode> TreeAdapterBuilder<N> {
    /// A builder with no root, no executor and events enabled.
    pub fn new() -> Self {
        Self {
            root: None,
            executor: None,
            events_enabled: true,
        }
    }

    /// Sets the initial root.
    pub fn root(mut self, root: Arc<N>) -> Self {
        self.root = Some(root);
        self
    }

    /// Sets the executor whose UI thread receives notifications. Required.
    pub fn executor(mut self, executor: UiExecutor) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Sets the initial state of the enable flag.
    pub fn events_enabled(mut self, enabled: bool) -> Self {
        self.events_enabled = enabled;
        self
    }

    /// Builds the adapter.
    ///
    /// Fails with [`SylvaError::MissingExecutor`] if no executor was set.
    pub fn build(self) -> Result<TreeAdapter<N>> {
        let executor = self.executor.ok_or(SylvaError::MissingExecutor)?;
        Ok(TreeAdapter::from_parts(self.root, executor, self.events_enabled))
    }
}
