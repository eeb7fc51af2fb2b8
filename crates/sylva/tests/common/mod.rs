//! Shared fixtures for the adapter integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use sylva::{TreeModelEvent, TreeModelListener, TreeNode, TreePath, ViewResolver};

type ResetHook = Box<dyn Fn() + Send + Sync>;

/// A named node. Children are matched by name, so a filtered copy of a node
/// is found by `index_of_child` under either tree.
pub struct Node {
    name: String,
    parent: RwLock<Weak<Node>>,
    children: RwLock<Vec<Arc<Node>>>,
    value: Mutex<Option<String>>,
    resolver: RwLock<Option<Arc<dyn ViewResolver<Node>>>>,
    reset_hook: Mutex<Option<ResetHook>>,
    resets: Mutex<usize>,
}

impl Node {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            parent: RwLock::new(Weak::new()),
            children: RwLock::new(Vec::new()),
            value: Mutex::new(None),
            resolver: RwLock::new(None),
            reset_hook: Mutex::new(None),
            resets: Mutex::new(0),
        })
    }

    /// A root with one leaf child per name.
    pub fn with_children(name: &str, children: &[&str]) -> Arc<Self> {
        let root = Self::new(name);
        for child in children {
            add(&root, Self::new(child));
        }
        root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<String> {
        self.value.lock().clone()
    }

    pub fn child_names(&self) -> Vec<String> {
        self.children.read().iter().map(|c| c.name.clone()).collect()
    }

    /// How many times `set_children(None)` was called.
    pub fn resets(&self) -> usize {
        *self.resets.lock()
    }

    /// Runs `hook` every time the children are reset.
    pub fn on_reset(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.reset_hook.lock() = Some(Box::new(hook));
    }

    /// Removes the last `count` children without telling anyone.
    pub fn truncate(&self, count: usize) {
        let mut children = self.children.write();
        let keep = children.len().saturating_sub(count);
        children.truncate(keep);
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Appends `child` under `parent` and returns it.
pub fn add(parent: &Arc<Node>, child: Arc<Node>) -> Arc<Node> {
    *child.parent.write() = Arc::downgrade(parent);
    parent.children.write().push(Arc::clone(&child));
    child
}

impl TreeNode for Node {
    type Value = String;

    fn child_count(&self) -> usize {
        self.children.read().len()
    }

    fn child(&self, index: usize) -> Option<Arc<Self>> {
        self.children.read().get(index).cloned()
    }

    fn index_of_child(&self, child: &Arc<Self>) -> Option<usize> {
        self.children.read().iter().position(|c| c.name == child.name)
    }

    fn parent(&self) -> Option<Arc<Self>> {
        self.parent.read().upgrade()
    }

    fn value_changed(&self, value: String) {
        *self.value.lock() = Some(value);
    }

    fn set_children(&self, children: Option<Vec<Arc<Self>>>) {
        match children {
            Some(children) => *self.children.write() = children,
            None => {
                self.children.write().clear();
                *self.resets.lock() += 1;
                if let Some(hook) = self.reset_hook.lock().as_ref() {
                    hook();
                }
            }
        }
    }

    fn remove_node(&self, child: &Arc<Self>) {
        let mut children = self.children.write();
        if let Some(pos) = children.iter().position(|c| c.name == child.name) {
            let removed = children.remove(pos);
            *removed.parent.write() = Weak::new();
        }
    }

    fn view_resolver(&self) -> Option<Arc<dyn ViewResolver<Self>>> {
        self.resolver.read().clone()
    }
}

/// Resolves model paths by name against a filtered copy of the model tree.
pub struct FilteredView {
    root: Arc<Node>,
}

impl FilteredView {
    /// Copies `model_root`, keeping the nodes `keep` accepts (and their
    /// ancestors), and attaches a resolver to the copy's root.
    pub fn build(model_root: &Arc<Node>, keep: impl Fn(&Node) -> bool) -> Arc<Node> {
        let view_root = copy_filtered(model_root, &keep);
        let resolver = Arc::new(FilteredView {
            root: Arc::clone(&view_root),
        });
        *view_root.resolver.write() = Some(resolver);
        view_root
    }
}

fn copy_filtered(node: &Arc<Node>, keep: &dyn Fn(&Node) -> bool) -> Arc<Node> {
    let copy = Node::new(&node.name);
    for child in node.children.read().iter() {
        if keep(child) {
            add(&copy, copy_filtered(child, keep));
        }
    }
    copy
}

impl ViewResolver<Node> for FilteredView {
    fn view_node_for_path(&self, path: &TreePath<Node>) -> Option<Arc<Node>> {
        let mut components = path.iter();
        if components.next()?.name != self.root.name {
            return None;
        }
        let mut current = Arc::clone(&self.root);
        for component in components {
            let index = current.index_of_child(component)?;
            let next = current.child(index)?;
            current = next;
        }
        Some(current)
    }
}

/// One received notification, flattened to names for easy comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    Structure(Vec<String>),
    Changed(Vec<String>, Option<Vec<usize>>),
    Inserted(Vec<String>, Vec<usize>, Vec<String>),
    Removed(Vec<String>, Vec<usize>, Vec<String>),
}

fn names(path: &TreePath<Node>) -> Vec<String> {
    path.iter().map(|n| n.name.clone()).collect()
}

fn child_names(event: &TreeModelEvent<Node>) -> Vec<String> {
    event
        .children()
        .unwrap_or_default()
        .iter()
        .map(|n| n.name.clone())
        .collect()
}

/// Records every notification it receives.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Received>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Received> {
        self.events.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().len()
    }

    pub fn structure_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, Received::Structure(_)))
            .count()
    }
}

impl TreeModelListener<Node> for Recorder {
    fn tree_nodes_changed(&self, event: &TreeModelEvent<Node>) {
        self.events.lock().push(Received::Changed(
            names(event.path()),
            event.child_indices().map(<[usize]>::to_vec),
        ));
    }

    fn tree_nodes_inserted(&self, event: &TreeModelEvent<Node>) {
        self.events.lock().push(Received::Inserted(
            names(event.path()),
            event.child_indices().unwrap_or_default().to_vec(),
            child_names(event),
        ));
    }

    fn tree_nodes_removed(&self, event: &TreeModelEvent<Node>) {
        self.events.lock().push(Received::Removed(
            names(event.path()),
            event.child_indices().unwrap_or_default().to_vec(),
            child_names(event),
        ));
    }

    fn tree_structure_changed(&self, event: &TreeModelEvent<Node>) {
        self.events
            .lock()
            .push(Received::Structure(names(event.path())));
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Installs a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
