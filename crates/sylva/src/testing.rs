//! Node fixture for unit tests.

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use crate::node::{TreeNode, ViewResolver};
use crate::path::TreePath;

pub(crate) struct TestNode {
    name: String,
    parent: RwLock<Weak<TestNode>>,
    children: RwLock<Vec<Arc<TestNode>>>,
    value: Mutex<Option<String>>,
    resolver: RwLock<Option<Arc<dyn ViewResolver<TestNode>>>>,
}

impl TestNode {
    pub(crate) fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            parent: RwLock::new(Weak::new()),
            children: RwLock::new(Vec::new()),
            value: Mutex::new(None),
            resolver: RwLock::new(None),
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn value(&self) -> Option<String> {
        self.value.lock().clone()
    }

    pub(crate) fn set_resolver(&self, resolver: Arc<dyn ViewResolver<TestNode>>) {
        *self.resolver.write() = Some(resolver);
    }
}

impl std::fmt::Debug for TestNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Appends `child` to `parent` and returns it.
pub(crate) fn attach(parent: &Arc<TestNode>, child: Arc<TestNode>) -> Arc<TestNode> {
    *child.parent.write() = Arc::downgrade(parent);
    parent.children.write().push(Arc::clone(&child));
    child
}

impl TreeNode for TestNode {
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
        *self.children.write() = children.unwrap_or_default();
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

/// Resolves paths by name against a separately built view tree.
pub(crate) struct NameResolver {
    pub(crate) view_root: Arc<TestNode>,
}

impl ViewResolver<TestNode> for NameResolver {
    fn view_node_for_path(&self, path: &TreePath<TestNode>) -> Option<Arc<TestNode>> {
        let mut components = path.iter();
        if components.next()?.name() != self.view_root.name() {
            return None;
        }
        let mut current = Arc::clone(&self.view_root);
        for component in components {
            let index = current.index_of_child(component)?;
            let next = current.child(index)?;
            current = next;
        }
        Some(current)
    }
}
