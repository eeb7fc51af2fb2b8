//! Tree-view model adapter for Sylva.
//!
//! Sylva sits between an application's node tree and a tree-view widget. The
//! tree may be populated lazily, filtered, and mutated by background threads;
//! the widget expects indices and parents that are valid whenever it hears
//! about a change. This crate reconciles the two:
//!
//! - [`TreeAdapter`]: the read contract the widget queries and the four
//!   notifications it listens to (structure changed, data changed, added,
//!   removed), delivered on the UI thread only
//! - [`ViewMapper`]: maps nodes of the full model tree to the nodes of the
//!   filtered tree the widget actually shows, so that nothing is announced
//!   for hidden nodes
//! - [`ChildLookup`] / [`InProgressNode`]: the placeholder returned when a
//!   background mutation invalidated a child index between two widget reads
//!
//! The application provides the nodes by implementing [`TreeNode`], and the
//! widget provides filtered-path lookup by implementing [`ViewResolver`].
//! Threading plumbing lives in `sylva-core`.
//!
//! # Architecture Overview
//!
//! ```text
//!  background threads            UI thread
//! ┌──────────────────┐   ┌──────────────────────────────────────┐
//! │ mutate TreeNodes │──>│ TreeAdapter::fire_*                  │
//! └──────────────────┘   │   └─> ViewMapper::to_view_node       │
//!                        │         └─> TreeModelListener (view) │
//!                        └──────────────────────────────────────┘
//! ```

mod adapter;
mod event;
mod mapper;
mod node;
mod path;
mod placeholder;
#[cfg(test)]
mod testing;

pub use adapter::{TreeAdapter, TreeAdapterBuilder};
pub use event::{ListenerId, TreeModelEvent, TreeModelListener};
pub use mapper::ViewMapper;
pub use node::{TreeNode, TreeNodeExt, ViewResolver};
pub use path::TreePath;
pub use placeholder::{ChildLookup, InProgressNode};

pub use sylva_core::UiExecutor;
