//! Core systems for Sylva.
//!
//! This crate provides the threading plumbing the tree adapter in `sylva`
//! builds on:
//!
//! - **Thread affinity**: recording the UI thread and failing fast when UI-only
//!   operations are called from elsewhere
//! - **Task queue**: deferred tasks posted from any thread, drained on the UI
//!   thread
//! - **UI executor**: the handle combining both, with "run later" and
//!   "run now or later" marshalling
//! - **Errors and logging targets** shared by the workspace
//!
//! # Example
//!
//! ```
//! use sylva_core::UiExecutor;
//!
//! let executor = UiExecutor::for_current_thread();
//! executor.run_later(|| println!("runs on the UI thread"));
//!
//! // Called by the event loop when it is idle.
//! executor.process_pending();
//! ```

mod error;
pub mod executor;
pub mod logging;
pub mod task;
pub mod thread_check;

pub use error::{DispatchError, Result, SylvaError};
pub use executor::UiExecutor;
pub use task::{TaskId, TaskQueue};
pub use thread_check::ThreadAffinity;
