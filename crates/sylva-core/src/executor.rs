//! Marshalling work onto the UI thread.
//!
//! A [`UiExecutor`] pairs the UI thread's [`ThreadAffinity`] with the queue of
//! tasks waiting to run there. Clones share the same queue, so a handle can be
//! handed to background threads that need to schedule UI work. The owning
//! event loop drains the queue with [`UiExecutor::process_pending`] or, when it
//! wants to bound the time spent per idle cycle, [`UiExecutor::process_batch`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use sylva_core::UiExecutor;
//!
//! let executor = UiExecutor::for_current_thread();
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let background = executor.clone();
//! let counter = hits.clone();
//! std::thread::spawn(move || {
//!     background.run_later(move || {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     });
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(executor.process_pending(), 1);
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

use std::sync::Arc;

use crate::error::{DispatchError, Result};
use crate::logging::targets;
use crate::task::{TaskId, TaskQueue};
use crate::thread_check::ThreadAffinity;

/// Handle to the UI thread and its task queue.
#[derive(Clone)]
pub struct UiExecutor {
    affinity: ThreadAffinity,
    queue: Arc<TaskQueue>,
}

impl UiExecutor {
    /// Make the calling thread the UI thread of a new executor.
    pub fn for_current_thread() -> Self {
        Self {
            affinity: ThreadAffinity::current(),
            queue: Arc::new(TaskQueue::new()),
        }
    }

    /// Set how many tasks one [`process_batch`](Self::process_batch) runs.
    pub fn with_batch_size(self, batch_size: usize) -> Self {
        self.queue.set_batch_size(batch_size);
        self
    }

    /// The UI thread's affinity.
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }

    /// Returns `true` when called from the UI thread.
    #[inline]
    pub fn is_ui_thread(&self) -> bool {
        self.affinity.is_same_thread()
    }

    /// Panics unless called from the UI thread.
    #[inline]
    #[track_caller]
    pub fn assert_ui_thread(&self, operation: &str) {
        self.affinity.assert_same_thread(operation);
    }

    /// Queue `task` to run on the UI thread at its next opportunity.
    ///
    /// The task is always deferred, even when the caller is the UI thread.
    pub fn run_later<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.queue.post(task);
        tracing::trace!(target: targets::DISPATCH, task = id.as_u64(), "posted task to UI thread");
        id
    }

    /// Run `task` now when on the UI thread, otherwise queue it.
    ///
    /// Returns the task ID when the task was queued.
    pub fn run_now_or_later<F>(&self, task: F) -> Option<TaskId>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_ui_thread() {
            task();
            None
        } else {
            Some(self.run_later(task))
        }
    }

    /// Cancel a queued task. Returns `true` if it had not run yet.
    pub fn cancel(&self, id: TaskId) -> bool {
        self.queue.cancel(id)
    }

    /// Number of queued tasks.
    pub fn pending_count(&self) -> usize {
        self.queue.pending_count()
    }

    /// Run every task queued so far.
    ///
    /// # Panics
    ///
    /// Panics if called off the UI thread.
    #[track_caller]
    pub fn process_pending(&self) -> usize {
        self.assert_ui_thread("UiExecutor::process_pending");
        self.drain_all()
    }

    /// Run at most one batch of queued tasks.
    ///
    /// # Panics
    ///
    /// Panics if called off the UI thread.
    #[track_caller]
    pub fn process_batch(&self) -> usize {
        self.assert_ui_thread("UiExecutor::process_batch");
        let executed = self.queue.process_batch();
        if executed > 0 {
            tracing::trace!(target: targets::DISPATCH, executed, "processed task batch");
        }
        executed
    }

    /// Like [`process_pending`](Self::process_pending), but reports a call
    /// from the wrong thread as an error instead of panicking.
    pub fn try_process_pending(&self) -> Result<usize> {
        if !self.is_ui_thread() {
            return Err(DispatchError::NotOnUiThread {
                operation: "UiExecutor::try_process_pending",
            }
            .into());
        }
        Ok(self.drain_all())
    }

    fn drain_all(&self) -> usize {
        let executed = self.queue.process_all();
        if executed > 0 {
            tracing::trace!(target: targets::DISPATCH, executed, "processed pending tasks");
        }
        executed
    }
}

impl std::fmt::Debug for UiExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiExecutor")
            .field("ui_thread", &self.affinity.thread_id())
            .field("pending", &self.queue.pending_count())
            .finish()
    }
}
