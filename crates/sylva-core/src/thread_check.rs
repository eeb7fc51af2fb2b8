//! UI thread affinity checks.
//!
//! A tree-view widget must only be told about structural changes on the thread
//! that owns it. [`ThreadAffinity`] records that thread and turns a call from
//! anywhere else into an immediate, descriptive panic. These checks are always
//! active, in release builds too: delivering a notification from the wrong
//! thread corrupts the widget's view of the tree in ways that surface much
//! later and far away from the cause.
//!
//! ```
//! use sylva_core::thread_check::ThreadAffinity;
//!
//! let affinity = ThreadAffinity::current();
//! assert!(affinity.is_same_thread());
//! affinity.assert_same_thread("TreeAdapter::fire_node_added");
//! ```

use std::thread::ThreadId;

/// Records the thread an object is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Bind to the calling thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// The thread this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Returns `true` if the calling thread is the bound thread.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Panics unless called from the bound thread.
    ///
    /// `operation` names the call that was attempted and is included in the
    /// panic message.
    #[inline]
    #[track_caller]
    pub fn assert_same_thread(&self, operation: &str) {
        if !self.is_same_thread() {
            self.panic_wrong_thread(operation);
        }
    }

    #[cold]
    #[inline(never)]
    #[track_caller]
    fn panic_wrong_thread(&self, operation: &str) -> ! {
        let current = std::thread::current();
        let current_name = current.name().unwrap_or("<unnamed>");
        let current_id = current.id();
        let location = std::panic::Location::caller();

        panic!(
            "\n\
            ══════════════════════════════════════════════════════════════════════\n\
            THREAD AFFINITY VIOLATION\n\
            ══════════════════════════════════════════════════════════════════════\n\
            \n\
            {operation} must be called from the UI thread\n\
            \n\
            Location: {location}\n\
            UI thread: {:?}\n\
            Current thread: \"{current_name}\" (ID: {current_id:?})\n\
            \n\
            Tree notifications describe indices that are only meaningful to the\n\
            widget on the thread that renders it.\n\
            \n\
            POSSIBLE SOLUTIONS:\n\
            \n\
            1. Post the call with UiExecutor::run_later(..)\n\
            2. Use UiExecutor::run_now_or_later(..) when the caller may already\n\
               be on the UI thread\n\
            \n\
            ══════════════════════════════════════════════════════════════════════",
            self.thread_id
        )
    }
}
