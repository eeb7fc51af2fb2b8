//! Deferred task queue for the UI thread.
//!
//! Any thread may post a task; only the owner drains the queue. Posting goes
//! through a `crossbeam-channel`, so a background thread never waits on the UI
//! thread while it is busy running tasks.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;

use crate::logging::targets;

/// A unique identifier for a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Global counter for generating unique task IDs.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

/// A boxed task closure.
type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

struct TaskData {
    id: TaskId,
    task: BoxedTask,
}

/// Default number of tasks run by one [`TaskQueue::process_batch`] call.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// A FIFO of deferred tasks.
pub struct TaskQueue {
    sender: Sender<TaskData>,
    receiver: Receiver<TaskData>,
    /// Tasks posted and neither run nor cancelled yet.
    pending: Mutex<HashSet<TaskId>>,
    batch_size: AtomicUsize,
}

impl TaskQueue {
    /// Create a new task queue.
    pub fn new() -> Self {
        Self::with_batch_size(DEFAULT_BATCH_SIZE)
    }

    /// Create a new task queue with a custom batch size.
    pub fn with_batch_size(batch_size: usize) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            pending: Mutex::new(HashSet::new()),
            batch_size: AtomicUsize::new(batch_size.max(1)),
        }
    }

    /// Post a task. Returns an ID that can be used to cancel it.
    pub fn post<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = next_task_id();
        self.pending.lock().insert(id);
        // The queue owns its receiver, so the channel cannot be disconnected.
        if self
            .sender
            .send(TaskData {
                id,
                task: Box::new(task),
            })
            .is_err()
        {
            self.pending.lock().remove(&id);
            tracing::warn!(target: targets::DISPATCH, task = id.as_u64(), "task queue disconnected; task dropped");
        }
        id
    }

    /// Cancel a pending task.
    ///
    /// Returns `true` if the task was still pending.
    pub fn cancel(&self, id: TaskId) -> bool {
        self.pending.lock().remove(&id)
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.pending.lock().is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Run up to the configured batch size of tasks.
    ///
    /// Returns the number of tasks run.
    pub fn process_batch(&self) -> usize {
        let batch_size = self.batch_size.load(Ordering::Relaxed);
        let mut executed = 0;
        while executed < batch_size {
            match self.receiver.try_recv() {
                Ok(task) => {
                    if self.run(task) {
                        executed += 1;
                    }
                }
                Err(_) => break,
            }
        }
        executed
    }

    /// Run every task queued at the time of the call.
    ///
    /// Tasks posted by the tasks being run are left for the next call, so a
    /// task that reposts itself cannot spin this loop forever.
    pub fn process_all(&self) -> usize {
        let available = self.receiver.len();
        self.receiver
            .try_iter()
            .take(available)
            .fold(0, |executed, task| executed + usize::from(self.run(task)))
    }

    /// Set the batch size for [`process_batch`](Self::process_batch).
    pub fn set_batch_size(&self, size: usize) {
        self.batch_size.store(size.max(1), Ordering::Relaxed);
    }

    /// Current batch size.
    pub fn batch_size(&self) -> usize {
        self.batch_size.load(Ordering::Relaxed)
    }

    fn run(&self, data: TaskData) -> bool {
        if !self.pending.lock().remove(&data.id) {
            tracing::trace!(target: targets::DISPATCH, task = data.id.as_u64(), "skipping cancelled task");
            return false;
        }
        (data.task)();
        true
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}
