//! Error types for Sylva.

use thiserror::Error;

/// The main error type for Sylva operations.
///
/// Threading-contract violations are not represented here: emitting tree
/// notifications off the UI thread is a programming error and panics.
#[derive(Debug, Error)]
pub enum SylvaError {
    /// A tree adapter was built without a UI executor to deliver events on.
    #[error("tree adapter requires a UI executor; call TreeAdapterBuilder::executor() first")]
    MissingExecutor,
    /// A dispatch-related error.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Errors raised by the UI task dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Queued tasks may only be drained by the thread that owns the queue.
    #[error("{operation} must be called from the UI thread")]
    NotOnUiThread {
        /// The operation that was attempted.
        operation: &'static str,
    },
}

/// A specialized Result type for Sylva operations.
pub type Result<T> = std::result::Result<T, SylvaError>;
