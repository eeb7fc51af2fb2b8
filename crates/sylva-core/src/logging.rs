//! Logging facilities for Sylva.
//!
//! Sylva uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("sylva::tree_model=trace")
//!     .init();
//! ```
//!
//! Every log statement in the workspace names one of the [`targets`] below, so
//! a filter directive can single out one subsystem.

/// Target names for log filtering.
pub mod targets {
    /// UI task queue and executor.
    pub const DISPATCH: &str = "sylva_core::dispatch";
    /// Tree adapter notifications and read contract.
    pub const TREE_MODEL: &str = "sylva::tree_model";
    /// Model-to-view node resolution.
    pub const VIEW_MAPPER: &str = "sylva::view_mapper";
}
