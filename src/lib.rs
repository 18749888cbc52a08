//! # Taskboard
//!
//! Client-side state for hierarchical task lists shown in dashboard widgets.
//! Tasks form a forest ordered by `display_order`; local mutations are
//! applied optimistically and later replaced by the backend's authoritative
//! hierarchy.
//!
//! ## Architecture Overview
//!
//! - **[`task`]**: Task model, pure tree algorithms, filtering, validation,
//!   the wire codec and the [`TaskStore`] itself
//! - **[`sync`]**: Backend trait, an in-process backend and the
//!   [`SyncCoordinator`] that drives optimistic writes
//! - **[`config`]**: TOML configuration and discovery
//! - **[`cli`]**: The `taskboard` command line tool
//!
//! ## Quick Start
//!
//! ```rust
//! use taskboard::{Task, TaskStore};
//!
//! let mut store = TaskStore::new();
//! store.upsert_task(Task::new("10", "Groceries", "personal"));
//! store.upsert_task(Task::new("11", "Buy milk", "personal").with_parent(10));
//!
//! assert_eq!(store.hierarchy()[0].children()[0].id, "11");
//! assert_eq!(store.get_flat_tasks().len(), 2);
//! ```

/// Task model and local store.
///
/// Pure functions over owned forests plus the synchronous store that applies
/// them and keeps a single rollback snapshot.
pub mod task;

/// Optimistic synchronization with an authoritative backend.
pub mod sync;

/// Configuration loading and discovery.
pub mod config;

/// Environment constants and path utilities.
pub mod env;

/// Command line interface.
pub mod cli;

pub use config::{ConfigDiscovery, SyncConfig, TaskboardConfig};
pub use sync::{BackendError, InMemoryBackend, SyncCoordinator, SyncError, TaskBackend};
pub use task::{Task, TaskFilter, TaskStore};
