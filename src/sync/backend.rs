use crate::task::{CreateTaskInput, ParentTaskId, ReorderTaskInput, Task, TaskFilter, UpdateTaskInput};
use thiserror::Error;

/// Errors reported by a task backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Task {0} not found")]
    NotFound(ParentTaskId),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Backend error: {0}")]
    Other(String),
}

/// Authoritative task service the coordinator talks to.
///
/// Implementations own the transport. Task ids are numeric on this side of
/// the boundary; the hierarchy comes back already converted to store tasks.
#[async_trait::async_trait]
pub trait TaskBackend: Send + Sync {
    async fn fetch_hierarchy(&self, filter: Option<&TaskFilter>) -> Result<Vec<Task>, BackendError>;

    async fn fetch_categories(&self) -> Result<Vec<String>, BackendError>;

    async fn create_task(&self, input: CreateTaskInput) -> Result<Task, BackendError>;

    async fn update_task(&self, input: UpdateTaskInput) -> Result<Task, BackendError>;

    async fn toggle_task_completion(&self, id: ParentTaskId) -> Result<Task, BackendError>;

    /// `Ok(false)` when there was nothing to delete
    async fn delete_task(&self, id: ParentTaskId) -> Result<bool, BackendError>;

    /// `Ok(false)` when the task does not exist
    async fn reorder_task(&self, input: ReorderTaskInput) -> Result<bool, BackendError>;
}
