use crate::config::SyncConfig;
use crate::sync::backend::{BackendError, TaskBackend};
use crate::task::*;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Prefix of ids given to optimistically created tasks
pub const TEMP_ID_PREFIX: &str = "tmp-";

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Validation failed: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    #[error("Task id '{0}' has not been persisted yet")]
    InvalidId(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Drives the optimistic-first protocol between the store and a backend.
///
/// Each write applies the matching local mutation first, then awaits the
/// backend. On success the hierarchy is refetched (when configured) and
/// replaces local state wholesale; on failure the error is recorded and the
/// forest as it was right before this call's own mutation is restored (when
/// configured). The store lock is never held across a backend call, so
/// several writes may be in flight and the last refetch to land wins.
pub struct SyncCoordinator {
    store: Arc<RwLock<TaskStore>>,
    backend: Arc<dyn TaskBackend>,
    config: SyncConfig,
    filter: Option<TaskFilter>,
    user_id: String,
}

impl SyncCoordinator {
    pub fn new(store: Arc<RwLock<TaskStore>>, backend: Arc<dyn TaskBackend>, config: SyncConfig) -> Self {
        Self {
            store,
            backend,
            config,
            filter: None,
            user_id: String::new(),
        }
    }

    /// Filter sent with every hierarchy fetch
    pub fn with_filter(mut self, filter: TaskFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Owner stamped on optimistically created tasks
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn store(&self) -> Arc<RwLock<TaskStore>> {
        Arc::clone(&self.store)
    }

    /// Fetch hierarchy and categories and replace local state with them
    pub async fn refresh(&self) -> Result<(), SyncError> {
        self.store.write().await.set_loading(true);

        let result = async {
            let hierarchy = self.backend.fetch_hierarchy(self.filter.as_ref()).await?;
            let categories = self.backend.fetch_categories().await?;
            Ok::<_, BackendError>((hierarchy, categories))
        }
        .await;

        let mut store = self.store.write().await;
        store.set_loading(false);
        match result {
            Ok((hierarchy, categories)) => {
                info!("Fetched {} root tasks from backend", hierarchy.len());
                store.set_hierarchy(hierarchy);
                store.set_categories(categories);
                store.set_error(None);
                Ok(())
            }
            Err(e) => {
                warn!("Refreshing tasks failed: {}", e);
                store.set_error(Some(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Create a task. It appears locally under a temporary id right away and
    /// is replaced by the persisted version on the next refetch.
    pub async fn create_task(&self, input: CreateTaskInput) -> Result<Task, SyncError> {
        let now = Utc::now();
        validate_create(&input, now).map_err(SyncError::Validation)?;

        let temp_id = format!("{}{}", TEMP_ID_PREFIX, Uuid::new_v4());
        let optimistic = input.clone().into_task(temp_id.clone(), &self.user_id, now);
        let snapshot = self
            .apply_local(&temp_id, |store| store.upsert_task(optimistic))
            .await;

        let result = self.backend.create_task(input).await;
        self.settle(&temp_id, snapshot, result.map_err(SyncError::from)).await
    }

    /// Apply a partial update; the local task changes before the backend
    /// hears about it. Reparenting is left to [`Self::reorder_task`].
    pub async fn update_task(&self, input: UpdateTaskInput) -> Result<Task, SyncError> {
        let now = Utc::now();
        validate_update(&input, now).map_err(SyncError::Validation)?;

        let local_id = input.id.to_string();
        let snapshot = self
            .apply_local(&local_id, |store| {
                let updated = store.get_task_by_id(&local_id).map(|task| {
                    let mut next = input.apply_to(task, now);
                    next.parent_task_id = task.parent_task_id;
                    next
                });
                match updated {
                    Some(task) => store.upsert_task(task),
                    None => debug!("update_task: {} not in local store, sending anyway", local_id),
                }
            })
            .await;

        let result = self.backend.update_task(input).await;
        self.settle(&local_id, snapshot, result.map_err(SyncError::from)).await
    }

    pub async fn toggle_task(&self, id: &str) -> Result<Task, SyncError> {
        let snapshot = self
            .apply_local(id, |store| store.toggle_complete_local(id))
            .await;

        let result = match persisted_id(id) {
            Ok(numeric) => self
                .backend
                .toggle_task_completion(numeric)
                .await
                .map_err(SyncError::from),
            Err(e) => Err(e),
        };
        self.settle(id, snapshot, result).await
    }

    pub async fn delete_task(&self, id: &str) -> Result<bool, SyncError> {
        let snapshot = self.apply_local(id, |store| store.remove_task(id)).await;

        let result = match persisted_id(id) {
            Ok(numeric) => self.backend.delete_task(numeric).await.map_err(SyncError::from),
            Err(e) => Err(e),
        };
        self.settle(id, snapshot, result).await
    }

    pub async fn reorder_task(
        &self,
        task_id: &str,
        new_display_order: i32,
        new_parent_task_id: Option<ParentTaskId>,
    ) -> Result<bool, SyncError> {
        validate_reorder_destination(new_display_order, new_parent_task_id)
            .map_err(SyncError::Validation)?;

        let snapshot = self
            .apply_local(task_id, |store| {
                store.reorder_task_local(task_id, new_display_order, new_parent_task_id)
            })
            .await;

        let result = match persisted_id(task_id) {
            Ok(numeric) => {
                let input = ReorderTaskInput::new(numeric, new_display_order, new_parent_task_id);
                match validate_reorder(&input) {
                    Ok(()) => self.backend.reorder_task(input).await.map_err(SyncError::from),
                    Err(errors) => Err(SyncError::Validation(errors)),
                }
            }
            Err(e) => Err(e),
        };
        self.settle(task_id, snapshot, result).await
    }

    /// Run a local mutation under the write lock and return the forest it
    /// replaced, used as this call's restore point.
    async fn apply_local<F>(&self, mutation_id: &str, mutate: F) -> Vec<Task>
    where
        F: FnOnce(&mut TaskStore),
    {
        let mut store = self.store.write().await;
        let before = store.hierarchy().to_vec();
        mutate(&mut *store);
        store.set_pending_mutation(Some(mutation_id.to_string()));
        debug!("Applied optimistic mutation {}", mutation_id);
        before
    }

    async fn settle<T>(
        &self,
        mutation_id: &str,
        snapshot: Vec<Task>,
        result: Result<T, SyncError>,
    ) -> Result<T, SyncError> {
        match result {
            Ok(value) => {
                self.clear_pending(mutation_id).await;
                if self.config.refetch_after_mutation {
                    if let Err(e) = self.refresh().await {
                        warn!("Mutation {} succeeded but refetch failed: {}", mutation_id, e);
                    }
                }
                Ok(value)
            }
            Err(e) => {
                warn!("Mutation {} failed: {}", mutation_id, e);
                let mut store = self.store.write().await;
                store.set_error(Some(e.to_string()));
                if self.config.restore_snapshot_on_failure {
                    store.set_hierarchy(snapshot);
                }
                if store.pending_mutation_id() == Some(mutation_id) {
                    store.set_pending_mutation(None);
                }
                Err(e)
            }
        }
    }

    async fn clear_pending(&self, mutation_id: &str) {
        let mut store = self.store.write().await;
        if store.pending_mutation_id() == Some(mutation_id) {
            store.set_pending_mutation(None);
        }
    }
}

/// Numeric id the backend knows a task by. Only the canonical decimal form
/// counts, matching how parent references resolve in the store.
pub fn persisted_id(id: &str) -> Result<ParentTaskId, SyncError> {
    id.parse::<ParentTaskId>()
        .ok()
        .filter(|numeric| matches_numeric_id(id, *numeric))
        .ok_or_else(|| SyncError::InvalidId(id.to_string()))
}
