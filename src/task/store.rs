use crate::task::filter::TaskFilter;
use crate::task::tree;
use crate::task::types::*;
use anyhow::Result;
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

/// Local, synchronous state holder for the task hierarchy.
///
/// Every mutator runs to completion on `&mut self`, captures the forest it is
/// about to replace in the single rollback slot and notifies registered
/// handlers. Unknown ids are silent no-ops that leave all state untouched.
/// The store performs no I/O; pushing authoritative data in and restoring the
/// rollback snapshot are the caller's job.
pub struct TaskStore {
    categories: Vec<String>,
    hierarchy: Vec<Task>,
    loading: bool,
    error: Option<String>,
    last_error: Option<String>,
    pending_mutation_id: Option<String>,
    rollback_snapshot: Option<Vec<Task>>,
    event_handlers: Vec<Box<dyn StoreEventHandler + Send + Sync>>,
}

/// Changes reported to store event handlers
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    HierarchyReplaced {
        task_count: usize,
    },
    CategoriesReplaced {
        count: usize,
    },
    StatusChanged {
        loading: bool,
        error: Option<String>,
    },
    TaskInserted {
        task_id: TaskId,
        parent_task_id: Option<ParentTaskId>,
        placed_at_root: bool,
    },
    TaskUpdated {
        task_id: TaskId,
    },
    TaskRemoved {
        task_id: TaskId,
        removed_count: usize,
    },
    CompletionToggled {
        task_id: TaskId,
        completed: bool,
    },
    TaskReordered {
        task_id: TaskId,
        display_order: i32,
        parent_task_id: Option<ParentTaskId>,
        placed_at_root: bool,
    },
    StoreReset,
}

/// Handler for store events
pub trait StoreEventHandler {
    fn handle_event(&self, event: &StoreEvent) -> Result<()>;
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            hierarchy: Vec::new(),
            loading: false,
            error: None,
            last_error: None,
            pending_mutation_id: None,
            rollback_snapshot: None,
            event_handlers: Vec::new(),
        }
    }

    /// Create a store already holding `hierarchy`
    pub fn with_hierarchy(hierarchy: Vec<Task>) -> Self {
        Self {
            hierarchy,
            ..Self::new()
        }
    }

    // ------------------------------------------------------------------
    // State accessors
    // ------------------------------------------------------------------

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn hierarchy(&self) -> &[Task] {
        &self.hierarchy
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Most recent non-empty error, kept after `error` is cleared
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn pending_mutation_id(&self) -> Option<&str> {
        self.pending_mutation_id.as_deref()
    }

    /// Forest as it was right before the most recent mutation
    pub fn rollback_snapshot(&self) -> Option<&[Task]> {
        self.rollback_snapshot.as_deref()
    }

    // ------------------------------------------------------------------
    // Direct replacement
    // ------------------------------------------------------------------

    pub fn set_categories(&mut self, categories: Vec<String>) {
        let count = categories.len();
        self.categories = categories;
        self.emit_event(StoreEvent::CategoriesReplaced { count });
    }

    /// Replace the whole forest, typically with authoritative server data.
    /// The rollback slot is left alone.
    pub fn set_hierarchy(&mut self, hierarchy: Vec<Task>) {
        let task_count = tree::count_tasks(&hierarchy);
        self.hierarchy = hierarchy;
        info!("Hierarchy replaced ({} tasks)", task_count);
        self.emit_event(StoreEvent::HierarchyReplaced { task_count });
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.emit_status();
    }

    pub fn set_error(&mut self, error: Option<String>) {
        if let Some(message) = error.as_ref().filter(|m| !m.is_empty()) {
            self.last_error = Some(message.clone());
        }
        self.error = error;
        self.emit_status();
    }

    pub fn set_pending_mutation(&mut self, mutation_id: Option<String>) {
        self.pending_mutation_id = mutation_id;
    }

    /// Put the rollback snapshot back as the visible forest.
    ///
    /// Never called by the store itself. Returns `false` when the slot is
    /// empty.
    pub fn restore_rollback_snapshot(&mut self) -> bool {
        match self.rollback_snapshot.take() {
            Some(snapshot) => {
                warn!("Restoring rollback snapshot");
                self.set_hierarchy(snapshot);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Local mutators
    // ------------------------------------------------------------------

    /// Insert a new task or overwrite the data of an existing one.
    ///
    /// A new task goes under the task its `parent_task_id` resolves to, or to
    /// the root list when there is no parent or it cannot be found. An
    /// existing task keeps its position and its current children; if its
    /// display order changed the sibling lists are re-sorted. Nested tasks of
    /// a new task whose ids already exist in the forest are dropped with
    /// their subtrees.
    pub fn upsert_task(&mut self, task: Task) {
        let existing_order = tree::find_task(&self.hierarchy, &task.id).map(|t| t.display_order);

        match existing_order {
            Some(previous_order) => {
                let task_id = task.id.clone();
                let order_changed = previous_order != task.display_order;
                let incoming = task;
                let mut next = tree::update_task_tree(
                    &self.hierarchy,
                    |t| t.id == incoming.id,
                    |existing| {
                        let mut replacement = incoming.shallow_clone();
                        if !existing.has_children() {
                            replacement.sub_tasks = existing.sub_tasks.clone();
                        }
                        replacement
                    },
                );
                if order_changed {
                    next = tree::sort_tree_by_display_order(&next);
                }
                self.commit(next);
                debug!("Updated task {} in place", task_id);
                self.emit_event(StoreEvent::TaskUpdated { task_id });
            }
            None => {
                let mut task = task;
                let task_id = task.id.clone();
                if let Some(children) = task.sub_tasks.take() {
                    let mut seen: HashSet<String> =
                        tree::flatten(&self.hierarchy).into_iter().map(|t| t.id.clone()).collect();
                    seen.insert(task_id.clone());
                    let (kept, dropped) = tree::prune_known_ids(&children, &mut seen);
                    if !dropped.is_empty() {
                        warn!("New task {} carried known ids {:?}, dropping them", task_id, dropped);
                    }
                    task.sub_tasks = Some(kept);
                }
                let requested = task.parent_task_id;
                let placement =
                    requested.filter(|p| tree::find_by_numeric_id(&self.hierarchy, *p).is_some());
                if let (Some(parent), None) = (requested, placement) {
                    warn!("Parent {} of new task {} not found, inserting at root", parent, task_id);
                }
                let next = tree::insert_under_parent(&self.hierarchy, placement, task);
                self.commit(next);
                debug!("Inserted task {} under {:?}", task_id, placement);
                self.emit_event(StoreEvent::TaskInserted {
                    task_id,
                    parent_task_id: requested,
                    placed_at_root: placement.is_none(),
                });
            }
        }
    }

    /// Remove a task and its whole subtree
    pub fn remove_task(&mut self, id: &str) {
        let Some(removed_count) = tree::find_task(&self.hierarchy, id).map(|t| 1 + tree::count_tasks(t.children())) else {
            debug!("remove_task: {} not found, nothing to do", id);
            return;
        };

        let next = tree::remove_from_tree(&self.hierarchy, id);
        self.commit(next);
        debug!("Removed task {} ({} nodes)", id, removed_count);
        self.emit_event(StoreEvent::TaskRemoved {
            task_id: id.to_string(),
            removed_count,
        });
    }

    /// Flip the completion flag of a task
    pub fn toggle_complete_local(&mut self, id: &str) {
        let Some(completed) = tree::find_task(&self.hierarchy, id).map(|t| !t.completed) else {
            debug!("toggle_complete_local: {} not found, nothing to do", id);
            return;
        };

        let next = tree::update_task_tree(
            &self.hierarchy,
            |t| t.id == id,
            |t| {
                let mut toggled = t.shallow_clone();
                toggled.completed = !t.completed;
                toggled
            },
        );
        self.commit(next);
        self.emit_event(StoreEvent::CompletionToggled {
            task_id: id.to_string(),
            completed,
        });
    }

    /// Move a task to a new position, possibly under a new parent.
    ///
    /// The task is detached with its subtree, given the new display order and
    /// parent reference, and inserted under that parent. A parent that no
    /// longer exists once the task is detached (including one inside the
    /// task's own subtree) sends the task to the root list while the stored
    /// `parent_task_id` keeps the requested value.
    pub fn reorder_task_local(
        &mut self,
        task_id: &str,
        new_display_order: i32,
        new_parent_task_id: Option<ParentTaskId>,
    ) {
        let (without_node, node) = tree::extract_node(&self.hierarchy, task_id);
        let Some(mut node) = node else {
            debug!("reorder_task_local: {} not found, nothing to do", task_id);
            return;
        };

        node.parent_task_id = new_parent_task_id;
        node.display_order = new_display_order;

        let placement = new_parent_task_id
            .filter(|p| tree::find_by_numeric_id(&without_node, *p).is_some());
        if let (Some(parent), None) = (new_parent_task_id, placement) {
            warn!(
                "Parent {} for task {} not found after detaching it, placing at root",
                parent, task_id
            );
        }

        let inserted = tree::insert_under_parent(&without_node, placement, node);
        let sorted = tree::sort_tree_by_display_order(&inserted);
        self.commit(sorted);

        debug!(
            "Reordered task {} to order {} under {:?}",
            task_id, new_display_order, placement
        );
        self.emit_event(StoreEvent::TaskReordered {
            task_id: task_id.to_string(),
            display_order: new_display_order,
            parent_task_id: new_parent_task_id,
            placed_at_root: placement.is_none(),
        });
    }

    /// Back to the initial empty state. Event handlers stay registered.
    pub fn reset(&mut self) {
        self.categories.clear();
        self.hierarchy.clear();
        self.loading = false;
        self.error = None;
        self.last_error = None;
        self.pending_mutation_id = None;
        self.rollback_snapshot = None;
        self.emit_event(StoreEvent::StoreReset);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn get_task_by_id(&self, id: &str) -> Option<&Task> {
        self.get_flat_tasks().into_iter().find(|t| t.id == id)
    }

    pub fn get_flat_tasks(&self) -> Vec<&Task> {
        tree::flatten(&self.hierarchy)
    }

    /// Flattened tasks narrowed by `filter`, newest `updated_at` first
    pub fn get_filtered_tasks(&self, filter: &TaskFilter) -> Vec<&Task> {
        filter.apply(self.get_flat_tasks())
    }

    /// Root tasks belonging to `widget_id`; all roots when no widget is given.
    /// Children are never filtered on their own.
    pub fn get_hierarchy_for_widget(&self, widget_id: Option<&str>) -> Vec<&Task> {
        match widget_id.filter(|w| !w.is_empty()) {
            None => self.hierarchy.iter().collect(),
            Some(widget_id) => self
                .hierarchy
                .iter()
                .filter(|t| t.widget_id.as_deref() == Some(widget_id))
                .collect(),
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn add_event_handler(&mut self, handler: Box<dyn StoreEventHandler + Send + Sync>) {
        self.event_handlers.push(handler);
    }

    fn commit(&mut self, next: Vec<Task>) {
        let previous = std::mem::replace(&mut self.hierarchy, next);
        self.rollback_snapshot = Some(previous);
    }

    fn emit_status(&self) {
        self.emit_event(StoreEvent::StatusChanged {
            loading: self.loading,
            error: self.error.clone(),
        });
    }

    fn emit_event(&self, event: StoreEvent) {
        for handler in &self.event_handlers {
            if let Err(e) = handler.handle_event(&event) {
                error!("Store event handler error: {}", e);
            }
        }
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple event handler that logs events
pub struct LoggingEventHandler;

impl StoreEventHandler for LoggingEventHandler {
    fn handle_event(&self, event: &StoreEvent) -> Result<()> {
        match event {
            StoreEvent::HierarchyReplaced { task_count } => {
                debug!("Hierarchy replaced: {} tasks", task_count);
            }
            StoreEvent::CategoriesReplaced { count } => {
                debug!("Categories replaced: {}", count);
            }
            StoreEvent::StatusChanged { loading, error } => {
                if let Some(error) = error {
                    warn!("Task store error: {}", error);
                } else {
                    debug!("Task store loading: {}", loading);
                }
            }
            StoreEvent::TaskInserted {
                task_id,
                parent_task_id,
                placed_at_root,
            } => {
                info!(
                    "Task inserted: {} (parent: {:?}, at root: {})",
                    task_id, parent_task_id, placed_at_root
                );
            }
            StoreEvent::TaskUpdated { task_id } => {
                info!("Task updated: {}", task_id);
            }
            StoreEvent::TaskRemoved {
                task_id,
                removed_count,
            } => {
                info!("Task removed: {} ({} nodes)", task_id, removed_count);
            }
            StoreEvent::CompletionToggled { task_id, completed } => {
                info!("Task {} completed: {}", task_id, completed);
            }
            StoreEvent::TaskReordered {
                task_id,
                display_order,
                parent_task_id,
                placed_at_root,
            } => {
                info!(
                    "Task {} moved to order {} (parent: {:?}, at root: {})",
                    task_id, display_order, parent_task_id, placed_at_root
                );
            }
            StoreEvent::StoreReset => {
                debug!("Task store reset");
            }
        }
        Ok(())
    }
}
