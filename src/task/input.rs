use crate::task::types::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields supplied when a new task is created
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    pub text: String,
    pub category: String,
    #[serde(default)]
    pub widget_id: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_task_id: Option<ParentTaskId>,
    #[serde(default)]
    pub display_order: i32,
}

/// Partial update of a persisted task; only the fields that are set change
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskInput {
    pub id: ParentTaskId,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_task_id: Option<ParentTaskId>,
    #[serde(default)]
    pub display_order: Option<i32>,
}

/// Drag-and-drop move of a persisted task
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReorderTaskInput {
    pub task_id: ParentTaskId,
    pub new_display_order: i32,
    #[serde(default)]
    pub new_parent_task_id: Option<ParentTaskId>,
}

impl CreateTaskInput {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            widget_id: None,
            priority: 0,
            due_date: None,
            description: None,
            parent_task_id: None,
            display_order: 0,
        }
    }

    pub fn with_widget(mut self, widget_id: impl Into<String>) -> Self {
        self.widget_id = Some(widget_id.into());
        self
    }

    pub fn with_parent(mut self, parent_task_id: ParentTaskId) -> Self {
        self.parent_task_id = Some(parent_task_id);
        self
    }

    pub fn with_display_order(mut self, display_order: i32) -> Self {
        self.display_order = display_order;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build the task this input describes under the given id and owner
    pub fn into_task(self, id: TaskId, user_id: &str, now: DateTime<Utc>) -> Task {
        Task {
            id,
            text: self.text,
            completed: false,
            category: self.category,
            user_id: user_id.to_string(),
            widget_id: self.widget_id,
            created_at: now,
            updated_at: now,
            priority: self.priority,
            due_date: self.due_date,
            description: self.description,
            parent_task_id: self.parent_task_id,
            display_order: self.display_order,
            sub_tasks: None,
        }
    }
}

impl UpdateTaskInput {
    pub fn new(id: ParentTaskId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn display_order(mut self, display_order: i32) -> Self {
        self.display_order = Some(display_order);
        self
    }

    /// Copy of `task` with the set fields applied and `updated_at` bumped.
    /// Children are left out; callers that keep the node in a tree retain
    /// the existing ones.
    pub fn apply_to(&self, task: &Task, now: DateTime<Utc>) -> Task {
        let mut next = task.shallow_clone();
        if let Some(text) = &self.text {
            next.text = text.clone();
        }
        if let Some(completed) = self.completed {
            next.completed = completed;
        }
        if let Some(category) = &self.category {
            next.category = category.clone();
        }
        if let Some(priority) = self.priority {
            next.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            next.due_date = Some(due_date);
        }
        if let Some(description) = &self.description {
            next.description = Some(description.clone());
        }
        if let Some(parent) = self.parent_task_id {
            next.parent_task_id = Some(parent);
        }
        if let Some(display_order) = self.display_order {
            next.display_order = display_order;
        }
        next.updated_at = now;
        next
    }
}

impl ReorderTaskInput {
    pub fn new(task_id: ParentTaskId, new_display_order: i32, new_parent_task_id: Option<ParentTaskId>) -> Self {
        Self {
            task_id,
            new_display_order,
            new_parent_task_id,
        }
    }
}
