use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a task as the store sees it (opaque string)
pub type TaskId = String;

/// Identifier used when a task refers to its parent.
///
/// The upstream service emits parent references as numbers while task ids
/// travel as strings, so the two are compared through [`matches_numeric_id`].
pub type ParentTaskId = i64;

/// A node in a forest of tasks. Children are owned by their parent.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub category: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<ParentTaskId>,
    pub display_order: i32,
    /// `None` means the children were never loaded, not that there are none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_tasks: Option<Vec<Task>>,
}

/// Compares a string task id against a numeric parent reference.
///
/// The number is rendered in decimal and compared for exact string equality,
/// so `"10"` matches `10` but `"010"` does not.
pub fn matches_numeric_id(id: &str, parent: ParentTaskId) -> bool {
    id == parent.to_string()
}

impl Task {
    /// Create a root task with both timestamps set to now
    pub fn new(id: impl Into<TaskId>, text: impl Into<String>, category: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
            category: category.into(),
            user_id: String::new(),
            widget_id: None,
            created_at: now,
            updated_at: now,
            priority: 0,
            due_date: None,
            description: None,
            parent_task_id: None,
            display_order: 0,
            sub_tasks: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
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

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    pub fn with_sub_tasks(mut self, sub_tasks: Vec<Task>) -> Self {
        self.sub_tasks = Some(sub_tasks);
        self
    }

    /// Children of this task, empty when none are loaded
    pub fn children(&self) -> &[Task] {
        self.sub_tasks.as_deref().unwrap_or(&[])
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent_task_id.is_none()
    }

    /// Whether `parent` names this task under the string coercion rule
    pub fn is_referenced_by(&self, parent: ParentTaskId) -> bool {
        matches_numeric_id(&self.id, parent)
    }

    /// Copy of this node without its children.
    ///
    /// A loaded child list becomes an empty loaded list, so the copy keeps the
    /// distinction between "no children" and "children not loaded".
    pub fn shallow_clone(&self) -> Task {
        Task {
            id: self.id.clone(),
            text: self.text.clone(),
            completed: self.completed,
            category: self.category.clone(),
            user_id: self.user_id.clone(),
            widget_id: self.widget_id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            priority: self.priority,
            due_date: self.due_date,
            description: self.description.clone(),
            parent_task_id: self.parent_task_id,
            display_order: self.display_order,
            sub_tasks: self.sub_tasks.as_ref().map(|_| Vec::new()),
        }
    }
}
