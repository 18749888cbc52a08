use crate::task::types::Task;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Predicates applied to the flattened task list.
///
/// Each field narrows the result only when it is set. `category` and `search`
/// are also ignored when empty, while an empty `widget_id` still has to match
/// exactly.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn widget(mut self, widget_id: impl Into<String>) -> Self {
        self.widget_id = Some(widget_id.into());
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

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Apply the filter to `tasks` and order the survivors by `updated_at`,
    /// newest first. Ties keep their incoming order.
    pub fn apply<'a>(&self, tasks: Vec<&'a Task>) -> Vec<&'a Task> {
        let matcher = self
            .search
            .as_deref()
            .filter(|search| !search.is_empty())
            .map(SearchMatcher::new);

        let mut items: Vec<&Task> = tasks
            .into_iter()
            .filter(|task| self.matches_fields(task))
            .filter(|task| matcher.as_ref().is_none_or(|m| m.matches(task)))
            .collect();

        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        items
    }

    fn matches_fields(&self, task: &Task) -> bool {
        if let Some(widget_id) = &self.widget_id {
            if task.widget_id.as_deref() != Some(widget_id.as_str()) {
                return false;
            }
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if task.category != category {
                return false;
            }
        }
        if let Some(completed) = self.completed {
            if task.completed != completed {
                return false;
            }
        }
        true
    }
}

/// Case-insensitive literal search over text, category and description
enum SearchMatcher {
    Pattern(Regex),
    Lowercase(String),
}

impl SearchMatcher {
    fn new(search: &str) -> Self {
        match RegexBuilder::new(&regex::escape(search))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => SearchMatcher::Pattern(pattern),
            Err(e) => {
                warn!("Search pattern rejected ({}), using plain substring match", e);
                SearchMatcher::Lowercase(search.to_lowercase())
            }
        }
    }

    fn matches(&self, task: &Task) -> bool {
        let hit = |field: &str| match self {
            SearchMatcher::Pattern(pattern) => pattern.is_match(field),
            SearchMatcher::Lowercase(needle) => field.to_lowercase().contains(needle.as_str()),
        };
        hit(&task.text) || hit(&task.category) || task.description.as_deref().is_some_and(hit)
    }
}
