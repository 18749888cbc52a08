//! Boundary shape of a task as it crosses the transport.
//!
//! Timestamps travel as ISO-8601 strings and are parsed before a task enters
//! the store. The task service emits them without an offset, which is read
//! as UTC.

use crate::task::types::*;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("Task {task_id}: invalid {field} timestamp '{value}'")]
    InvalidTimestamp {
        task_id: String,
        field: &'static str,
        value: String,
    },

    #[error("Malformed task JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A task in transport form
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireTask {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub category: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<ParentTaskId>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_tasks: Option<Vec<WireTask>>,
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an RFC 3339 timestamp, or an offset-less one taken as UTC
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn require_timestamp(task_id: &str, field: &'static str, value: &str) -> Result<DateTime<Utc>, WireError> {
    parse_timestamp(value).ok_or_else(|| WireError::InvalidTimestamp {
        task_id: task_id.to_string(),
        field,
        value: value.to_string(),
    })
}

impl TryFrom<WireTask> for Task {
    type Error = WireError;

    fn try_from(wire: WireTask) -> Result<Self, Self::Error> {
        let created_at = require_timestamp(&wire.id, "createdAt", &wire.created_at)?;
        let updated_at = require_timestamp(&wire.id, "updatedAt", &wire.updated_at)?;
        let due_date = wire
            .due_date
            .as_deref()
            .map(|value| require_timestamp(&wire.id, "dueDate", value))
            .transpose()?;
        let sub_tasks = wire
            .sub_tasks
            .map(|children| children.into_iter().map(Task::try_from).collect::<Result<Vec<_>, _>>())
            .transpose()?;

        Ok(Task {
            id: wire.id,
            text: wire.text,
            completed: wire.completed,
            category: wire.category,
            user_id: wire.user_id,
            widget_id: wire.widget_id,
            created_at,
            updated_at,
            priority: wire.priority,
            due_date,
            description: wire.description,
            parent_task_id: wire.parent_task_id,
            display_order: wire.display_order,
            sub_tasks,
        })
    }
}

impl From<&Task> for WireTask {
    fn from(task: &Task) -> Self {
        WireTask {
            id: task.id.clone(),
            text: task.text.clone(),
            completed: task.completed,
            category: task.category.clone(),
            user_id: task.user_id.clone(),
            widget_id: task.widget_id.clone(),
            created_at: format_timestamp(&task.created_at),
            updated_at: format_timestamp(&task.updated_at),
            priority: task.priority,
            due_date: task.due_date.as_ref().map(format_timestamp),
            description: task.description.clone(),
            parent_task_id: task.parent_task_id,
            display_order: task.display_order,
            sub_tasks: task
                .sub_tasks
                .as_ref()
                .map(|children| children.iter().map(WireTask::from).collect()),
        }
    }
}

/// Decode a JSON array of wire tasks into a forest
pub fn decode_forest(json: &str) -> Result<Vec<Task>, WireError> {
    let wire: Vec<WireTask> = serde_json::from_str(json)?;
    wire.into_iter().map(Task::try_from).collect()
}

/// Decode a single wire task, with any nested children
pub fn decode_task(json: &str) -> Result<Task, WireError> {
    let wire: WireTask = serde_json::from_str(json)?;
    Task::try_from(wire)
}

/// Encode a forest as pretty-printed JSON in wire form
pub fn encode_forest(forest: &[Task]) -> Result<String, WireError> {
    let wire: Vec<WireTask> = forest.iter().map(WireTask::from).collect();
    Ok(serde_json::to_string_pretty(&wire)?)
}
