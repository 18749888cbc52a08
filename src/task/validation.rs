//! Input rules enforced by the task service.
//!
//! The coordinator checks them before touching local state so that an input
//! the server is certain to reject never shows up optimistically.

use crate::task::input::*;
use crate::task::types::ParentTaskId;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

pub const MAX_TEXT_LEN: usize = 500;
pub const MAX_CATEGORY_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MIN_PRIORITY: i32 = 0;
pub const MAX_PRIORITY: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} cannot exceed {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Priority must be between {min} and {max}, got {value}")]
    PriorityOutOfRange { value: i32, min: i32, max: i32 },

    #[error("Due date cannot be in the past")]
    DueDateInPast,

    #[error("{field} must be greater than 0")]
    NonPositiveId { field: &'static str },

    #[error("Display order must be non-negative")]
    NegativeDisplayOrder,
}

/// Join several validation errors into one message
pub fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn validate_create(input: &CreateTaskInput, now: DateTime<Utc>) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_text("Task text", &input.text, MAX_TEXT_LEN, &mut errors);
    check_text("Category", &input.category, MAX_CATEGORY_LEN, &mut errors);
    check_priority(input.priority, &mut errors);
    check_description(input.description.as_deref(), &mut errors);
    check_due_date(input.due_date, now, &mut errors);
    if let Some(parent) = input.parent_task_id {
        check_id("Parent task ID", parent, &mut errors);
    }
    if input.display_order < 0 {
        errors.push(ValidationError::NegativeDisplayOrder);
    }

    finish(errors)
}

pub fn validate_update(input: &UpdateTaskInput, now: DateTime<Utc>) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_id("Task ID", input.id, &mut errors);
    if let Some(text) = &input.text {
        check_text("Task text", text, MAX_TEXT_LEN, &mut errors);
    }
    if let Some(category) = &input.category {
        check_text("Category", category, MAX_CATEGORY_LEN, &mut errors);
    }
    if let Some(priority) = input.priority {
        check_priority(priority, &mut errors);
    }
    check_description(input.description.as_deref(), &mut errors);
    check_due_date(input.due_date, now, &mut errors);
    if let Some(parent) = input.parent_task_id {
        check_id("Parent task ID", parent, &mut errors);
    }
    if input.display_order.is_some_and(|order| order < 0) {
        errors.push(ValidationError::NegativeDisplayOrder);
    }

    finish(errors)
}

pub fn validate_reorder(input: &ReorderTaskInput) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_id("Task ID", input.task_id, &mut errors);
    check_destination(input.new_display_order, input.new_parent_task_id, &mut errors);

    finish(errors)
}

/// Checks the target position of a move without needing a persisted task id
pub fn validate_reorder_destination(
    new_display_order: i32,
    new_parent_task_id: Option<ParentTaskId>,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_destination(new_display_order, new_parent_task_id, &mut errors);
    finish(errors)
}

fn check_destination(order: i32, parent: Option<ParentTaskId>, errors: &mut Vec<ValidationError>) {
    if order < 0 {
        errors.push(ValidationError::NegativeDisplayOrder);
    }
    if let Some(parent) = parent {
        check_id("Parent task ID", parent, errors);
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_text(field: &'static str, value: &str, max: usize, errors: &mut Vec<ValidationError>) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Required { field });
    } else if value.chars().count() > max {
        errors.push(ValidationError::TooLong { field, max });
    }
}

fn check_priority(value: i32, errors: &mut Vec<ValidationError>) {
    if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&value) {
        errors.push(ValidationError::PriorityOutOfRange {
            value,
            min: MIN_PRIORITY,
            max: MAX_PRIORITY,
        });
    }
}

fn check_description(value: Option<&str>, errors: &mut Vec<ValidationError>) {
    if value.is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN) {
        errors.push(ValidationError::TooLong {
            field: "Description",
            max: MAX_DESCRIPTION_LEN,
        });
    }
}

// Due dates up to one minute old still pass.
fn check_due_date(value: Option<DateTime<Utc>>, now: DateTime<Utc>, errors: &mut Vec<ValidationError>) {
    if value.is_some_and(|due| due <= now - Duration::minutes(1)) {
        errors.push(ValidationError::DueDateInPast);
    }
}

fn check_id(field: &'static str, value: i64, errors: &mut Vec<ValidationError>) {
    if value <= 0 {
        errors.push(ValidationError::NonPositiveId { field });
    }
}
