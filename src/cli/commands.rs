//! Command execution
//!
//! Every command produces its report as a string so the binary only has to
//! print it.

use super::args::{Commands, MutationTarget};
use super::forest::ForestFile;
use crate::config::ConfigDiscovery;
use crate::task::*;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use tracing::info;

pub fn execute(command: Commands) -> Result<String> {
    match command {
        Commands::Show { file, widget } => {
            let store = ForestFile::load_store(&file)?;
            let roots = store.get_hierarchy_for_widget(widget.as_deref());
            Ok(render_tree(&roots))
        }
        Commands::List {
            file,
            widget,
            category,
            completed,
            search,
        } => {
            let store = ForestFile::load_store(&file)?;
            let filter = TaskFilter {
                widget_id: widget,
                category,
                completed,
                search,
            };
            Ok(render_list(&store.get_filtered_tasks(&filter)))
        }
        Commands::Check { file } => {
            let forest = ForestFile::load(&file)?;
            let issues = validate_forest(&forest);
            if issues.is_empty() {
                Ok(format!("OK: {} tasks", count_tasks(&forest)))
            } else {
                Ok(issues.join("\n"))
            }
        }
        Commands::Toggle { target, id } => mutate(&target, |store| store.toggle_complete_local(&id)),
        Commands::Remove { target, id } => mutate(&target, |store| store.remove_task(&id)),
        Commands::Reorder {
            target,
            id,
            order,
            parent,
        } => mutate(&target, |store| store.reorder_task_local(&id, order, parent)),
        Commands::Upsert { target, task } => {
            let task = decode_task(&task).context("Invalid task JSON")?;
            mutate(&target, |store| store.upsert_task(task))
        }
        Commands::ShowConfig => Ok(discovery_report()),
    }
}

/// Load the target, apply one local mutation and optionally write it back
fn mutate<F>(target: &MutationTarget, apply: F) -> Result<String>
where
    F: FnOnce(&mut TaskStore),
{
    let mut store = ForestFile::load_store(&target.file)?;
    store.add_event_handler(Box::new(LoggingEventHandler));
    apply(&mut store);

    if target.write {
        ForestFile::save(&target.file, store.hierarchy())?;
        info!("Wrote {} tasks to {:?}", count_tasks(store.hierarchy()), target.file);
    }

    let roots: Vec<&Task> = store.hierarchy().iter().collect();
    Ok(render_tree(&roots))
}

fn task_line(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    format!(
        "[{}] {} {} ({}, order {})",
        mark, task.id, task.text, task.category, task.display_order
    )
}

/// Indented tree, two spaces per level
pub fn render_tree(roots: &[&Task]) -> String {
    fn walk(task: &Task, depth: usize, out: &mut String) {
        let _ = writeln!(out, "{}{}", "  ".repeat(depth), task_line(task));
        for child in task.children() {
            walk(child, depth + 1, out);
        }
    }

    let mut out = String::new();
    for root in roots {
        walk(root, 0, &mut out);
    }
    out
}

pub fn render_list(tasks: &[&Task]) -> String {
    let mut out = String::new();
    for task in tasks {
        let _ = writeln!(out, "{}", task_line(task));
    }
    out
}

fn discovery_report() -> String {
    let mut out = String::from("Configuration Discovery Hierarchy:\n\n");
    for (i, candidate) in ConfigDiscovery::config_candidates().iter().enumerate() {
        let status = if candidate.is_file() { "EXISTS" } else { "NOT FOUND" };
        let _ = writeln!(out, "  {}. {:?} - {}", i + 1, candidate, status);
    }
    match ConfigDiscovery::find_config_file() {
        Some(found) => {
            let _ = writeln!(out, "\nActive configuration: {:?}", found);
        }
        None => out.push_str("\nActive configuration: Built-in defaults\n"),
    }
    out
}
