//! Pure algorithms over an ordered forest of tasks.
//!
//! Every function borrows its input forest and returns a freshly built one;
//! nothing here mutates the caller's tree. Parent lookups walk the whole
//! forest, which is O(n) per call and fine at dashboard scale.

use crate::task::types::*;
use std::collections::HashSet;
use tracing::debug;

/// Pre-order traversal: each node comes before its children.
pub fn flatten(forest: &[Task]) -> Vec<&Task> {
    let mut out = Vec::with_capacity(forest.len());
    flatten_into(forest, &mut out);
    out
}

fn flatten_into<'a>(forest: &'a [Task], out: &mut Vec<&'a Task>) {
    for task in forest {
        out.push(task);
        flatten_into(task.children(), out);
    }
}

/// Number of nodes reachable from the roots
pub fn count_tasks(forest: &[Task]) -> usize {
    forest
        .iter()
        .map(|task| 1 + count_tasks(task.children()))
        .sum()
}

/// Find a task by id at any depth
pub fn find_task<'a>(forest: &'a [Task], id: &str) -> Option<&'a Task> {
    for task in forest {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_task(task.children(), id) {
            return Some(found);
        }
    }
    None
}

pub fn contains_task(forest: &[Task], id: &str) -> bool {
    find_task(forest, id).is_some()
}

/// Find the task a numeric parent reference points to
pub fn find_by_numeric_id(forest: &[Task], parent: ParentTaskId) -> Option<&Task> {
    flatten(forest)
        .into_iter()
        .find(|task| task.is_referenced_by(parent))
}

/// Replace every node matching `predicate` with `updater(node)`.
///
/// When the original node has children, the replacement's children are the
/// recursively updated original children, whatever the updater returned.
pub fn update_task_tree<P, U>(forest: &[Task], predicate: P, updater: U) -> Vec<Task>
where
    P: Fn(&Task) -> bool,
    U: Fn(&Task) -> Task,
{
    update_with(forest, &predicate, &updater)
}

fn update_with(
    forest: &[Task],
    predicate: &dyn Fn(&Task) -> bool,
    updater: &dyn Fn(&Task) -> Task,
) -> Vec<Task> {
    forest
        .iter()
        .map(|task| {
            let mut next = if predicate(task) {
                updater(task)
            } else {
                task.shallow_clone()
            };
            if task.has_children() {
                next.sub_tasks = Some(update_with(task.children(), predicate, updater));
            }
            next
        })
        .collect()
}

/// Remove the node with `id` together with its whole subtree
pub fn remove_from_tree(forest: &[Task], id: &str) -> Vec<Task> {
    forest
        .iter()
        .filter(|task| task.id != id)
        .map(|task| {
            let mut next = task.shallow_clone();
            if let Some(children) = &task.sub_tasks {
                next.sub_tasks = Some(remove_from_tree(children, id));
            }
            next
        })
        .collect()
}

/// Detach a node (with its own children) from wherever it lives.
///
/// Returns the forest without the node and the node itself. An unknown id
/// yields an unchanged copy of the forest and `None`.
pub fn extract_node(forest: &[Task], id: &str) -> (Vec<Task>, Option<Task>) {
    let mut found = None;
    let tree = extract_walk(forest, id, &mut found);
    if found.is_none() {
        debug!("extract_node: task {} not present", id);
    }
    (tree, found)
}

fn extract_walk(forest: &[Task], id: &str, found: &mut Option<Task>) -> Vec<Task> {
    let mut result = Vec::with_capacity(forest.len());
    for task in forest {
        if task.id == id {
            if found.is_none() {
                *found = Some(task.clone());
            }
            continue;
        }
        let mut next = task.shallow_clone();
        if let Some(children) = &task.sub_tasks {
            next.sub_tasks = Some(extract_walk(children, id, found));
        }
        result.push(next);
    }
    result
}

/// Append `node` to the root list, or to the children of the task that
/// `parent` refers to, then re-sort that sibling list. The node's own
/// subtree is sorted too.
///
/// If `parent` names no task the forest comes back unchanged; callers decide
/// whether to fall back to root placement.
pub fn insert_under_parent(
    forest: &[Task],
    parent: Option<ParentTaskId>,
    mut node: Task,
) -> Vec<Task> {
    node.sub_tasks = node
        .sub_tasks
        .map(|children| sort_tree_by_display_order(&children));
    match parent {
        None => {
            let mut roots = forest.to_vec();
            roots.push(node);
            sort_siblings(&mut roots);
            roots
        }
        Some(parent) => {
            let mut pending = Some(node);
            let tree = insert_walk(forest, parent, &mut pending);
            if pending.is_some() {
                debug!("insert_under_parent: parent {} not present", parent);
            }
            tree
        }
    }
}

fn insert_walk(forest: &[Task], parent: ParentTaskId, pending: &mut Option<Task>) -> Vec<Task> {
    let mut result = Vec::with_capacity(forest.len());
    for task in forest {
        let mut next = task.shallow_clone();
        if pending.is_some() && task.is_referenced_by(parent) {
            let mut children = task.children().to_vec();
            children.extend(pending.take());
            sort_siblings(&mut children);
            next.sub_tasks = Some(children);
        } else if let Some(children) = &task.sub_tasks {
            next.sub_tasks = Some(insert_walk(children, parent, pending));
        }
        result.push(next);
    }
    result
}

/// Drop every node whose id is in `seen` or repeats an earlier node, along
/// with its subtree. Kept ids are added to `seen`; dropped ids are returned.
pub fn prune_known_ids(forest: &[Task], seen: &mut HashSet<String>) -> (Vec<Task>, Vec<String>) {
    let mut dropped = Vec::new();
    let kept = prune_walk(forest, seen, &mut dropped);
    (kept, dropped)
}

fn prune_walk(forest: &[Task], seen: &mut HashSet<String>, dropped: &mut Vec<String>) -> Vec<Task> {
    let mut result = Vec::with_capacity(forest.len());
    for task in forest {
        if !seen.insert(task.id.clone()) {
            dropped.push(task.id.clone());
            continue;
        }
        let mut next = task.shallow_clone();
        if let Some(children) = &task.sub_tasks {
            next.sub_tasks = Some(prune_walk(children, seen, dropped));
        }
        result.push(next);
    }
    result
}

/// Sort every sibling list, at every level, by ascending display order.
/// Ties keep their relative order.
pub fn sort_tree_by_display_order(forest: &[Task]) -> Vec<Task> {
    let mut sorted: Vec<Task> = forest
        .iter()
        .map(|task| {
            let mut next = task.shallow_clone();
            if let Some(children) = &task.sub_tasks {
                next.sub_tasks = Some(sort_tree_by_display_order(children));
            }
            next
        })
        .collect();
    sort_siblings(&mut sorted);
    sorted
}

fn sort_siblings(siblings: &mut [Task]) {
    siblings.sort_by_key(|task| task.display_order);
}

/// Check the forest for structural problems.
///
/// Reports duplicate ids, sibling lists out of display order, children whose
/// parent reference names a different task than the one they sit under, and
/// roots whose parent reference resolves to a task outside their own subtree.
/// Returns an empty list for a healthy forest.
pub fn validate_forest(forest: &[Task]) -> Vec<String> {
    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    for task in flatten(forest) {
        if !seen.insert(task.id.as_str()) {
            issues.push(format!("Task {} occurs more than once", task.id));
        }
    }

    check_order(forest, "root list", &mut issues);

    for root in forest {
        if let Some(parent) = root.parent_task_id {
            let resolves = find_by_numeric_id(forest, parent).is_some();
            let inside_own_subtree = find_by_numeric_id(root.children(), parent).is_some();
            if resolves && !inside_own_subtree {
                issues.push(format!(
                    "Task {} sits at the root but its parent {} exists",
                    root.id, parent
                ));
            }
        }
        check_children(root, &mut issues);
    }

    issues
}

fn check_children(task: &Task, issues: &mut Vec<String>) {
    check_order(task.children(), &format!("children of {}", task.id), issues);
    for child in task.children() {
        match child.parent_task_id {
            Some(parent) if task.is_referenced_by(parent) => {}
            other => issues.push(format!(
                "Task {} is nested under {} but references parent {:?}",
                child.id, task.id, other
            )),
        }
        check_children(child, issues);
    }
}

fn check_order(siblings: &[Task], label: &str, issues: &mut Vec<String>) {
    if siblings
        .windows(2)
        .any(|pair| pair[0].display_order > pair[1].display_order)
    {
        issues.push(format!("Display order is not ascending in {}", label));
    }
}
