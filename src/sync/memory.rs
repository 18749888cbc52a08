use crate::sync::backend::{BackendError, TaskBackend};
use crate::task::*;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Authoritative task service kept in process.
///
/// Records are stored flat with numeric ids and assembled into a hierarchy on
/// every fetch, the way the task service does it. Failures can be injected to
/// exercise the coordinator's error path.
pub struct InMemoryBackend {
    state: Mutex<BackendState>,
    user_id: String,
}

struct BackendState {
    records: Vec<Task>,
    next_id: ParentTaskId,
    fail_next: Option<BackendError>,
    offline: bool,
}

impl InMemoryBackend {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(BackendState {
                records: Vec::new(),
                next_id: 1,
                fail_next: None,
                offline: false,
            }),
            user_id: user_id.into(),
        }
    }

    /// Seed the backend with an existing forest. Nested tasks are stored flat
    /// and the id sequence continues after the largest numeric id seen.
    pub fn with_forest(user_id: impl Into<String>, forest: &[Task]) -> Self {
        let records: Vec<Task> = flatten(forest)
            .into_iter()
            .map(|task| {
                let mut record = task.shallow_clone();
                record.sub_tasks = None;
                record
            })
            .collect();
        let next_id = records
            .iter()
            .filter_map(|r| r.id.parse::<ParentTaskId>().ok())
            .max()
            .unwrap_or(0)
            .saturating_add(1);

        Self {
            state: Mutex::new(BackendState {
                records,
                next_id,
                fail_next: None,
                offline: false,
            }),
            user_id: user_id.into(),
        }
    }

    /// Make the next request fail with `error`
    pub async fn fail_next(&self, error: BackendError) {
        self.state.lock().await.fail_next = Some(error);
    }

    /// While offline every request fails with a network error
    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.offline = offline;
    }

    pub async fn record_count(&self) -> usize {
        self.state.lock().await.records.len()
    }
}

impl BackendState {
    fn check_available(&mut self) -> Result<(), BackendError> {
        if let Some(error) = self.fail_next.take() {
            return Err(error);
        }
        if self.offline {
            return Err(BackendError::Network("backend is offline".to_string()));
        }
        Ok(())
    }

    fn position(&self, id: ParentTaskId) -> Option<usize> {
        self.records.iter().position(|r| r.is_referenced_by(id))
    }

    fn record_id(record: &Task) -> Option<ParentTaskId> {
        record.id.parse().ok()
    }

    /// Walks up from `candidate` looking for `task_id`
    fn is_descendant_or_self(&self, task_id: ParentTaskId, candidate: ParentTaskId) -> bool {
        let mut current = Some(candidate);
        let mut visited = HashSet::new();
        while let Some(id) = current {
            if id == task_id {
                return true;
            }
            if !visited.insert(id) {
                return false;
            }
            current = self
                .position(id)
                .and_then(|index| self.records[index].parent_task_id);
        }
        false
    }

    fn descendants(&self, id: ParentTaskId) -> HashSet<ParentTaskId> {
        let mut found = HashSet::new();
        let mut frontier = vec![id];
        while let Some(parent) = frontier.pop() {
            for record in &self.records {
                if record.parent_task_id == Some(parent) {
                    if let Some(child) = Self::record_id(record) {
                        if found.insert(child) {
                            frontier.push(child);
                        }
                    }
                }
            }
        }
        found
    }

    fn shift_orders<F>(&mut self, parent: Option<ParentTaskId>, exclude: ParentTaskId, delta: i32, select: F)
    where
        F: Fn(i32) -> bool,
    {
        for record in &mut self.records {
            if record.parent_task_id == parent && !record.is_referenced_by(exclude) && select(record.display_order) {
                record.display_order = record.display_order.saturating_add(delta);
            }
        }
    }

    /// Close the gap at the old position and open one at the new position
    fn adjust_display_orders(
        &mut self,
        task_id: ParentTaskId,
        old_parent: Option<ParentTaskId>,
        new_parent: Option<ParentTaskId>,
        old_order: i32,
        new_order: i32,
    ) {
        if old_parent == new_parent {
            match old_order.cmp(&new_order) {
                Ordering::Less => {
                    self.shift_orders(old_parent, task_id, -1, |o| o > old_order && o <= new_order)
                }
                Ordering::Greater => {
                    self.shift_orders(old_parent, task_id, 1, |o| o >= new_order && o < old_order)
                }
                Ordering::Equal => {}
            }
        } else {
            self.shift_orders(old_parent, task_id, -1, |o| o > old_order);
            self.shift_orders(new_parent, task_id, 1, |o| o >= new_order);
        }
    }
}

/// Sibling order used by the task service
fn service_order(a: &Task, b: &Task) -> Ordering {
    a.display_order
        .cmp(&b.display_order)
        .then(a.completed.cmp(&b.completed))
        .then(b.priority.cmp(&a.priority))
        .then(a.due_date.cmp(&b.due_date))
        .then(b.created_at.cmp(&a.created_at))
}

/// Assemble flat records into a forest. A record whose parent is not part of
/// the set is left out.
fn assemble(records: &[&Task]) -> Vec<Task> {
    let present: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
    let mut children: HashMap<ParentTaskId, Vec<&Task>> = HashMap::new();
    let mut roots = Vec::new();

    for record in records {
        match record.parent_task_id {
            None => roots.push(*record),
            Some(parent) if present.contains(parent.to_string().as_str()) => {
                children.entry(parent).or_default().push(*record);
            }
            Some(parent) => debug!("Skipping task {} with missing parent {}", record.id, parent),
        }
    }

    roots.sort_by(|a, b| service_order(a, b));
    roots
        .into_iter()
        .map(|root| build_node(root, &children, &mut HashSet::new()))
        .collect()
}

fn build_node(
    record: &Task,
    children: &HashMap<ParentTaskId, Vec<&Task>>,
    visiting: &mut HashSet<String>,
) -> Task {
    let mut node = record.shallow_clone();
    let mut subs = Vec::new();
    visiting.insert(record.id.clone());
    if let Ok(id) = record.id.parse::<ParentTaskId>() {
        if let Some(kids) = children.get(&id) {
            let mut kids = kids.clone();
            kids.sort_by(|a, b| service_order(a, b));
            for kid in kids {
                if !visiting.contains(&kid.id) {
                    subs.push(build_node(kid, children, visiting));
                }
            }
        }
    }
    visiting.remove(&record.id);
    node.sub_tasks = Some(subs);
    node
}

#[async_trait::async_trait]
impl TaskBackend for InMemoryBackend {
    async fn fetch_hierarchy(&self, filter: Option<&TaskFilter>) -> Result<Vec<Task>, BackendError> {
        let mut state = self.state.lock().await;
        state.check_available()?;

        let widget = filter
            .and_then(|f| f.widget_id.as_deref())
            .filter(|w| !w.is_empty());
        let selected: Vec<&Task> = state
            .records
            .iter()
            .filter(|r| widget.is_none_or(|w| r.widget_id.as_deref() == Some(w)))
            .filter(|r| filter.and_then(|f| f.completed).is_none_or(|c| r.completed == c))
            .filter(|r| {
                filter
                    .and_then(|f| f.category.as_deref())
                    .filter(|c| !c.is_empty())
                    .is_none_or(|c| r.category == c)
            })
            .collect();

        Ok(assemble(&selected))
    }

    async fn fetch_categories(&self) -> Result<Vec<String>, BackendError> {
        let mut state = self.state.lock().await;
        state.check_available()?;

        let categories: BTreeSet<String> = state.records.iter().map(|r| r.category.clone()).collect();
        Ok(categories.into_iter().collect())
    }

    async fn create_task(&self, input: CreateTaskInput) -> Result<Task, BackendError> {
        let mut state = self.state.lock().await;
        state.check_available()?;

        let id = state.next_id;
        state.next_id = id
            .checked_add(1)
            .ok_or_else(|| BackendError::InvalidRequest("Task id sequence exhausted".to_string()))?;

        let mut task = input.into_task(id.to_string(), &self.user_id, Utc::now());
        // Order 0 means "append after the last sibling"
        if task.display_order == 0 {
            let max_order = state
                .records
                .iter()
                .filter(|r| r.parent_task_id == task.parent_task_id)
                .map(|r| r.display_order)
                .max()
                .unwrap_or(0);
            task.display_order = max_order.saturating_add(1);
        }

        info!("Created task {} with parent {:?}", task.id, task.parent_task_id);
        state.records.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, input: UpdateTaskInput) -> Result<Task, BackendError> {
        let mut state = self.state.lock().await;
        state.check_available()?;

        let index = state.position(input.id).ok_or(BackendError::NotFound(input.id))?;
        let updated = input.apply_to(&state.records[index], Utc::now());
        state.records[index] = updated.clone();
        Ok(updated)
    }

    async fn toggle_task_completion(&self, id: ParentTaskId) -> Result<Task, BackendError> {
        let mut state = self.state.lock().await;
        state.check_available()?;

        let index = state.position(id).ok_or(BackendError::NotFound(id))?;
        let record = &mut state.records[index];
        record.completed = !record.completed;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_task(&self, id: ParentTaskId) -> Result<bool, BackendError> {
        let mut state = self.state.lock().await;
        state.check_available()?;

        if state.position(id).is_none() {
            return Ok(false);
        }
        let mut doomed = state.descendants(id);
        doomed.insert(id);
        state
            .records
            .retain(|r| BackendState::record_id(r).is_none_or(|rid| !doomed.contains(&rid)));

        info!("Deleted task {} ({} records)", id, doomed.len());
        Ok(true)
    }

    async fn reorder_task(&self, input: ReorderTaskInput) -> Result<bool, BackendError> {
        let mut state = self.state.lock().await;
        state.check_available()?;

        let Some(index) = state.position(input.task_id) else {
            return Ok(false);
        };

        if let Some(parent) = input.new_parent_task_id {
            if state.position(parent).is_none() {
                return Err(BackendError::InvalidRequest(format!(
                    "Parent task {} not found or not accessible",
                    parent
                )));
            }
            if state.is_descendant_or_self(input.task_id, parent) {
                return Err(BackendError::InvalidRequest(
                    "Cannot move task to its own descendant".to_string(),
                ));
            }
        }

        let old_parent = state.records[index].parent_task_id;
        let old_order = state.records[index].display_order;
        {
            let record = &mut state.records[index];
            record.parent_task_id = input.new_parent_task_id;
            record.display_order = input.new_display_order;
            record.updated_at = Utc::now();
        }
        state.adjust_display_orders(
            input.task_id,
            old_parent,
            input.new_parent_task_id,
            old_order,
            input.new_display_order,
        );

        info!(
            "Reordered task {} to order {} under parent {:?}",
            input.task_id, input.new_display_order, input.new_parent_task_id
        );
        Ok(true)
    }
}
