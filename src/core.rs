use crate::error::{ConflictSummary, Result, ScheduleError};
use crate::events::{Event, EventBus, Listener};
use crate::models::{Priority, Task, TaskId, TaskSpec};
use crate::policy::{self, SortPolicy};
use std::sync::Arc;

/// The day's task registry.
///
/// Owns every stored task and guarantees that no two of them conflict.
/// All mutations go through here so that listeners see each change.
#[derive(Default)]
pub struct Schedule {
    tasks: Vec<Task>,
    sort_policy: SortPolicy,
    bus: EventBus,
}

impl Schedule {
    /// Create an empty schedule sorted by start time
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty schedule with `sort_policy` active
    pub fn with_sort_policy(sort_policy: SortPolicy) -> Self {
        Schedule {
            sort_policy,
            ..Self::default()
        }
    }

    /// Subscribe a listener. Subscribing the same instance twice has no effect.
    pub fn subscribe(&mut self, listener: Arc<dyn Listener>) {
        if !self.bus.subscribe(listener) {
            tracing::debug!("listener already subscribed");
        }
    }

    // ==================== Mutations ====================

    /// Store a new task.
    ///
    /// On overlap a conflict event naming the first colliding task is
    /// published before the error is returned.
    pub fn add(&mut self, task: Task) -> Result<TaskId> {
        task.validate()?;

        if let Some(existing) = policy::find_conflict(&self.tasks, &task, None) {
            tracing::warn!(
                task = task.description(),
                existing = existing.description(),
                "rejected add: interval conflict"
            );
            self.bus.publish(&Event::Conflict {
                new: &task,
                existing,
            });
            return Err(conflict_error(&task, existing));
        }

        let id = task.id();
        self.tasks.push(task);
        let stored = &self.tasks[self.tasks.len() - 1];
        tracing::info!(id = %id, "Task added: {}", stored.description());
        self.bus.publish(&Event::Added(stored));
        Ok(id)
    }

    /// Remove the first task whose description matches (case-insensitive, trimmed)
    pub fn remove(&mut self, description: &str) -> Result<Task> {
        let index = self.position(description)?;
        let removed = self.tasks.remove(index);
        tracing::info!(id = %removed.id(), "Task removed: {}", removed.description());
        self.bus.publish(&Event::Removed(&removed));
        Ok(removed)
    }

    /// Replace the description, times and priority of the task matching
    /// `old_description`. Identity and status are preserved.
    pub fn update(&mut self, old_description: &str, spec: TaskSpec) -> Result<Task> {
        let index = self.position(old_description)?;
        let proposed = self.tasks[index].with_spec(spec.clone());

        if let Some(existing) =
            policy::find_conflict(&self.tasks, &proposed, Some(proposed.id()))
        {
            tracing::warn!(
                task = old_description,
                existing = existing.description(),
                "rejected update: interval conflict"
            );
            self.bus.publish(&Event::Conflict {
                new: &proposed,
                existing,
            });
            return Err(conflict_error(&proposed, existing));
        }

        let task = &mut self.tasks[index];
        task.apply(spec);
        tracing::info!(id = %task.id(), "Task updated: {}", old_description.trim());
        let task = &self.tasks[index];
        self.bus.publish(&Event::Updated(task));
        Ok(task.clone())
    }

    /// Mark the matching task completed; only its status changes
    pub fn mark_completed(&mut self, description: &str) -> Result<Task> {
        let index = self.position(description)?;
        self.tasks[index].complete();
        let task = &self.tasks[index];
        tracing::info!(id = %task.id(), "Task marked as completed: {}", task.description());
        self.bus.publish(&Event::Updated(task));
        Ok(task.clone())
    }

    /// Replace the active sort policy; affects later `list` calls only
    pub fn set_sort_policy(&mut self, policy: SortPolicy) {
        tracing::debug!("Sort strategy changed to: {}", policy.name());
        self.sort_policy = policy;
    }

    // ==================== Reads ====================

    /// The active sort policy
    pub fn sort_policy(&self) -> SortPolicy {
        self.sort_policy
    }

    /// Snapshot of all tasks ordered by the active sort policy
    pub fn list(&self) -> Vec<Task> {
        self.sort_policy.sort(&self.tasks)
    }

    /// Tasks with exactly `priority`, in registry order
    pub fn list_by_priority(&self, priority: Priority) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| t.priority() == priority)
            .cloned()
            .collect()
    }

    /// Borrow the task with `id`
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    /// Borrow the first task whose description matches
    pub fn find(&self, description: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.matches_description(description))
    }

    /// Number of stored tasks
    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    // ==================== Helper Methods ====================

    fn position(&self, description: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.matches_description(description))
            .ok_or_else(|| ScheduleError::NotFound(description.trim().to_string()))
    }
}

fn conflict_error(task: &Task, existing: &Task) -> ScheduleError {
    ScheduleError::Conflict {
        task: summarize(task),
        existing: summarize(existing),
    }
}

fn summarize(task: &Task) -> ConflictSummary {
    ConflictSummary {
        description: task.description().to_string(),
        interval: task.interval(),
    }
}
