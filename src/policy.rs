//! Pure conflict and ordering rules over task collections.

use crate::error::{Result, ScheduleError};
use crate::models::{Task, TaskId};
use chrono::NaiveTime;
use clap::ValueEnum;
use std::cmp::Reverse;
use std::fmt;

/// Whether two closed intervals `[s1, e1]` and `[s2, e2]` collide.
///
/// Sharing a single boundary instant counts as a collision, so back-to-back
/// tasks such as 09:00-10:00 and 10:00-11:00 conflict.
pub fn intervals_conflict(s1: NaiveTime, e1: NaiveTime, s2: NaiveTime, e2: NaiveTime) -> bool {
    !(e1 < s2 || s1 > e2)
}

/// Whether two tasks' intervals collide
pub fn conflicts(a: &Task, b: &Task) -> bool {
    intervals_conflict(a.start(), a.end(), b.start(), b.end())
}

/// First task in `tasks` (in order) that collides with `candidate`,
/// ignoring the task whose id is `exclude`
pub fn find_conflict<'a>(
    tasks: &'a [Task],
    candidate: &Task,
    exclude: Option<TaskId>,
) -> Option<&'a Task> {
    tasks
        .iter()
        .filter(|t| Some(t.id()) != exclude)
        .find(|t| conflicts(t, candidate))
}

/// Ordering applied to list output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortPolicy {
    /// Ascending start time, ties kept in registry order
    #[default]
    StartTime,
    /// Highest priority first, ties by ascending start time
    Priority,
}

impl SortPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            SortPolicy::StartTime => "Start Time",
            SortPolicy::Priority => "Priority (High to Low)",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortPolicy::StartTime => "start-time",
            SortPolicy::Priority => "priority",
        }
    }

    /// Return a newly ordered copy of `tasks`; the input is left untouched
    pub fn sort(&self, tasks: &[Task]) -> Vec<Task> {
        let mut sorted = tasks.to_vec();
        match self {
            SortPolicy::StartTime => sorted.sort_by_key(|t| t.start()),
            SortPolicy::Priority => sorted.sort_by_key(|t| (Reverse(t.priority()), t.start())),
        }
        sorted
    }
}

impl fmt::Display for SortPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for SortPolicy {
    type Error = ScheduleError;

    fn try_from(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start-time" | "start_time" | "start" | "time" => Ok(SortPolicy::StartTime),
            "priority" => Ok(SortPolicy::Priority),
            other => Err(ScheduleError::InvalidInput(format!(
                "Invalid sort policy: {other}"
            ))),
        }
    }
}
