use crate::error::{Result, ScheduleError};
use crate::time_format::TimeFormat;
use chrono::NaiveTime;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Longest description accepted, counted in characters after trimming
pub const MAX_DESCRIPTION_LEN: usize = 200;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Task priority, ordered from least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn level(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Critical => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for Priority {
    type Error = ScheduleError;

    fn try_from(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ScheduleError::InvalidInput(
                "Priority cannot be empty".to_string(),
            ));
        }
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ScheduleError::InvalidInput(format!("Invalid priority: {trimmed}")))
    }
}

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Completed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Completed => "completed",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Status::Completed => "✓",
            Status::Pending => "○",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Process-unique task identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    fn next() -> Self {
        TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Validated task attributes, ready to become a [`Task`] or to update one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    description: String,
    start: NaiveTime,
    end: NaiveTime,
    priority: Priority,
}

impl TaskSpec {
    /// Build from typed values, trimming and checking the description and range
    pub fn new(
        description: &str,
        start: NaiveTime,
        end: NaiveTime,
        priority: Priority,
    ) -> Result<Self> {
        let description = validate_description(description)?;
        validate_range(start, end)?;
        Ok(TaskSpec {
            description,
            start,
            end,
            priority,
        })
    }

    /// Build from raw text, routing both times through `format`
    pub fn parse(
        description: &str,
        start: &str,
        end: &str,
        priority: &str,
        format: TimeFormat,
    ) -> Result<Self> {
        let description = validate_description(description)?;
        let start = format.parse(start)?;
        let end = format.parse(end)?;
        let priority = Priority::try_from(priority)?;
        TaskSpec::new(&description, start, end, priority)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }
}

/// A scheduled task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    description: String,
    #[serde(with = "hhmm")]
    start: NaiveTime,
    #[serde(with = "hhmm")]
    end: NaiveTime,
    priority: Priority,
    status: Status,
}

impl Task {
    /// Create a pending task with a fresh id
    pub fn new(spec: TaskSpec) -> Self {
        Task {
            id: TaskId::next(),
            description: spec.description,
            start: spec.start,
            end: spec.end,
            priority: spec.priority,
            status: Status::Pending,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// `HH:MM-HH:MM`
    pub fn interval(&self) -> String {
        format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }

    /// Case-insensitive match against a trimmed query
    pub fn matches_description(&self, query: &str) -> bool {
        self.description.to_lowercase() == query.trim().to_lowercase()
    }

    /// Re-check the stored invariants
    pub fn validate(&self) -> Result<()> {
        validate_description(&self.description)?;
        validate_range(self.start, self.end)
    }

    pub(crate) fn apply(&mut self, spec: TaskSpec) {
        self.description = spec.description;
        self.start = spec.start;
        self.end = spec.end;
        self.priority = spec.priority;
    }

    pub(crate) fn complete(&mut self) {
        self.status = Status::Completed;
    }

    /// A copy carrying `spec`'s attributes under this task's identity and status
    pub(crate) fn with_spec(&self, spec: TaskSpec) -> Task {
        let mut proposed = self.clone();
        proposed.apply(spec);
        proposed
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}: {} [{}] ({})",
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.description,
            self.priority,
            self.status
        )
    }
}

fn validate_description(description: &str) -> Result<String> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ScheduleError::InvalidInput(
            "Description cannot be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ScheduleError::InvalidInput(format!(
            "Description cannot exceed {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_range(start: NaiveTime, end: NaiveTime) -> Result<()> {
    if start >= end {
        return Err(ScheduleError::InvalidTimeRange { start, end });
    }
    Ok(())
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format("%H:%M"))
    }
}
