use chrono::NaiveTime;
use std::fmt;
use thiserror::Error;

/// All possible errors in the scheduler
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid time format: '{input}'. Expected format: {expected}")]
    InvalidTimeFormat {
        input: String,
        expected: &'static str,
    },

    #[error("Start time {start} must be before end time {end}", start = start.format("%H:%M"), end = end.format("%H:%M"))]
    InvalidTimeRange { start: NaiveTime, end: NaiveTime },

    #[error("Task {task} conflicts with existing task {existing}")]
    Conflict {
        task: ConflictSummary,
        existing: ConflictSummary,
    },

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Summary of one side of a conflict for error messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictSummary {
    pub description: String,
    pub interval: String,
}

impl fmt::Display for ConflictSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' ({})", self.description, self.interval)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ScheduleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_format_message_embeds_input() {
        let err = ScheduleError::InvalidTimeFormat {
            input: "9:00".to_string(),
            expected: "HHMM",
        };
        assert_eq!(
            err.to_string(),
            "Invalid time format: '9:00'. Expected format: HHMM"
        );
    }

    #[test]
    fn test_range_message_uses_clock_notation() {
        let err = ScheduleError::InvalidTimeRange {
            start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Start time 10:00 must be before end time 09:30"
        );
    }

    #[test]
    fn test_conflict_message_names_both_tasks() {
        let err = ScheduleError::Conflict {
            task: ConflictSummary {
                description: "Lunch".to_string(),
                interval: "12:00-13:00".to_string(),
            },
            existing: ConflictSummary {
                description: "Spacewalk".to_string(),
                interval: "11:00-12:00".to_string(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("'Lunch' (12:00-13:00)"));
        assert!(msg.contains("'Spacewalk' (11:00-12:00)"));
    }
}
