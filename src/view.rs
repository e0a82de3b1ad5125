use crate::models::Task;
use chrono::{Duration, NaiveTime};
use std::fmt;

/// Borrowed display wrapper that adds a reminder and/or notes to a task.
///
/// Holds no mutable access, so it cannot change what the schedule stores.
#[derive(Debug, Clone)]
pub struct TaskView<'a> {
    task: &'a Task,
    remind_minutes: Option<u32>,
    notes: Option<String>,
}

impl<'a> TaskView<'a> {
    pub fn new(task: &'a Task) -> Self {
        TaskView {
            task,
            remind_minutes: None,
            notes: None,
        }
    }

    pub fn with_reminder(mut self, minutes_before: u32) -> Self {
        self.remind_minutes = Some(minutes_before);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Start time minus the reminder offset, wrapping past midnight
    pub fn reminder_time(&self) -> Option<NaiveTime> {
        self.remind_minutes.map(|minutes| {
            let (time, _) = self
                .task
                .start()
                .overflowing_sub_signed(Duration::minutes(i64::from(minutes)));
            time
        })
    }
}

impl fmt::Display for TaskView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.task)?;
        if let (Some(minutes), Some(at)) = (self.remind_minutes, self.reminder_time()) {
            write!(f, " [Reminder: {minutes} min before at {}]", at.format("%H:%M"))?;
        }
        if let Some(notes) = &self.notes {
            write!(f, " [Notes: {notes}]")?;
        }
        Ok(())
    }
}
