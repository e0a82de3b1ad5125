use crate::error::{Result, ScheduleError};
use crate::policy::SortPolicy;
use crate::time_format::TimeFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dayplan")]
#[command(about = "Single-day task scheduler with conflict detection")]
#[command(version)]
pub struct Cli {
    /// Notation used for time arguments
    #[arg(long, value_enum, env = "DAYPLAN_TIME_FORMAT", default_value_t = TimeFormat::TwentyFourHour)]
    pub time_format: TimeFormat,

    /// Initial ordering for `list`
    #[arg(long, value_enum, env = "DAYPLAN_SORT", default_value_t = SortPolicy::StartTime)]
    pub sort: SortPolicy,

    /// Activity log file
    #[arg(long, env = "DAYPLAN_LOG_FILE", default_value = "logs/application.log")]
    pub log_file: PathBuf,

    /// Do not write the activity log
    #[arg(long)]
    pub no_log_file: bool,

    /// Suppress add/remove/update confirmations
    #[arg(long, short)]
    pub quiet: bool,

    /// Read commands from this file instead of stdin
    #[arg(long)]
    pub script: Option<PathBuf>,
}

/// One line of session input
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task description
        #[arg(allow_hyphen_values = true)]
        description: String,
        /// Start time
        start: String,
        /// End time
        end: String,
        /// Low, Medium, High or Critical
        priority: String,
        /// Time notation for this command
        #[arg(long, value_enum)]
        format: Option<TimeFormat>,
        /// Show a reminder this many minutes before the start
        #[arg(long)]
        remind: Option<u32>,
        /// Attach a note to the confirmation
        #[arg(long)]
        note: Option<String>,
    },

    /// Remove a task by description
    Remove {
        /// Task description
        #[arg(allow_hyphen_values = true)]
        description: String,
    },

    /// Replace a task's description, times and priority
    Update {
        /// Current description
        #[arg(allow_hyphen_values = true)]
        old: String,
        /// New description
        #[arg(allow_hyphen_values = true)]
        description: String,
        /// New start time
        start: String,
        /// New end time
        end: String,
        /// New priority
        priority: String,
        /// Time notation for this command
        #[arg(long, value_enum)]
        format: Option<TimeFormat>,
    },

    /// Mark a task as completed
    Complete {
        /// Task description
        #[arg(allow_hyphen_values = true)]
        description: String,
    },

    /// List all tasks using the active sort
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List tasks with one priority
    Priority {
        /// Low, Medium, High or Critical
        level: String,
    },

    /// Change the sort used by `list`
    Sort {
        #[arg(value_enum)]
        policy: SortPolicy,
    },

    /// Show the number of tasks
    Count,

    /// Show accepted time notations
    Formats,

    /// End the session
    #[command(alias = "quit")]
    Exit,
}

/// Split a line into words. A single or double quote at the start of a
/// word groups everything up to the matching quote; elsewhere it is literal.
pub fn split_line(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if !in_word && (c == '"' || c == '\'') => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ScheduleError::InvalidInput(
            "Unterminated quote".to_string(),
        ));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_line_quotes() {
        assert_eq!(
            split_line(r#"add "Morning exercise" 07:00 08:00 high"#).unwrap(),
            vec!["add", "Morning exercise", "07:00", "08:00", "high"]
        );
        assert_eq!(
            split_line("add 'Lunch' 12:00 13:00 low --note \"bring tray\"").unwrap(),
            vec!["add", "Lunch", "12:00", "13:00", "low", "--note", "bring tray"]
        );
        assert_eq!(
            split_line("update '' x").unwrap(),
            vec!["update", "", "x"]
        );
        assert!(split_line("   ").unwrap().is_empty());
        assert!(split_line("remove \"Lunch").is_err());
    }

    #[test]
    fn test_split_line_inner_apostrophe_is_literal() {
        assert_eq!(
            split_line("add Bob's 09:00 10:00 low").unwrap(),
            vec!["add", "Bob's", "09:00", "10:00", "low"]
        );
        assert_eq!(
            split_line(r#"remove "Bob's lunch""#).unwrap(),
            vec!["remove", "Bob's lunch"]
        );
    }

    #[test]
    fn test_session_line_parses_standard_time() {
        let words = split_line(r#"add Nap "2:00 PM" "2:30 PM" low --format standard"#).unwrap();
        let line = SessionLine::try_parse_from(words).unwrap();
        assert_eq!(
            line.command,
            Commands::Add {
                description: "Nap".to_string(),
                start: "2:00 PM".to_string(),
                end: "2:30 PM".to_string(),
                priority: "low".to_string(),
                format: Some(TimeFormat::Standard),
                remind: None,
                note: None,
            }
        );
    }

    #[test]
    fn test_session_line_sort_and_quit() {
        let line = SessionLine::try_parse_from(["sort", "priority"]).unwrap();
        assert_eq!(
            line.command,
            Commands::Sort {
                policy: SortPolicy::Priority
            }
        );
        let line = SessionLine::try_parse_from(["quit"]).unwrap();
        assert_eq!(line.command, Commands::Exit);
        assert!(SessionLine::try_parse_from(["sort", "alphabetical"]).is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["dayplan", "--no-log-file"]).unwrap();
        assert_eq!(cli.time_format, TimeFormat::TwentyFourHour);
        assert_eq!(cli.sort, SortPolicy::StartTime);
        assert!(cli.no_log_file);
        assert!(cli.script.is_none());
    }
}
