use crate::cli::{Commands, SessionLine, split_line};
use crate::config::Config;
use crate::core::Schedule;
use crate::error::{Result, ScheduleError};
use crate::events::{ActivityLog, ConsoleNotifier};
use crate::models::{Priority, Task, TaskSpec};
use crate::policy::SortPolicy;
use crate::time_format::TimeFormat;
use crate::view::TaskView;
use clap::Parser;
use clap::error::ErrorKind;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

/// What the session loop should do after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// An interactive session over one schedule
pub struct Session {
    schedule: Schedule,
    time_format: TimeFormat,
}

impl Session {
    /// Build the schedule and subscribe the stock listeners `config` asks for
    pub fn new(config: &Config) -> Self {
        let mut schedule = Schedule::with_sort_policy(config.sort_policy);
        if !config.quiet {
            schedule.subscribe(Arc::new(ConsoleNotifier::stdout()));
        }
        if let Some(path) = &config.log_file {
            schedule.subscribe(Arc::new(ActivityLog::new(path)));
        }
        Session {
            schedule,
            time_format: config.time_format,
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Read lines from `input` until it ends or `exit` is given.
    /// `prompt` shows a banner and a `> ` prompt before each line.
    pub fn run<R: BufRead>(&mut self, input: R, prompt: bool) -> Result<()> {
        if prompt {
            println!("Day planner. Type `help` for commands.");
            print_prompt()?;
        }
        for line in input.lines() {
            let line = line?;
            match self.execute(&line) {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => {
                    tracing::debug!(line = line.as_str(), "command failed");
                    eprintln!("Error: {e}");
                }
            }
            if prompt {
                print_prompt()?;
            }
        }
        Ok(())
    }

    /// Run one line of input
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(Flow::Continue);
        }

        let words = split_line(trimmed)?;
        let command = match SessionLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::DisplayHelp
                        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) =>
            {
                print!("{}", e.render());
                return Ok(Flow::Continue);
            }
            Err(e) => {
                let rendered = e.render().to_string();
                let first = rendered.lines().next().unwrap_or_default();
                let message = first.strip_prefix("error: ").unwrap_or(first);
                return Err(ScheduleError::InvalidInput(message.to_string()));
            }
        };

        self.dispatch(command)
    }

    fn dispatch(&mut self, command: Commands) -> Result<Flow> {
        match command {
            Commands::Add {
                description,
                start,
                end,
                priority,
                format,
                remind,
                note,
            } => {
                self.handle_add(&description, &start, &end, &priority, format, remind, note)?
            }
            Commands::Remove { description } => {
                self.schedule.remove(&description)?;
            }
            Commands::Update {
                old,
                description,
                start,
                end,
                priority,
                format,
            } => {
                let format = format.unwrap_or(self.time_format);
                let spec = TaskSpec::parse(&description, &start, &end, &priority, format)?;
                self.schedule.update(&old, spec)?;
            }
            Commands::Complete { description } => {
                self.schedule.mark_completed(&description)?;
            }
            Commands::List { json } => self.handle_list(json)?,
            Commands::Priority { level } => self.handle_priority(&level)?,
            Commands::Sort { policy } => self.handle_sort(policy),
            Commands::Count => println!("Total tasks: {}", self.schedule.count()),
            Commands::Formats => {
                for format in TimeFormat::ALL {
                    println!("{:<9} {}", format.as_str(), format.description());
                }
            }
            Commands::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_add(
        &mut self,
        description: &str,
        start: &str,
        end: &str,
        priority: &str,
        format: Option<TimeFormat>,
        remind: Option<u32>,
        note: Option<String>,
    ) -> Result<()> {
        let format = format.unwrap_or(self.time_format);
        let spec = TaskSpec::parse(description, start, end, priority, format)?;
        let task = Task::new(spec);
        let id = task.id();
        self.schedule.add(task)?;

        if remind.is_none() && note.is_none() {
            return Ok(());
        }
        if let Some(task) = self.schedule.get(id) {
            let mut view = TaskView::new(task);
            if let Some(minutes) = remind {
                view = view.with_reminder(minutes);
            }
            if let Some(note) = note {
                view = view.with_notes(note);
            }
            println!("{view}");
        }
        Ok(())
    }

    fn handle_list(&self, json: bool) -> Result<()> {
        let tasks = self.schedule.list();
        if json {
            println!("{}", serde_json::to_string_pretty(&tasks)?);
            return Ok(());
        }

        println!("Tasks (sorted by {}):", self.schedule.sort_policy().name());
        if tasks.is_empty() {
            println!("No tasks scheduled for the day.");
        } else {
            print_numbered(&tasks);
        }
        Ok(())
    }

    fn handle_priority(&self, level: &str) -> Result<()> {
        let priority = Priority::try_from(level)?;
        let tasks = self.schedule.list_by_priority(priority);
        println!("{priority} priority tasks:");
        if tasks.is_empty() {
            println!("No tasks found for this priority.");
        } else {
            print_numbered(&tasks);
        }
        Ok(())
    }

    fn handle_sort(&mut self, policy: SortPolicy) {
        self.schedule.set_sort_policy(policy);
        println!("Sorting by {}", policy.name());
    }
}

fn print_numbered(tasks: &[Task]) {
    for (i, task) in tasks.iter().enumerate() {
        println!("{}. {} {task}", i + 1, task.status().icon());
    }
}

fn print_prompt() -> io::Result<()> {
    let mut out = io::stdout();
    write!(out, "> ")?;
    out.flush()
}
