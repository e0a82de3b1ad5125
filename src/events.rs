//! Lifecycle notifications and the stock listeners.

use crate::models::Task;
use anyhow::Context;
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Which lifecycle event occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Added,
    Removed,
    Updated,
    Conflict,
}

/// A lifecycle event emitted by the schedule
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    Added(&'a Task),
    Removed(&'a Task),
    Updated(&'a Task),
    /// A mutation was rejected because `new` collides with `existing`
    Conflict { new: &'a Task, existing: &'a Task },
}

impl Event<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Added(_) => EventKind::Added,
            Event::Removed(_) => EventKind::Removed,
            Event::Updated(_) => EventKind::Updated,
            Event::Conflict { .. } => EventKind::Conflict,
        }
    }

    /// One-line summary used by the console and the activity log
    pub fn message(&self) -> String {
        match self {
            Event::Added(task) => format!("Task added: {}", task.description()),
            Event::Removed(task) => format!("Task removed: {}", task.description()),
            Event::Updated(task) => format!("Task updated: {}", task.description()),
            Event::Conflict { new, existing } => format!(
                "CONFLICT DETECTED! Task '{}' ({}) conflicts with '{}' ({})",
                new.description(),
                new.interval(),
                existing.description(),
                existing.interval()
            ),
        }
    }
}

/// Receives lifecycle events. Errors are reported by the bus but never
/// undo the mutation that triggered the event.
pub trait Listener: Send + Sync {
    fn on_event(&self, event: &Event<'_>) -> anyhow::Result<()>;
}

/// Outcome of delivering one event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: usize,
    pub failed: usize,
}

/// Synchronous fan-out to subscribed listeners, in subscription order
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Arc<dyn Listener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`. Returns false if that same instance is already subscribed.
    pub fn subscribe(&mut self, listener: Arc<dyn Listener>) -> bool {
        let already = self
            .listeners
            .iter()
            .any(|l| std::ptr::addr_eq(Arc::as_ptr(l), Arc::as_ptr(&listener)));
        if already {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn publish(&self, event: &Event<'_>) -> Delivery {
        let mut delivery = Delivery::default();
        for listener in &self.listeners {
            match listener.on_event(event) {
                Ok(()) => delivery.delivered += 1,
                Err(e) => {
                    delivery.failed += 1;
                    tracing::error!(kind = ?event.kind(), "listener failed: {e:#}");
                }
            }
        }
        delivery
    }
}

/// Prints a confirmation or warning line for each event
pub struct ConsoleNotifier {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleNotifier {
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        ConsoleNotifier {
            out: Mutex::new(out),
        }
    }
}

impl Listener for ConsoleNotifier {
    fn on_event(&self, event: &Event<'_>) -> anyhow::Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow::anyhow!("console writer poisoned"))?;
        match event {
            Event::Conflict { .. } => writeln!(out, "⚠ {}", event.message())?,
            _ => writeln!(out, "✓ {} successfully", event.message())?,
        }
        out.flush()?;
        Ok(())
    }
}

/// Appends `[timestamp] [LEVEL] message` lines to a file
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ActivityLog {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Append one line at `level`
    pub fn record(&self, level: &str, message: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "[{timestamp}] [{level}] {message}")
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

impl Listener for ActivityLog {
    fn on_event(&self, event: &Event<'_>) -> anyhow::Result<()> {
        let level = match event.kind() {
            EventKind::Conflict => "WARN",
            _ => "INFO",
        };
        self.record(level, &event.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, TaskSpec};
    use chrono::NaiveTime;
    use tempfile::TempDir;

    fn task(desc: &str, start: u32, end: u32) -> Task {
        let s = NaiveTime::from_hms_opt(start, 0, 0).unwrap();
        let e = NaiveTime::from_hms_opt(end, 0, 0).unwrap();
        Task::new(TaskSpec::new(desc, s, e, Priority::Medium).unwrap())
    }

    struct Recorder {
        name: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl Listener for Recorder {
        fn on_event(&self, event: &Event<'_>) -> anyhow::Result<()> {
            self.seen
                .lock()
                .unwrap()
                .push(format!("{}:{:?}", self.name, event.kind()));
            Ok(())
        }
    }

    struct Failing;

    impl Listener for Failing {
        fn on_event(&self, _event: &Event<'_>) -> anyhow::Result<()> {
            anyhow::bail!("display unavailable")
        }
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_delivery_in_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(Arc::new(Recorder {
            name: "first",
            seen: seen.clone(),
        }));
        bus.subscribe(Arc::new(Recorder {
            name: "second",
            seen: seen.clone(),
        }));

        let t = task("EVA", 9, 10);
        let delivery = bus.publish(&Event::Added(&t));

        assert_eq!(
            delivery,
            Delivery {
                delivered: 2,
                failed: 0
            }
        );
        assert_eq!(*seen.lock().unwrap(), vec!["first:Added", "second:Added"]);
    }

    #[test]
    fn test_subscribe_is_idempotent() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let listener: Arc<dyn Listener> = Arc::new(Recorder {
            name: "only",
            seen: seen.clone(),
        });
        let mut bus = EventBus::new();
        assert!(bus.subscribe(listener.clone()));
        assert!(!bus.subscribe(listener));
        assert_eq!(bus.len(), 1);

        let t = task("EVA", 9, 10);
        bus.publish(&Event::Removed(&t));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_failing_listener_does_not_stop_others() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(Arc::new(Failing));
        bus.subscribe(Arc::new(Recorder {
            name: "after",
            seen: seen.clone(),
        }));

        let t = task("EVA", 9, 10);
        let delivery = bus.publish(&Event::Updated(&t));
        assert_eq!(
            delivery,
            Delivery {
                delivered: 1,
                failed: 1
            }
        );
        assert_eq!(*seen.lock().unwrap(), vec!["after:Updated"]);
    }

    #[test]
    fn test_console_notifier_lines() {
        let buf = SharedBuf::default();
        let console = ConsoleNotifier::new(Box::new(buf.clone()));
        let a = task("Lunch", 12, 13);
        let b = task("Meeting", 11, 12);

        console.on_event(&Event::Added(&a)).unwrap();
        console
            .on_event(&Event::Conflict {
                new: &b,
                existing: &a,
            })
            .unwrap();

        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("✓ Task added: Lunch successfully"));
        assert!(text.contains(
            "CONFLICT DETECTED! Task 'Meeting' (11:00-12:00) conflicts with 'Lunch' (12:00-13:00)"
        ));
    }

    #[test]
    fn test_activity_log_appends_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("application.log");
        let log = ActivityLog::new(&path);
        let a = task("Lunch", 12, 13);
        let b = task("Nap", 13, 14);

        log.on_event(&Event::Added(&a)).unwrap();
        log.on_event(&Event::Conflict {
            new: &b,
            existing: &a,
        })
        .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[INFO] Task added: Lunch"));
        assert!(lines[1].contains("[WARN] CONFLICT DETECTED!"));
        assert!(lines[0].starts_with('['));
    }

    #[test]
    fn test_activity_log_reports_unwritable_path() {
        let dir = TempDir::new().unwrap();
        // a directory cannot be opened for appending
        let log = ActivityLog::new(dir.path());
        let a = task("Lunch", 12, 13);
        assert!(log.on_event(&Event::Added(&a)).is_err());
    }
}
