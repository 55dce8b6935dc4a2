//! Bounded, exportable log of firewall events.

use std::{
    collections::VecDeque,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveTime};

pub const EVENT_LOG_CAPACITY: usize = 5;
pub const LOG_EXPORT_FILE_NAME: &str = "firewall_logs.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    timestamp: String,
    message: String,
}

impl LogEntry {
    pub fn new(time: NaiveTime, message: impl Into<String>) -> Self {
        Self {
            timestamp: time.format("%H:%M:%S").to_string(),
            message: message.into(),
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp, self.message)
    }
}

/// Ring buffer holding the most recent [`EVENT_LOG_CAPACITY`] entries, oldest first.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(EVENT_LOG_CAPACITY),
        }
    }

    /// Appends an entry stamped with the local wall-clock time.
    pub fn append(&mut self, message: impl Into<String>) -> &LogEntry {
        self.append_at(Local::now().time(), message)
    }

    pub fn append_at(&mut self, time: NaiveTime, message: impl Into<String>) -> &LogEntry {
        self.entries.push_back(LogEntry::new(time, message));
        while self.entries.len() > EVENT_LOG_CAPACITY {
            self.entries.pop_front();
        }
        &self.entries[self.entries.len() - 1]
    }

    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn export_as_text(&self) -> String {
        self.iter()
            .map(LogEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Rendered log contents ready to be handed to the host for saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogExport {
    pub file_name: &'static str,
    pub contents: String,
}

impl LogExport {
    pub fn from_log(log: &EventLog) -> Self {
        Self {
            file_name: LOG_EXPORT_FILE_NAME,
            contents: log.export_as_text(),
        }
    }

    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name);
        fs::write(&path, &self.contents)?;
        Ok(path)
    }
}
