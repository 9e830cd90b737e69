use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// A single activity logged into a slot. `id` is only used to address the task when editing.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct Task {
    pub id: String,
    pub label: String,
}

impl Task {
    pub fn new(label: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: label.trim().to_string(),
        }
    }
}

/// Everything recorded for one half-hour slot.
///
/// A slot without tasks is expected to carry no flags. [EntryUpdate::apply] keeps that true for
/// edits made through this program, but files written by other tools are read as they are.
#[derive(PartialEq, Eq, Debug, Default, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub important: bool,
    #[serde(default)]
    pub urgent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
}

impl LogEntry {
    /// Whether anything was actually done during the slot.
    pub fn is_logged(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// True when the entry holds nothing worth keeping in a day file.
    pub fn is_blank(&self) -> bool {
        self.tasks.is_empty() && !self.important && !self.urgent && self.place.is_none()
    }

    pub fn with_tasks<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            tasks: labels.into_iter().map(Task::new).collect(),
            ..Default::default()
        }
    }

    pub fn with_flags(self, important: bool, urgent: bool) -> Self {
        Self {
            important,
            urgent,
            ..self
        }
    }
}

/// A day of the journal, keyed by slot label ("05:00", "05:30", ...).
pub type DailyLog = BTreeMap<String, LogEntry>;

/// Partial modification of a [LogEntry]. Fields left as `None` keep their current value.
#[derive(Debug, Default, Clone)]
pub struct EntryUpdate {
    pub tasks: Option<Vec<Task>>,
    pub important: Option<bool>,
    pub urgent: Option<bool>,
    /// `Some(None)` clears the place.
    pub place: Option<Option<String>>,
}

impl EntryUpdate {
    pub fn tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Some(tasks),
            ..Default::default()
        }
    }

    pub fn flags(important: Option<bool>, urgent: Option<bool>) -> Self {
        Self {
            important,
            urgent,
            ..Default::default()
        }
    }

    pub fn place(place: Option<String>) -> Self {
        Self {
            place: Some(place),
            ..Default::default()
        }
    }

    /// Merges the update into `entry`. A slot left without tasks loses both flags, and blank
    /// places are dropped.
    pub fn apply(self, entry: LogEntry) -> LogEntry {
        let mut next = LogEntry {
            tasks: self.tasks.unwrap_or(entry.tasks),
            important: self.important.unwrap_or(entry.important),
            urgent: self.urgent.unwrap_or(entry.urgent),
            place: self.place.unwrap_or(entry.place),
        };

        if next.tasks.is_empty() {
            next.important = false;
            next.urgent = false;
        }

        next.place = next
            .place
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        next
    }
}
