//!  The journal is organized through [log_storage::LogStorageImpl] and edited through [Journal].
//!  The basic idea is:
//!   - There is a directory with one JSON file per journal day.
//!   - A journal day is a map from half-hour slot label to [entities::LogEntry].
//!   - Every edit loads the day, merges an [entities::EntryUpdate] into one slot and saves it back.

pub mod entities;
pub mod log_storage;
pub mod slots;

use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use tracing::{info, instrument};

use entities::{DailyLog, EntryUpdate, LogEntry, Task};
use log_storage::LogStorage;
use slots::TimeSlot;

/// Editing rules on top of a [LogStorage].
pub struct Journal<S: LogStorage> {
    storage: S,
}

impl<S: LogStorage> Journal<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn day(&self, date: NaiveDate) -> Result<DailyLog> {
        self.storage.get_log_for(date).await
    }

    pub async fn entry(&self, date: NaiveDate, slot: TimeSlot) -> Result<LogEntry> {
        Ok(self
            .day(date)
            .await?
            .remove(&slot.to_string())
            .unwrap_or_default())
    }

    /// Merges `update` into the slot and returns the resulting entry. Entries left blank are
    /// removed from the day.
    pub async fn update_entry(
        &self,
        date: NaiveDate,
        slot: TimeSlot,
        update: EntryUpdate,
    ) -> Result<LogEntry> {
        self.modify_entry(date, slot, |_| Ok(update)).await
    }

    /// Loads the day once, builds an update from the current entry and saves the day once.
    /// Nothing is written when `change` fails.
    #[instrument(skip(self, change))]
    async fn modify_entry(
        &self,
        date: NaiveDate,
        slot: TimeSlot,
        change: impl FnOnce(&LogEntry) -> Result<EntryUpdate>,
    ) -> Result<LogEntry> {
        let mut log = self.storage.get_log_for(date).await?;
        let key = slot.to_string();
        let existing = log.remove(&key).unwrap_or_default();
        let next = change(&existing)?.apply(existing);

        if !next.is_blank() {
            log.insert(key, next.clone());
        }
        self.storage.save_log_for(date, &log).await?;
        info!("Updated slot {slot} on {date}");
        Ok(next)
    }

    /// Appends tasks to the slot in the given order.
    pub async fn add_tasks(
        &self,
        date: NaiveDate,
        slot: TimeSlot,
        labels: &[String],
    ) -> Result<LogEntry> {
        self.log_tasks(date, slot, labels, EntryUpdate::default())
            .await
    }

    /// Appends tasks and applies the flags and place of `extra` in the same write. The tasks of
    /// `extra` are ignored.
    pub async fn log_tasks(
        &self,
        date: NaiveDate,
        slot: TimeSlot,
        labels: &[String],
        extra: EntryUpdate,
    ) -> Result<LogEntry> {
        if labels.is_empty() {
            bail!("Nothing to log");
        }
        if let Some(blank) = labels.iter().position(|v| v.trim().is_empty()) {
            bail!("Task {} has an empty label", blank + 1);
        }

        self.modify_entry(date, slot, |existing| {
            let mut tasks = existing.tasks.clone();
            tasks.extend(labels.iter().map(|v| Task::new(v)));
            Ok(EntryUpdate {
                tasks: Some(tasks),
                ..extra
            })
        })
        .await
    }

    pub async fn remove_task(&self, date: NaiveDate, slot: TimeSlot, id: &str) -> Result<LogEntry> {
        self.modify_entry(date, slot, |existing| {
            let mut tasks = existing.tasks.clone();
            let Some(index) = tasks.iter().position(|v| v.id == id) else {
                bail!("Slot {slot} on {date} has no task with id {id}");
            };
            tasks.remove(index);
            Ok(EntryUpdate::tasks(tasks))
        })
        .await
    }

    /// Removes the most recently added task of the slot.
    pub async fn pop_task(&self, date: NaiveDate, slot: TimeSlot) -> Result<(Task, LogEntry)> {
        let mut popped = None;
        let entry = self
            .modify_entry(date, slot, |existing| {
                let mut tasks = existing.tasks.clone();
                let Some(task) = tasks.pop() else {
                    bail!("Slot {slot} on {date} has no tasks");
                };
                popped = Some(task);
                Ok(EntryUpdate::tasks(tasks))
            })
            .await?;
        let task = popped.ok_or_else(|| anyhow!("Slot {slot} on {date} has no tasks"))?;
        Ok((task, entry))
    }

    /// Flags can only be raised on slots that have tasks. Lowering them is always allowed.
    pub async fn set_flags(
        &self,
        date: NaiveDate,
        slot: TimeSlot,
        important: Option<bool>,
        urgent: Option<bool>,
    ) -> Result<LogEntry> {
        let raising = important == Some(true) || urgent == Some(true);
        self.modify_entry(date, slot, |existing| {
            if raising && !existing.is_logged() {
                bail!("Slot {slot} on {date} has no tasks, log something before flagging it");
            }
            Ok(EntryUpdate::flags(important, urgent))
        })
        .await
    }

    pub async fn set_place(
        &self,
        date: NaiveDate,
        slot: TimeSlot,
        place: Option<String>,
    ) -> Result<LogEntry> {
        self.update_entry(date, slot, EntryUpdate::place(place)).await
    }

    pub async fn clear_slot(&self, date: NaiveDate, slot: TimeSlot) -> Result<()> {
        let mut log = self.storage.get_log_for(date).await?;
        if log.remove(&slot.to_string()).is_some() {
            self.storage.save_log_for(date, &log).await?;
            info!("Cleared slot {slot} on {date}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::{tempdir, TempDir};

    use crate::{
        journal::{
            entities::{DailyLog, EntryUpdate},
            log_storage::{LogStorage, LogStorageImpl},
            slots::TimeSlot,
            Journal,
        },
        utils::logging::TEST_LOGGING,
    };

    /// Counts how often the day files are touched.
    struct CountingStorage {
        inner: LogStorageImpl,
        loads: AtomicUsize,
        saves: AtomicUsize,
    }

    impl LogStorage for CountingStorage {
        async fn get_log_for(&self, date: NaiveDate) -> Result<DailyLog> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.inner.get_log_for(date).await
        }

        async fn save_log_for(&self, date: NaiveDate, log: &DailyLog) -> Result<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save_log_for(date, log).await
        }
    }

    const TEST_DATE: NaiveDate = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();

    fn journal() -> Result<(TempDir, Journal<LogStorageImpl>)> {
        let dir = tempdir()?;
        let storage = LogStorageImpl::new(dir.path().to_owned())?;
        Ok((dir, Journal::new(storage)))
    }

    fn slot(value: &str) -> TimeSlot {
        value.parse().unwrap()
    }

    #[tokio::test]
    async fn add_tasks_appends_in_order() -> Result<()> {
        *TEST_LOGGING;
        let (_dir, journal) = journal()?;
        journal
            .add_tasks(TEST_DATE, slot("09:00"), &["coding".into()])
            .await?;
        let entry = journal
            .add_tasks(TEST_DATE, slot("09:00"), &[" debug ".into(), "tea".into()])
            .await?;

        let labels = entry.tasks.iter().map(|v| v.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, ["coding", "debug", "tea"]);
        assert_eq!(journal.day(TEST_DATE).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn log_tasks_writes_once() -> Result<()> {
        let dir = tempdir()?;
        let journal = Journal::new(CountingStorage {
            inner: LogStorageImpl::new(dir.path().to_owned())?,
            loads: AtomicUsize::new(0),
            saves: AtomicUsize::new(0),
        });

        let extra = EntryUpdate {
            important: Some(true),
            urgent: Some(true),
            place: Some(Some(" library ".into())),
            ..Default::default()
        };
        let entry = journal
            .log_tasks(TEST_DATE, slot("09:00"), &["Study DSA".into()], extra)
            .await?;

        assert!(entry.important && entry.urgent);
        assert_eq!(entry.place.as_deref(), Some("library"));
        assert_eq!(entry.tasks[0].label, "Study DSA");
        assert_eq!(journal.storage().loads.load(Ordering::SeqCst), 1);
        assert_eq!(journal.storage().saves.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn failed_edit_is_not_saved() -> Result<()> {
        let dir = tempdir()?;
        let journal = Journal::new(CountingStorage {
            inner: LogStorageImpl::new(dir.path().to_owned())?,
            loads: AtomicUsize::new(0),
            saves: AtomicUsize::new(0),
        });

        assert!(journal.pop_task(TEST_DATE, slot("10:00")).await.is_err());
        assert!(journal
            .set_flags(TEST_DATE, slot("10:00"), None, Some(true))
            .await
            .is_err());
        assert_eq!(journal.storage().saves.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn add_tasks_rejects_blank_labels() -> Result<()> {
        let (_dir, journal) = journal()?;
        assert!(journal
            .add_tasks(TEST_DATE, slot("09:00"), &["read".into(), "  ".into()])
            .await
            .is_err());
        assert!(journal.add_tasks(TEST_DATE, slot("09:00"), &[]).await.is_err());
        assert!(journal.day(TEST_DATE).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn flagging_requires_tasks() -> Result<()> {
        let (_dir, journal) = journal()?;
        assert!(journal
            .set_flags(TEST_DATE, slot("06:00"), Some(true), None)
            .await
            .is_err());

        journal
            .add_tasks(TEST_DATE, slot("06:00"), &["walk".into()])
            .await?;
        let entry = journal
            .set_flags(TEST_DATE, slot("06:00"), Some(true), Some(true))
            .await?;
        assert!(entry.important && entry.urgent);
        Ok(())
    }

    #[tokio::test]
    async fn removing_last_task_clears_flags() -> Result<()> {
        let (_dir, journal) = journal()?;
        let entry = journal
            .add_tasks(TEST_DATE, slot("07:30"), &["gym".into()])
            .await?;
        journal
            .set_flags(TEST_DATE, slot("07:30"), Some(true), Some(true))
            .await?;

        let entry = journal
            .remove_task(TEST_DATE, slot("07:30"), &entry.tasks[0].id)
            .await?;
        assert!(!entry.important && !entry.urgent);
        assert!(journal.day(TEST_DATE).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn pop_task_keeps_place() -> Result<()> {
        let (_dir, journal) = journal()?;
        journal
            .add_tasks(TEST_DATE, slot("12:00"), &["cook".into(), "eat".into()])
            .await?;
        journal
            .set_place(TEST_DATE, slot("12:00"), Some("home".into()))
            .await?;

        let (task, entry) = journal.pop_task(TEST_DATE, slot("12:00")).await?;
        assert_eq!(task.label, "eat");
        assert_eq!(entry.tasks.len(), 1);
        assert_eq!(entry.place.as_deref(), Some("home"));

        journal.pop_task(TEST_DATE, slot("12:00")).await?;
        assert!(journal.pop_task(TEST_DATE, slot("12:00")).await.is_err());

        let day = journal.day(TEST_DATE).await?;
        assert_eq!(day["12:00"].place.as_deref(), Some("home"));
        Ok(())
    }

    #[tokio::test]
    async fn remove_unknown_task_fails() -> Result<()> {
        let (_dir, journal) = journal()?;
        journal
            .add_tasks(TEST_DATE, slot("08:00"), &["commute".into()])
            .await?;
        assert!(journal
            .remove_task(TEST_DATE, slot("08:00"), "missing")
            .await
            .is_err());
        Ok(())
    }

    #[tokio::test]
    async fn clear_slot_removes_entry() -> Result<()> {
        let (_dir, journal) = journal()?;
        journal
            .add_tasks(TEST_DATE, slot("22:00"), &["pray".into()])
            .await?;
        journal
            .add_tasks(TEST_DATE, slot("22:30"), &["read".into()])
            .await?;
        journal.clear_slot(TEST_DATE, slot("22:00")).await?;

        let day = journal.day(TEST_DATE).await?;
        assert_eq!(day.keys().collect::<Vec<_>>(), ["22:30"]);
        Ok(())
    }
}
