use std::{future::Future, io::ErrorKind, ops::Deref, path::PathBuf};

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tracing::{debug, instrument};

use crate::utils::time::date_to_record_name;

use super::entities::DailyLog;

/// Interface for abstracting storage of journal days.
pub trait LogStorage {
    /// Retrieves the log of a certain journal day. Days that were never written are empty.
    fn get_log_for(&self, date: NaiveDate) -> impl Future<Output = Result<DailyLog>> + Send;

    /// Replaces the stored log of a journal day.
    fn save_log_for(
        &self,
        date: NaiveDate,
        log: &DailyLog,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl<T: Deref> LogStorage for T
where
    T::Target: LogStorage,
{
    fn get_log_for(&self, date: NaiveDate) -> impl Future<Output = Result<DailyLog>> + Send {
        self.deref().get_log_for(date)
    }

    fn save_log_for(
        &self,
        date: NaiveDate,
        log: &DailyLog,
    ) -> impl Future<Output = Result<()>> + Send {
        self.deref().save_log_for(date, log)
    }
}

/// The main realization of [LogStorage]. Every journal day is a JSON file named after its date.
pub struct LogStorageImpl {
    journal_dir: PathBuf,
}

impl LogStorageImpl {
    pub fn new(journal_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&journal_dir)?;

        Ok(Self { journal_dir })
    }

    fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.journal_dir.join(date_to_record_name(date))
    }
}

impl LogStorage for LogStorageImpl {
    #[instrument(skip(self))]
    async fn get_log_for(&self, date: NaiveDate) -> Result<DailyLog> {
        let path = self.path_for(date);

        let mut file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No journal file at {path:?}");
                return Ok(DailyLog::new());
            }
            Err(e) => Err(e)?,
        };

        file.lock_shared()?;
        let mut content = String::new();
        let read = file.read_to_string(&mut content).await;
        file.unlock_async().await?;
        read?;

        if content.trim().is_empty() {
            return Ok(DailyLog::new());
        }

        serde_json::from_str::<DailyLog>(&content)
            .map_err(|e| anyhow!("Journal file {path:?} is corrupted: {e}"))
    }

    #[instrument(skip(self, log), fields(slots = log.len()))]
    async fn save_log_for(&self, date: NaiveDate, log: &DailyLog) -> Result<()> {
        let path = self.path_for(date);
        let buffer = serde_json::to_vec_pretty(log)?;

        let mut file = File::options()
            .write(true)
            .create(true)
            .read(true)
            .truncate(false)
            .open(&path)
            .await?;

        // Truncation happens only after the lock is held so readers never see a half-written day.
        file.lock_exclusive()?;
        let result = async {
            file.set_len(0).await?;
            file.rewind().await?;
            file.write_all(&buffer).await?;
            file.flush().await?;
            file.sync_data().await?;
            Ok::<_, std::io::Error>(())
        }
        .await;
        file.unlock_async().await?;
        result?;

        debug!("Saved journal file {path:?}");
        Ok(())
    }
}
