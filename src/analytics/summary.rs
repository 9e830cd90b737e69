use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use anyhow::Result;
use chrono::NaiveDate;
use futures::{stream, StreamExt, TryStreamExt};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    journal::{entities::DailyLog, log_storage::LogStorage},
    utils::time::trailing_days,
};

use super::{
    energy::{compute_entry_energy, EnergyCategory, EnergyScores},
    matrix::{count_quadrants, interpret, Interpretation, MatrixStats, QuadrantValues},
};

/// How many of the most frequent tasks a day summary lists.
pub const TOP_TASKS: usize = 8;

/// A task has to appear this many times within a week to count as repeating.
pub const REPEATING_THRESHOLD: u32 = 3;

pub const DEFAULT_WEEK_DAYS: u32 = 7;

/// Longest window the `week` command accepts.
pub const MAX_WEEK_DAYS: u32 = 366;

/// Days loaded from storage at the same time when building a week.
const CONCURRENT_DAY_LOADS: usize = 4;

/// Frequency of task labels. Labels are compared lower-cased and trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskTally(BTreeMap<String, u32>);

impl TaskTally {
    pub fn record(&mut self, label: &str) {
        let label = label.trim().to_lowercase();
        if !label.is_empty() {
            *self.0.entry(label).or_default() += 1;
        }
    }

    pub fn count(&self, label: &str) -> u32 {
        self.0
            .get(&label.trim().to_lowercase())
            .copied()
            .unwrap_or_default()
    }

    /// Labels ordered by frequency, alphabetically within the same frequency.
    pub fn ranked(&self) -> Vec<(String, u32)> {
        let mut ranked = self
            .0
            .iter()
            .map(|(label, count)| (label.clone(), *count))
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    pub fn top(&self, limit: usize) -> Vec<(String, u32)> {
        let mut ranked = self.ranked();
        ranked.truncate(limit);
        ranked
    }

    pub fn at_least(&self, threshold: u32) -> Vec<String> {
        self.ranked()
            .into_iter()
            .filter(|(_, count)| *count >= threshold)
            .map(|(label, _)| label)
            .collect()
    }
}

impl Add for TaskTally {
    type Output = TaskTally;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for TaskTally {
    fn add_assign(&mut self, rhs: Self) {
        for (label, count) in rhs.0 {
            *self.0.entry(label).or_default() += count;
        }
    }
}

/// Analytics of a single journal day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Slots present in the day file, including ones that only carry a place.
    pub total_slots: usize,
    pub logged_slots: usize,
    pub important: usize,
    pub urgent: usize,
    pub energy: EnergyScores,
    pub dominant_energy: Option<EnergyCategory>,
    pub top_tasks: Vec<(String, u32)>,
    pub top_places: Vec<(String, u32)>,
    pub matrix: MatrixStats,
    pub interpretation: Interpretation,
    #[serde(skip)]
    tasks: TaskTally,
}

impl DaySummary {
    pub fn from_log(date: NaiveDate, log: &DailyLog) -> Self {
        let mut energy = EnergyScores::default();
        let mut tasks = TaskTally::default();
        let mut places = TaskTally::default();
        let mut important = 0;
        let mut urgent = 0;

        for entry in log.values().filter(|v| v.is_logged()) {
            important += entry.important as usize;
            urgent += entry.urgent as usize;
            energy += compute_entry_energy(&entry.tasks, entry.important, entry.urgent);
            for task in &entry.tasks {
                tasks.record(&task.label);
            }
            if let Some(place) = &entry.place {
                places.record(place);
            }
        }

        let matrix = MatrixStats::from_counts(count_quadrants(log.values()));

        Self {
            date,
            total_slots: log.len(),
            logged_slots: matrix.total as usize,
            important,
            urgent,
            energy,
            dominant_energy: energy.dominant(),
            top_tasks: tasks.top(TOP_TASKS),
            top_places: places.ranked(),
            matrix,
            interpretation: interpret(&matrix),
            tasks,
        }
    }
}

/// One line of the week overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRow {
    pub date: NaiveDate,
    pub slots_logged: usize,
    pub dominant_energy: Option<EnergyCategory>,
}

/// Analytics of a trailing window of days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekSummary {
    /// Same order as the summaries the week was built from, most recent first when loaded with
    /// [summarize_week].
    pub days: Vec<DayRow>,
    pub total_slots: usize,
    pub energy: EnergyScores,
    pub dominant_energy: Option<EnergyCategory>,
    pub repeating_tasks: Vec<String>,
    pub matrix: MatrixStats,
    pub interpretation: Interpretation,
}

impl WeekSummary {
    /// Combines day summaries. Energy, quadrant counts and task frequencies are plain sums, so
    /// the result does not depend on how the days were produced.
    pub fn from_days(days: impl IntoIterator<Item = DaySummary>) -> Self {
        let mut rows = vec![];
        let mut energy = EnergyScores::default();
        let mut counts = QuadrantValues::default();
        let mut tasks = TaskTally::default();

        for day in days {
            rows.push(DayRow {
                date: day.date,
                slots_logged: day.logged_slots,
                dominant_energy: day.dominant_energy,
            });
            energy += day.energy;
            counts += day.matrix.counts;
            tasks += day.tasks;
        }

        let matrix = MatrixStats::from_counts(counts);

        Self {
            days: rows,
            total_slots: matrix.total as usize,
            energy,
            dominant_energy: energy.dominant(),
            repeating_tasks: tasks.at_least(REPEATING_THRESHOLD),
            matrix,
            interpretation: interpret(&matrix),
        }
    }
}

#[instrument(skip(storage))]
pub async fn summarize_day(storage: impl LogStorage, date: NaiveDate) -> Result<DaySummary> {
    let log = storage.get_log_for(date).await?;
    Ok(DaySummary::from_log(date, &log))
}

/// Loads `days` journal days ending at `end` (inclusive) and summarizes them. Days are read
/// concurrently.
#[instrument(skip(storage))]
pub async fn summarize_week(
    storage: impl LogStorage,
    end: NaiveDate,
    days: u32,
) -> Result<WeekSummary> {
    let storage = &storage;
    let summaries = stream::iter(trailing_days(end, days))
        .map(move |date| async move {
            let log = storage.get_log_for(date).await?;
            debug!("Loaded {} slots for {date}", log.len());
            Ok::<_, anyhow::Error>(DaySummary::from_log(date, &log))
        })
        .buffered(CONCURRENT_DAY_LOADS)
        .try_collect::<Vec<_>>()
        .await?;

    Ok(WeekSummary::from_days(summaries))
}
