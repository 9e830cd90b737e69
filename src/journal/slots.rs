//! Half-hour slot model. A journal day starts at 05:00 and ends with the 04:30 slot of the next
//! calendar morning, 48 slots in total.

use std::{fmt::Display, str::FromStr};

use anyhow::{anyhow, bail};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Hour at which a journal day begins.
pub const DAY_START_HOUR: u32 = 5;

pub const SLOTS_PER_DAY: usize = 48;

/// Start of a half-hour slot, rendered as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot {
    hour: u32,
    minute: u32,
}

impl TimeSlot {
    pub fn new_opt(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && (minute == 0 || minute == 30) {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// The slot a wall-clock time falls into.
    pub fn containing(time: NaiveTime) -> Self {
        Self {
            hour: time.hour(),
            minute: if time.minute() < 30 { 0 } else { 30 },
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Index of the slot within [day_slots].
    pub fn position(&self) -> usize {
        let hour = (self.hour + 24 - DAY_START_HOUR) % 24;
        (hour * 2 + self.minute / 30) as usize
    }
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeSlot {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((hour, minute)) = s.trim().split_once(':') else {
            bail!("Slot {s:?} should look like HH:MM");
        };
        let digits = |v: &str| v.bytes().all(|b| b.is_ascii_digit());
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 || !digits(hour) || !digits(minute)
        {
            bail!("Slot {s:?} should look like HH:MM");
        }
        let hour = hour.parse::<u32>()?;
        let minute = minute.parse::<u32>()?;
        TimeSlot::new_opt(hour, minute)
            .ok_or_else(|| anyhow!("Slot {s:?} is not the start of a half hour"))
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(value: TimeSlot) -> Self {
        value.to_string()
    }
}

/// All slots of a journal day in display order: 05:00, 05:30, ..., 23:30, 00:00, ..., 04:30.
pub fn day_slots() -> Vec<TimeSlot> {
    (0..SLOTS_PER_DAY as u32)
        .map(|index| TimeSlot {
            hour: (DAY_START_HOUR + index / 2) % 24,
            minute: (index % 2) * 30,
        })
        .collect()
}

/// The journal date a moment belongs to. Anything before 05:00 is still part of the previous
/// day's journal.
pub fn journal_date(now: NaiveDateTime) -> NaiveDate {
    let date = now.date();
    if now.hour() < DAY_START_HOUR {
        date.checked_sub_days(Days::new(1)).unwrap_or(date)
    } else {
        date
    }
}
