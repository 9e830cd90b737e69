use std::fmt::Display;

use anyhow::Result;
use chrono::{NaiveDate, TimeZone, Utc};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};

use crate::{
    journal::slots::{journal_date, TimeSlot},
    utils::clock::Clock,
};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct DateArgs {
    #[arg(
        long,
        short,
        help = "Journal date. Examples are \"yesterday\", \"friday\", \"15/03/2025\". Defaults to the current journal day, which lasts until 04:59 of the next morning"
    )]
    pub date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    pub date_style: DateStyle,
}

impl DateArgs {
    pub fn resolve(&self, clock: &impl Clock) -> Result<NaiveDate> {
        let now = clock.now();
        let Some(date) = &self.date else {
            return Ok(journal_date(now));
        };

        // Relative dates only need a reference point, the offset is irrelevant.
        let reference = Utc.from_utc_datetime(&now);
        match parse_date_string(date, reference, self.date_style.into()) {
            Ok(v) => Ok(v.date_naive()),
            Err(e) => Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate date {date:?}: {e}"),
                )
                .into()),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct SlotArgs {
    #[command(flatten)]
    pub date: DateArgs,
    #[arg(
        long,
        short,
        help = "Start of the half-hour slot, for example 09:00 or 9:30. Defaults to the slot containing the current time"
    )]
    pub slot: Option<TimeSlot>,
}

impl SlotArgs {
    /// When neither date nor slot is given, the current slot of the current journal day is used.
    pub fn resolve(&self, clock: &impl Clock) -> Result<(NaiveDate, TimeSlot)> {
        let date = self.date.resolve(clock)?;
        let slot = self
            .slot
            .unwrap_or_else(|| TimeSlot::containing(clock.now().time()));
        Ok((date, slot))
    }
}
