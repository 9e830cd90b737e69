use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Subcommand;

use crate::{
    journal::{
        entities::{EntryUpdate, LogEntry},
        log_storage::LogStorage,
        slots::TimeSlot,
        Journal,
    },
    utils::clock::Clock,
};

use super::date::SlotArgs;

/// Commands that edit a single slot.
#[derive(Subcommand, Debug)]
pub enum EntryCommand {
    #[command(about = "Log tasks into a slot. Each argument becomes a separate task")]
    Log {
        #[arg(required = true, help = "Task labels, for example \"Study DSA\" gym")]
        tasks: Vec<String>,
        #[command(flatten)]
        target: SlotArgs,
        #[arg(short, long, help = "Mark the slot as important")]
        important: bool,
        #[arg(short, long, help = "Mark the slot as urgent")]
        urgent: bool,
        #[arg(short, long, help = "Where the slot was spent")]
        place: Option<String>,
    },
    #[command(about = "Remove the most recently logged task of a slot")]
    Undo {
        #[command(flatten)]
        target: SlotArgs,
    },
    #[command(about = "Remove a task by its id. Ids are printed by `show --ids`")]
    Remove {
        id: String,
        #[command(flatten)]
        target: SlotArgs,
    },
    #[command(about = "Set or unset the important/urgent flags of a slot that has tasks")]
    Flag {
        #[command(flatten)]
        target: SlotArgs,
        #[arg(long, help = "New value of the important flag")]
        important: Option<bool>,
        #[arg(long, help = "New value of the urgent flag")]
        urgent: Option<bool>,
    },
    #[command(about = "Set the place of a slot. Without a value the place is removed")]
    Place {
        place: Option<String>,
        #[command(flatten)]
        target: SlotArgs,
    },
    #[command(about = "Remove everything logged in a slot")]
    Clear {
        #[command(flatten)]
        target: SlotArgs,
    },
}

/// Result of an edit, used for printing.
#[derive(Debug)]
pub struct EntryOutcome {
    pub date: NaiveDate,
    pub slot: TimeSlot,
    pub entry: LogEntry,
}

pub async fn process_entry_command<S: LogStorage>(
    journal: &Journal<S>,
    clock: &impl Clock,
    command: EntryCommand,
) -> Result<EntryOutcome> {
    let (date, slot, entry) = match command {
        EntryCommand::Log {
            tasks,
            target,
            important,
            urgent,
            place,
        } => {
            let (date, slot) = target.resolve(clock)?;
            // Flags are only raised here, logging never lowers an existing flag.
            let extra = EntryUpdate {
                important: important.then_some(true),
                urgent: urgent.then_some(true),
                place: place.map(Some),
                ..Default::default()
            };
            let entry = journal.log_tasks(date, slot, &tasks, extra).await?;
            (date, slot, entry)
        }
        EntryCommand::Undo { target } => {
            let (date, slot) = target.resolve(clock)?;
            let (_, entry) = journal.pop_task(date, slot).await?;
            (date, slot, entry)
        }
        EntryCommand::Remove { id, target } => {
            let (date, slot) = target.resolve(clock)?;
            let entry = journal.remove_task(date, slot, &id).await?;
            (date, slot, entry)
        }
        EntryCommand::Flag {
            target,
            important,
            urgent,
        } => {
            if important.is_none() && urgent.is_none() {
                bail!("Specify --important and/or --urgent");
            }
            let (date, slot) = target.resolve(clock)?;
            let entry = journal.set_flags(date, slot, important, urgent).await?;
            (date, slot, entry)
        }
        EntryCommand::Place { place, target } => {
            let (date, slot) = target.resolve(clock)?;
            let entry = journal.set_place(date, slot, place).await?;
            (date, slot, entry)
        }
        EntryCommand::Clear { target } => {
            let (date, slot) = target.resolve(clock)?;
            journal.clear_slot(date, slot).await?;
            (date, slot, LogEntry::default())
        }
    };

    Ok(EntryOutcome { date, slot, entry })
}
