pub mod date;
pub mod entry;
pub mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    analytics::summary::{summarize_day, summarize_week, DEFAULT_WEEK_DAYS, MAX_WEEK_DAYS},
    journal::{log_storage::LogStorageImpl, Journal},
    utils::{
        clock::DefaultClock,
        dir::resolve_application_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

use date::DateArgs;
use entry::{process_entry_command, EntryCommand};

const JOURNAL_DIR: &str = "journal";

#[derive(Parser, Debug)]
#[command(name = "halfhour", version, long_about = None)]
#[command(about = "Half-hour time-log journal with energy and Important/Urgent analytics", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Entry(EntryCommand),
    #[command(about = "Print the slots of a day in order")]
    Show {
        #[command(flatten)]
        date: DateArgs,
        #[arg(long, help = "Also print empty slots")]
        all: bool,
        #[arg(long, help = "Print task ids, used by `remove`")]
        ids: bool,
    },
    #[command(about = "Summarize a day: flow, energy, focus, places and the Important/Urgent matrix")]
    Today {
        #[command(flatten)]
        date: DateArgs,
        #[arg(long, help = "Print the summary as JSON")]
        json: bool,
    },
    #[command(about = "Summarize the days ending at the given date")]
    Week {
        #[command(flatten)]
        date: DateArgs,
        #[arg(
            long,
            default_value_t = DEFAULT_WEEK_DAYS,
            value_parser = clap::value_parser!(u32).range(1..=MAX_WEEK_DAYS as i64),
            help = "Number of days in the window, at most a year"
        )]
        days: u32,
        #[arg(long, help = "Print the summary as JSON")]
        json: bool,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let application_path = resolve_application_path(args.dir)?;
    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &application_path, logging_level, args.log)?;

    let journal_path = application_path.join(JOURNAL_DIR);
    let storage = LogStorageImpl::new(journal_path.clone())
        .with_context(|| format!("Can't open journal directory {journal_path:?}"))?;
    let journal = Journal::new(storage);
    let clock = DefaultClock;

    match args.commands {
        Commands::Entry(command) => {
            let outcome = process_entry_command(&journal, &clock, command).await?;
            report::print_outcome(&outcome);
        }
        Commands::Show { date, all, ids } => {
            let date = date.resolve(&clock)?;
            let log = journal.day(date).await?;
            report::print_day(date, &log, all, ids);
        }
        Commands::Today { date, json } => {
            let summary = summarize_day(journal.storage(), date.resolve(&clock)?).await?;
            if json {
                report::print_json(&summary)?;
            } else {
                report::print_day_summary(&summary);
            }
        }
        Commands::Week { date, days, json } => {
            let summary = summarize_week(journal.storage(), date.resolve(&clock)?, days).await?;
            if json {
                report::print_json(&summary)?;
            } else {
                report::print_week_summary(&summary);
            }
        }
    }
    Ok(())
}
