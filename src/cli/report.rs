use std::collections::BTreeSet;

use ansi_term::{Colour, Style};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::{
    analytics::{
        energy::{EnergyCategory, EnergyScores},
        matrix::{classify, MatrixStats, Quadrant},
        summary::{DaySummary, WeekSummary},
    },
    journal::{
        entities::{DailyLog, LogEntry},
        slots::{day_slots, SLOTS_PER_DAY},
    },
};

use super::entry::EntryOutcome;

const BAR_WIDTH: usize = 20;
const MAX_BALANCE_DOTS: usize = 5;
/// Energy points represented by one dot of the week balance.
const POINTS_PER_DOT: f64 = 5.;

pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_outcome(outcome: &EntryOutcome) {
    let slot = Style::new().bold().paint(outcome.slot.to_string());
    if outcome.entry.is_blank() {
        println!("{} {slot}\t{}", outcome.date, dimmed("empty"));
    } else {
        println!("{} {slot}\t{}", outcome.date, format_entry(&outcome.entry, true));
    }
}

/// Prints the day in slot order, starting at 05:00.
pub fn print_day(date: NaiveDate, log: &DailyLog, all: bool, ids: bool) {
    println!("{}", heading(&date.format("%A %d %B %Y").to_string()));
    if !all && !log.values().any(LogEntry::is_logged) {
        println!("{}", dimmed("Nothing logged"));
    }
    for line in day_lines(date, log, all, ids) {
        println!("{line}");
    }
}

/// One line per slot in journal order. Without `all` only slots with tasks are kept. Keys that
/// are not slot starts are skipped.
fn day_lines(date: NaiveDate, log: &DailyLog, all: bool, ids: bool) -> Vec<String> {
    let slots = day_slots();
    let known = slots.iter().map(|v| v.to_string()).collect::<BTreeSet<_>>();
    for key in log.keys().filter(|v| !known.contains(*v)) {
        warn!("Ignoring unknown slot {key:?} on {date}");
    }

    slots
        .into_iter()
        .filter_map(|slot| {
            let time = slot.to_string();
            match log.get(&time) {
                Some(entry) if all || entry.is_logged() => {
                    Some(format!("{time}\t{}", format_entry(entry, ids)))
                }
                _ if all => Some(dimmed(&time)),
                _ => None,
            }
        })
        .collect()
}

/// One line describing a slot: tasks, flags, place.
pub fn format_entry(entry: &LogEntry, ids: bool) -> String {
    let mut line = if entry.tasks.is_empty() {
        "(no tasks)".to_string()
    } else {
        entry
            .tasks
            .iter()
            .map(|v| {
                if ids {
                    format!("{} [{}]", v.label, v.id)
                } else {
                    v.label.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    if entry.is_logged() {
        let flags = match classify(entry) {
            Quadrant::Q1 => " !important !urgent",
            Quadrant::Q2 => " !important",
            Quadrant::Q3 => " !urgent",
            Quadrant::Q4 => "",
        };
        line.push_str(flags);
    }
    if let Some(place) = &entry.place {
        line.push_str(" @ ");
        line.push_str(place);
    }
    line
}

pub fn print_day_summary(summary: &DaySummary) {
    println!("{}", heading(&summary.date.format("%A %d %B %Y").to_string()));

    println!("{}", section("Flow"));
    println!(
        "  {}/{SLOTS_PER_DAY} slots logged, {} important, {} urgent",
        summary.logged_slots, summary.important, summary.urgent
    );

    println!("{}", section("Energy"));
    print_energy_bars(&summary.energy);
    println!("  Dominant: {}", dominant_label(summary.dominant_energy));

    println!("{}", section("Focus"));
    print_counts(&summary.top_tasks);

    println!("{}", section("Where"));
    print_counts(&summary.top_places);

    print_matrix(&summary.matrix);
    println!("  {}", summary.interpretation);
}

pub fn print_week_summary(summary: &WeekSummary) {
    let (Some(last), Some(first)) = (summary.days.first(), summary.days.last()) else {
        println!("{}", dimmed("No days requested"));
        return;
    };
    println!("{}", heading(&format!("{} to {}", first.date, last.date)));

    println!("{}", section("Days"));
    for day in &summary.days {
        let slots = format!("{:>2} slots", day.slots_logged);
        let slots = if day.slots_logged == 0 {
            dimmed(&slots)
        } else {
            slots
        };
        println!(
            "  {}\t{slots}\t{}",
            day.date.format("%a %d %b"),
            dominant_label(day.dominant_energy)
        );
    }
    println!("  {} slots logged in total", summary.total_slots);

    println!("{}", section("Balance"));
    for (category, score) in summary.energy.iter() {
        println!(
            "  {:<10} {} {}",
            category.to_string(),
            energy_colour(category).paint(balance_dots(score)),
            format_score(score)
        );
    }
    println!("  Dominant: {}", dominant_label(summary.dominant_energy));

    println!("{}", section("Repeating"));
    if summary.repeating_tasks.is_empty() {
        println!("  {}", dimmed("Nothing repeated"));
    }
    for task in &summary.repeating_tasks {
        println!("  {task}");
    }

    print_matrix(&summary.matrix);
    println!("  {}", summary.interpretation);
}

fn print_energy_bars(energy: &EnergyScores) {
    let max = energy.iter().map(|(_, v)| v).fold(0., f64::max);
    for (category, score) in energy.iter() {
        println!(
            "  {:<10} {} {}",
            category.to_string(),
            energy_colour(category).paint(energy_bar(score, max)),
            format_score(score)
        );
    }
}

fn print_counts(counts: &[(String, u32)]) {
    if counts.is_empty() {
        println!("  {}", dimmed("-"));
    }
    for (label, count) in counts {
        println!("  {count:>3}  {label}");
    }
}

fn print_matrix(matrix: &MatrixStats) {
    println!("{}", section("Matrix"));
    for quadrant in Quadrant::ALL {
        println!(
            "  {:<28}{:>3}{:>5}%",
            quadrant.title(),
            matrix.counts.get(quadrant),
            matrix.percentages.get(quadrant)
        );
    }
}

/// Bar proportional to the strongest category.
fn energy_bar(score: f64, max: f64) -> String {
    let filled = if max > 0. {
        ((score / max) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn balance_dots(score: f64) -> String {
    let filled = ((score / POINTS_PER_DOT).round() as usize).min(MAX_BALANCE_DOTS);
    format!("{}{}", "●".repeat(filled), "○".repeat(MAX_BALANCE_DOTS - filled))
}

fn format_score(score: f64) -> String {
    if score.fract() == 0. {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}

fn dominant_label(category: Option<EnergyCategory>) -> String {
    category
        .map(|v| v.to_string())
        .unwrap_or_else(|| dimmed("none"))
}

fn energy_colour(category: EnergyCategory) -> Colour {
    match category {
        EnergyCategory::Physical => Colour::Red,
        EnergyCategory::Mental => Colour::Blue,
        EnergyCategory::Emotional => Colour::Yellow,
        EnergyCategory::Spiritual => Colour::Purple,
    }
}

fn heading(text: &str) -> String {
    Style::new().bold().underline().paint(text).to_string()
}

fn section(text: &str) -> String {
    Colour::Cyan.bold().paint(text).to_string()
}

fn dimmed(text: &str) -> String {
    Style::new().dimmed().paint(text).to_string()
}
