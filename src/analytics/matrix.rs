//! Important/Urgent matrix. Logged slots are split into four quadrants by their flags, the
//! quadrant shares are turned into whole percentages that always add up to 100, and the
//! distribution is summarised in one sentence.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign},
};

use serde::{Deserialize, Serialize};

use crate::{
    journal::entities::LogEntry,
    utils::percentage::{first_largest, rounded_percentage},
};

/// Share a quadrant needs before the interpretation is attributed to it outright.
const DOMINANT_SHARE: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// Important and urgent. Crisis, firefighting.
    Q1,
    /// Important, not urgent. Growth that compounds.
    Q2,
    /// Urgent, not important. Distraction.
    Q3,
    /// Neither.
    Q4,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::Q1, Quadrant::Q2, Quadrant::Q3, Quadrant::Q4];

    pub fn from_flags(important: bool, urgent: bool) -> Self {
        match (important, urgent) {
            (true, true) => Quadrant::Q1,
            (true, false) => Quadrant::Q2,
            (false, true) => Quadrant::Q3,
            (false, false) => Quadrant::Q4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Quadrant::Q1 => "Important + Urgent",
            Quadrant::Q2 => "Important + Not Urgent",
            Quadrant::Q3 => "Not Important + Urgent",
            Quadrant::Q4 => "Not Important + Not Urgent",
        }
    }
}

impl Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quadrant::Q1 => write!(f, "q1"),
            Quadrant::Q2 => write!(f, "q2"),
            Quadrant::Q3 => write!(f, "q3"),
            Quadrant::Q4 => write!(f, "q4"),
        }
    }
}

/// Quadrant of a slot. Only the flags matter, tasks are not looked at.
pub fn classify(entry: &LogEntry) -> Quadrant {
    Quadrant::from_flags(entry.important, entry.urgent)
}

/// Four values, one per quadrant. Used both for slot counts and for percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadrantValues {
    pub q1: u32,
    pub q2: u32,
    pub q3: u32,
    pub q4: u32,
}

impl QuadrantValues {
    pub fn get(&self, quadrant: Quadrant) -> u32 {
        match quadrant {
            Quadrant::Q1 => self.q1,
            Quadrant::Q2 => self.q2,
            Quadrant::Q3 => self.q3,
            Quadrant::Q4 => self.q4,
        }
    }

    fn get_mut(&mut self, quadrant: Quadrant) -> &mut u32 {
        match quadrant {
            Quadrant::Q1 => &mut self.q1,
            Quadrant::Q2 => &mut self.q2,
            Quadrant::Q3 => &mut self.q3,
            Quadrant::Q4 => &mut self.q4,
        }
    }

    pub fn as_array(&self) -> [u32; 4] {
        [self.q1, self.q2, self.q3, self.q4]
    }

    pub fn sum(&self) -> u32 {
        self.as_array().iter().sum()
    }

    /// The quadrant with the highest value, earliest quadrant first on ties.
    pub fn largest(&self) -> Quadrant {
        Quadrant::ALL[first_largest(&self.as_array()).unwrap_or_default()]
    }
}

impl Add for QuadrantValues {
    type Output = QuadrantValues;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for QuadrantValues {
    fn add_assign(&mut self, rhs: Self) {
        for quadrant in Quadrant::ALL {
            *self.get_mut(quadrant) += rhs.get(quadrant);
        }
    }
}

impl Sum for QuadrantValues {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(QuadrantValues::default(), Add::add)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixStats {
    #[serde(flatten)]
    pub counts: QuadrantValues,
    pub total: u32,
    pub percentages: QuadrantValues,
}

impl MatrixStats {
    /// Builds the stats from already counted slots. Counts of several days can be added together
    /// and passed here.
    pub fn from_counts(counts: QuadrantValues) -> Self {
        let total = counts.sum();
        let rounded = QuadrantValues {
            q1: rounded_percentage(counts.q1, total),
            q2: rounded_percentage(counts.q2, total),
            q3: rounded_percentage(counts.q3, total),
            q4: rounded_percentage(counts.q4, total),
        };
        let percentages = if total > 0 {
            normalize_percentages(rounded)
        } else {
            rounded
        };

        Self {
            counts,
            total,
            percentages,
        }
    }
}

/// Fixes rounding drift so the percentages add up to exactly 100. The difference is given to the
/// largest quadrant, the earliest one on ties.
pub fn normalize_percentages(percentages: QuadrantValues) -> QuadrantValues {
    let diff = 100 - percentages.sum() as i64;
    if diff == 0 {
        return percentages;
    }

    let mut normalized = percentages;
    let largest = normalized.get_mut(percentages.largest());
    *largest = (*largest as i64 + diff).max(0) as u32;
    normalized
}

/// Counts slots per quadrant. Slots without tasks are skipped no matter which flags they carry.
pub fn count_quadrants<'a>(entries: impl IntoIterator<Item = &'a LogEntry>) -> QuadrantValues {
    let mut counts = QuadrantValues::default();
    for entry in entries.into_iter().filter(|v| v.is_logged()) {
        *counts.get_mut(classify(entry)) += 1;
    }
    counts
}

pub fn calculate_matrix<'a>(entries: impl IntoIterator<Item = &'a LogEntry>) -> MatrixStats {
    MatrixStats::from_counts(count_quadrants(entries))
}

/// Qualitative reading of a [MatrixStats].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpretation {
    NoData,
    Compounding,
    UrgencyDominated,
    Noise,
    Drift,
    LeaningGrowth,
    LeaningFirefighting,
    LeaningDistraction,
    Balanced,
}

impl Interpretation {
    pub fn message(&self) -> &'static str {
        match self {
            Interpretation::NoData => "No logged time yet today.",
            Interpretation::Compounding => {
                "Most of your time went into important but not urgent work — this compounds."
            }
            Interpretation::UrgencyDominated => {
                "Urgency dominated today. This often feels productive, but rarely is."
            }
            Interpretation::Noise => {
                "Much of today was urgent but not important — noise disguised as action."
            }
            Interpretation::Drift => {
                "A significant portion of today went to neither important nor urgent work."
            }
            Interpretation::LeaningGrowth => {
                "Today leaned toward important, non-urgent work — a good sign."
            }
            Interpretation::LeaningFirefighting => {
                "Today was heavy on urgent and important work — firefighting mode."
            }
            Interpretation::LeaningDistraction => "Today was marked by urgent distractions.",
            Interpretation::Balanced => "A balanced mix across all quadrants today.",
        }
    }
}

impl Display for Interpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Rules are checked in order and the first one that holds wins. Q2 is looked at first.
pub fn interpret(stats: &MatrixStats) -> Interpretation {
    if stats.total == 0 {
        return Interpretation::NoData;
    }

    let percentages = &stats.percentages;
    if percentages.q2 >= DOMINANT_SHARE {
        return Interpretation::Compounding;
    }
    if percentages.q1 >= DOMINANT_SHARE {
        return Interpretation::UrgencyDominated;
    }
    if percentages.q3 >= DOMINANT_SHARE {
        return Interpretation::Noise;
    }
    if percentages.q4 >= DOMINANT_SHARE {
        return Interpretation::Drift;
    }

    match percentages.largest() {
        Quadrant::Q1 => Interpretation::LeaningFirefighting,
        Quadrant::Q2 => Interpretation::LeaningGrowth,
        Quadrant::Q3 => Interpretation::LeaningDistraction,
        Quadrant::Q4 => Interpretation::Balanced,
    }
}
