//! Energy profile of logged tasks. Every task label is matched against a keyword table, and
//! every category it matches earns weight, more when the slot was important or urgent.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign},
    sync::LazyLock,
};

use serde::{Deserialize, Serialize};

use crate::journal::entities::Task;

const BASE_WEIGHT: f64 = 1.;
const IMPORTANT_WEIGHT: f64 = 0.5;
const URGENT_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnergyCategory {
    Physical,
    Mental,
    Emotional,
    Spiritual,
}

impl EnergyCategory {
    /// Declaration order. Ties between categories are resolved in this order.
    pub const ALL: [EnergyCategory; 4] = [
        EnergyCategory::Physical,
        EnergyCategory::Mental,
        EnergyCategory::Emotional,
        EnergyCategory::Spiritual,
    ];
}

impl Display for EnergyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnergyCategory::Physical => write!(f, "Physical"),
            EnergyCategory::Mental => write!(f, "Mental"),
            EnergyCategory::Emotional => write!(f, "Emotional"),
            EnergyCategory::Spiritual => write!(f, "Spiritual"),
        }
    }
}

pub const DEFAULT_KEYWORDS: [(EnergyCategory, &[&str]); 4] = [
    (
        EnergyCategory::Mental,
        &[
            "study", "dsa", "coding", "code", "learn", "read", "algorithm", "debug", "exam",
            "lecture", "class",
        ],
    ),
    (
        EnergyCategory::Physical,
        &[
            "walk", "gym", "workout", "run", "travel", "commute", "clean", "cook", "exercise",
            "sport",
        ],
    ),
    (
        EnergyCategory::Spiritual,
        &[
            "pray", "bible", "worship", "church", "meditate", "silence", "god", "quiet",
        ],
    ),
    (
        EnergyCategory::Emotional,
        &[
            "talk", "family", "friend", "cry", "laugh", "feel", "worry", "overthinking", "call",
            "meet",
        ],
    ),
];

static DEFAULT_CLASSIFIER: LazyLock<EnergyClassifier> = LazyLock::new(EnergyClassifier::default);

/// Accumulated weight per category.
///
/// Every contribution is a multiple of 0.5, so sums are exact and the order in which entries are
/// added never changes the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyScores {
    pub physical: f64,
    pub mental: f64,
    pub emotional: f64,
    pub spiritual: f64,
}

impl EnergyScores {
    pub fn get(&self, category: EnergyCategory) -> f64 {
        match category {
            EnergyCategory::Physical => self.physical,
            EnergyCategory::Mental => self.mental,
            EnergyCategory::Emotional => self.emotional,
            EnergyCategory::Spiritual => self.spiritual,
        }
    }

    fn slot_mut(&mut self, category: EnergyCategory) -> &mut f64 {
        match category {
            EnergyCategory::Physical => &mut self.physical,
            EnergyCategory::Mental => &mut self.mental,
            EnergyCategory::Emotional => &mut self.emotional,
            EnergyCategory::Spiritual => &mut self.spiritual,
        }
    }

    /// Scores in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (EnergyCategory, f64)> + '_ {
        EnergyCategory::ALL.into_iter().map(move |v| (v, self.get(v)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, score)| score == 0.)
    }

    pub fn dominant(&self) -> Option<EnergyCategory> {
        dominant_category(self)
    }
}

impl Add for EnergyScores {
    type Output = EnergyScores;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for EnergyScores {
    fn add_assign(&mut self, rhs: Self) {
        for category in EnergyCategory::ALL {
            *self.slot_mut(category) += rhs.get(category);
        }
    }
}

impl Sum for EnergyScores {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(EnergyScores::default(), Add::add)
    }
}

/// Keyword table mapping categories to label substrings. Keywords are stored lower-cased.
#[derive(Debug, Clone)]
pub struct EnergyClassifier {
    keywords: Vec<(EnergyCategory, Vec<String>)>,
}

impl Default for EnergyClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().map(|(category, words)| {
            (*category, words.iter().map(|v| v.to_string()).collect())
        }))
    }
}

impl EnergyClassifier {
    pub fn new(table: impl IntoIterator<Item = (EnergyCategory, Vec<String>)>) -> Self {
        let mut classifier = Self { keywords: vec![] };
        for (category, words) in table {
            classifier.extend(category, words);
        }
        classifier
    }

    /// Adds keywords to a category. Blank keywords are ignored since they would match any label.
    pub fn extend(&mut self, category: EnergyCategory, words: impl IntoIterator<Item = String>) {
        let words = words
            .into_iter()
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty());
        match self.keywords.iter_mut().find(|(v, _)| *v == category) {
            Some((_, existing)) => existing.extend(words),
            None => self.keywords.push((category, words.collect())),
        }
    }

    pub fn keywords(&self, category: EnergyCategory) -> &[String] {
        self.keywords
            .iter()
            .find(|(v, _)| *v == category)
            .map(|(_, words)| words.as_slice())
            .unwrap_or_default()
    }

    /// Categories whose keywords appear in the label. Each category is reported once no matter
    /// how many of its keywords match.
    pub fn matches<'a>(&'a self, label: &str) -> impl Iterator<Item = EnergyCategory> + 'a {
        let label = label.trim().to_lowercase();
        self.keywords
            .iter()
            .filter(move |(_, words)| words.iter().any(|v| label.contains(v.as_str())))
            .map(|(category, _)| *category)
    }

    /// Weighted energy of one slot.
    pub fn score(&self, tasks: &[Task], important: bool, urgent: bool) -> EnergyScores {
        let mut weight = BASE_WEIGHT;
        if important {
            weight += IMPORTANT_WEIGHT;
        }
        if urgent {
            weight += URGENT_WEIGHT;
        }

        let mut scores = EnergyScores::default();
        for task in tasks {
            for category in self.matches(&task.label) {
                *scores.slot_mut(category) += weight;
            }
        }
        scores
    }
}

/// Energy of one slot using the built-in keyword table.
pub fn compute_entry_energy(tasks: &[Task], important: bool, urgent: bool) -> EnergyScores {
    DEFAULT_CLASSIFIER.score(tasks, important, urgent)
}

/// The strongest category, or `None` when nothing scored at all.
pub fn dominant_category(scores: &EnergyScores) -> Option<EnergyCategory> {
    let max = scores
        .iter()
        .map(|(_, score)| score)
        .fold(0., f64::max);
    if max == 0. {
        return None;
    }
    scores
        .iter()
        .find(|(_, score)| *score == max)
        .map(|(category, _)| category)
}

#[cfg(test)]
mod tests {
    use crate::journal::entities::Task;

    use super::{
        compute_entry_energy, dominant_category, EnergyCategory, EnergyClassifier, EnergyScores,
    };

    fn tasks(labels: &[&str]) -> Vec<Task> {
        labels.iter().map(|v| Task::new(v)).collect()
    }

    #[test]
    fn single_physical_task() {
        let scores = compute_entry_energy(&tasks(&["gym"]), false, false);
        assert_eq!(
            scores,
            EnergyScores {
                physical: 1.,
                ..Default::default()
            }
        );
        assert_eq!(dominant_category(&scores), Some(EnergyCategory::Physical));
    }

    #[test]
    fn several_keywords_count_once_per_category() {
        let scores = compute_entry_energy(&tasks(&["Study DSA"]), true, true);
        assert_eq!(scores.mental, 2.);
        assert_eq!(scores.physical, 0.);
        assert_eq!(scores.emotional, 0.);
        assert_eq!(scores.spiritual, 0.);
    }

    #[test]
    fn task_can_hit_several_categories() {
        let scores = compute_entry_energy(&tasks(&["walk and talk with family"]), true, false);
        assert_eq!(scores.physical, 1.5);
        assert_eq!(scores.emotional, 1.5);
        assert_eq!(scores.mental, 0.);
    }

    #[test]
    fn matching_ignores_case_and_padding() {
        let task = Task {
            id: "1".into(),
            label: "   MEDITATE   ".into(),
        };
        let scores = compute_entry_energy(&[task], false, true);
        assert_eq!(scores.spiritual, 1.5);
    }

    #[test]
    fn substrings_match_inside_words() {
        // "running" contains "run", "breadth" contains "read"
        let scores = compute_entry_energy(&tasks(&["running", "breadth first search"]), false, false);
        assert_eq!(scores.physical, 1.);
        assert_eq!(scores.mental, 1.);
    }

    #[test]
    fn no_tasks_means_no_energy() {
        let scores = compute_entry_energy(&[], true, true);
        assert!(scores.is_empty());
        assert_eq!(dominant_category(&scores), None);
    }

    #[test]
    fn unmatched_tasks_have_no_dominant() {
        let scores = compute_entry_energy(&tasks(&["nap", "groceries"]), true, false);
        assert!(scores.is_empty());
        assert_eq!(scores.dominant(), None);
    }

    #[test]
    fn dominant_ties_follow_declaration_order() {
        let scores = EnergyScores {
            physical: 0.,
            mental: 2.,
            emotional: 2.,
            spiritual: 2.,
        };
        assert_eq!(dominant_category(&scores), Some(EnergyCategory::Mental));

        let scores = EnergyScores {
            spiritual: 3.5,
            physical: 3.5,
            ..Default::default()
        };
        assert_eq!(dominant_category(&scores), Some(EnergyCategory::Physical));
    }

    #[test]
    fn sums_are_order_independent() {
        let a = compute_entry_energy(&tasks(&["gym", "call mom"]), true, false);
        let b = compute_entry_energy(&tasks(&["lecture"]), false, true);
        let c = compute_entry_energy(&tasks(&["church"]), true, true);
        assert_eq!((a + b) + c, a + (b + c));
        assert_eq!(a + b + c, c + b + a);
        assert_eq!([a, b, c].into_iter().sum::<EnergyScores>(), a + b + c);
    }

    #[test]
    fn classifier_can_be_extended() {
        let mut classifier = EnergyClassifier::default();
        assert!(classifier.score(&tasks(&["rust"]), false, false).is_empty());

        classifier.extend(EnergyCategory::Mental, ["Rust".to_string(), " ".to_string()]);
        assert_eq!(classifier.score(&tasks(&["rust book"]), false, false).mental, 1.);
        assert_eq!(classifier.keywords(EnergyCategory::Mental).last().unwrap(), "rust");
    }

    #[test]
    fn custom_table_only_knows_its_categories() {
        let classifier = EnergyClassifier::new([(EnergyCategory::Spiritual, vec!["yoga".into()])]);
        let scores = classifier.score(&tasks(&["yoga", "gym"]), false, false);
        assert_eq!(scores.spiritual, 1.);
        assert_eq!(scores.physical, 0.);
        assert!(classifier.keywords(EnergyCategory::Physical).is_empty());
    }
}
