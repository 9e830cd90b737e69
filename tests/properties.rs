use halfhour::{
    analytics::{
        energy::{compute_entry_energy, dominant_category, EnergyCategory, EnergyScores},
        matrix::{calculate_matrix, classify, interpret, Interpretation, Quadrant},
    },
    journal::entities::{LogEntry, Task},
};
use proptest::prelude::*;

const LABELS: [&str; 12] = [
    "gym",
    "Study DSA",
    "call family",
    "pray",
    "groceries",
    "walk and talk",
    "nap",
    "read bible",
    "debug prod",
    "commute",
    "laugh",
    "",
];

fn task() -> impl Strategy<Value = Task> {
    prop::sample::select(LABELS.to_vec()).prop_map(Task::new)
}

fn entry() -> impl Strategy<Value = LogEntry> {
    (
        prop::collection::vec(task(), 0..4),
        any::<bool>(),
        any::<bool>(),
        prop::option::of(prop::sample::select(vec!["home", "library", "gym"])),
    )
        .prop_map(|(tasks, important, urgent, place)| LogEntry {
            tasks,
            important,
            urgent,
            place: place.map(String::from),
        })
}

proptest! {
    #[test]
    fn classification_depends_only_on_flags(a in entry(), b in entry()) {
        let mut b = b;
        b.important = a.important;
        b.urgent = a.urgent;
        prop_assert_eq!(classify(&a), classify(&b));
    }

    #[test]
    fn percentages_add_up(entries in prop::collection::vec(entry(), 0..60)) {
        let stats = calculate_matrix(&entries);
        let logged = entries.iter().filter(|v| !v.tasks.is_empty()).count() as u32;
        prop_assert_eq!(stats.total, logged);
        prop_assert_eq!(stats.counts.sum(), stats.total);

        let sum = stats.percentages.sum();
        if stats.total > 0 {
            prop_assert_eq!(sum, 100);
        } else {
            prop_assert_eq!(sum, 0);
            prop_assert_eq!(interpret(&stats), Interpretation::NoData);
        }
        for quadrant in Quadrant::ALL {
            prop_assert!(stats.percentages.get(quadrant) <= 100);
        }
    }

    #[test]
    fn slots_without_tasks_have_no_data(
        flags in prop::collection::vec((any::<bool>(), any::<bool>()), 0..20)
    ) {
        let entries = flags
            .into_iter()
            .map(|(important, urgent)| LogEntry { important, urgent, ..Default::default() })
            .collect::<Vec<_>>();
        let stats = calculate_matrix(&entries);
        prop_assert_eq!(stats.total, 0);
        prop_assert_eq!(interpret(&stats), Interpretation::NoData);
    }

    #[test]
    fn energy_of_concatenation_is_the_sum(
        left in prop::collection::vec(task(), 0..5),
        right in prop::collection::vec(task(), 0..5),
        important in any::<bool>(),
        urgent in any::<bool>(),
    ) {
        let joined = left.iter().chain(right.iter()).cloned().collect::<Vec<_>>();
        prop_assert_eq!(
            compute_entry_energy(&joined, important, urgent),
            compute_entry_energy(&left, important, urgent)
                + compute_entry_energy(&right, important, urgent)
        );
    }

    #[test]
    fn dominant_is_none_only_without_energy(
        scores in prop::collection::vec(0u8..6, 4)
    ) {
        let scores = EnergyScores {
            physical: scores[0] as f64 / 2.,
            mental: scores[1] as f64 / 2.,
            emotional: scores[2] as f64 / 2.,
            spiritual: scores[3] as f64 / 2.,
        };
        let dominant = dominant_category(&scores);
        prop_assert_eq!(dominant.is_none(), scores.is_empty());
        if let Some(category) = dominant {
            let max = scores.iter().map(|(_, v)| v).fold(0., f64::max);
            prop_assert_eq!(scores.get(category), max);
            let first = EnergyCategory::ALL
                .into_iter()
                .find(|v| scores.get(*v) == max);
            prop_assert_eq!(Some(category), first);
        }
    }
}
