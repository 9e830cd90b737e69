/// Whole-number share of `part` in `whole`. Halves are rounded away from zero, so 12.5 becomes 13.
/// Returns 0 when `whole` is 0.
pub fn rounded_percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.).round() as u32
}

/// Position of the largest value. On ties the earliest position wins.
pub fn first_largest(values: &[u32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, u32)>, (index, &value)| match best {
            Some((_, best_value)) if best_value >= value => best,
            _ => Some((index, value)),
        })
        .map(|(index, _)| index)
}
