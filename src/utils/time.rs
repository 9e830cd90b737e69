use chrono::{Days, NaiveDate};


/// This is the standard way of converting a date to a journal file name in halfhour.
pub fn date_to_record_name(date: NaiveDate) -> String {
    format!("{}.json", date.format("%Y-%m-%d"))
}

/// Returns `days` dates ending at `end` (inclusive), most recent first.
pub fn trailing_days(end: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days as u64)
        .map_while(|offset| end.checked_sub_days(Days::new(offset)))
        .collect()
}
