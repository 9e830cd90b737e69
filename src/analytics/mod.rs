//! Analytics derived from journal entries.
//!
//! [energy] and [matrix] are pure and independent of each other. [summary] combines them the way
//! the `today` and `week` commands present a day or a trailing window of days.

pub mod energy;
pub mod matrix;
pub mod summary;
