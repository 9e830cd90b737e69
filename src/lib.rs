//! Half-hour time-log journal. Every day is split into fixed half-hour slots, each slot holds the
//! tasks done during it plus important/urgent flags, and the analytics turn a day (or the last
//! week) into an energy profile and an Important/Urgent matrix.
//!

pub mod analytics;
pub mod cli;
pub mod journal;
pub mod utils;
