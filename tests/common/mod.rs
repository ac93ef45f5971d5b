#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use pocket_ledger::{
    core::{ids::SequentialIds, time::FixedClock},
    storage::{JsonFileStorage, Persistence},
    FinanceTracker,
};
use tempfile::TempDir;

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2024, 12, 1, 9, 0, 0).unwrap(),
    ))
}

/// Tracker with deterministic ids and a frozen clock, kept in memory.
pub fn memory_tracker() -> FinanceTracker {
    FinanceTracker::with_services(
        Persistence::in_memory(),
        Arc::new(SequentialIds::new()),
        fixed_clock(),
    )
}

/// Persistence rooted in a fresh temporary directory. Keep the guard alive
/// for as long as the files are needed.
pub fn file_persistence() -> (Persistence, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let persistence = reopen(&temp);
    (persistence, temp)
}

pub fn reopen(temp: &TempDir) -> Persistence {
    let storage = JsonFileStorage::new(temp.path().to_path_buf()).expect("json storage");
    Persistence::new(Box::new(storage))
}
