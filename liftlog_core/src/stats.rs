//! Statistics engine.
//!
//! Turns the full workout log into a [`StatsReport`]:
//! - Volume per calendar date (strength records only)
//! - Best Epley one-rep max per exercise, across all history
//! - Rolling 7-day and 30-day volume anchored at a reference date
//!
//! Everything here is pure. The reference date is passed in by the caller so
//! results are reproducible.

use crate::{DailyVolume, StatsReport, WorkoutRecord};
use chrono::{Duration, NaiveDate};
use std::collections::{BTreeMap, HashMap};

/// Days covered by the weekly window, including the reference date
pub const WEEKLY_WINDOW_DAYS: i64 = 7;

/// Days covered by the monthly window, including the reference date
pub const MONTHLY_WINDOW_DAYS: i64 = 30;

/// Compute the statistics report for `records` as seen on `today`
pub fn compute(records: &[WorkoutRecord], today: NaiveDate) -> StatsReport {
    let volume_by_date = volume_by_date(records);
    let best = best_one_rep_max(records);

    let daily_volumes = volume_by_date
        .iter()
        .map(|(date, volume)| DailyVolume {
            date: date.clone(),
            volume: round1(*volume),
        })
        .collect();

    let weekly_start = window_start(today, WEEKLY_WINDOW_DAYS);
    let monthly_start = window_start(today, MONTHLY_WINDOW_DAYS);

    let mut weekly_volume = 0.0;
    let mut monthly_volume = 0.0;
    for (date, volume) in &volume_by_date {
        let Some(day) = parse_date(date) else {
            tracing::warn!("Skipping unparseable date {:?} in rolling volume", date);
            continue;
        };
        if in_window(day, weekly_start, today) {
            weekly_volume += volume;
        }
        if in_window(day, monthly_start, today) {
            monthly_volume += volume;
        }
    }

    tracing::debug!(
        "Computed stats over {} records ({} training days) as of {}",
        records.len(),
        volume_by_date.len(),
        today
    );

    StatsReport {
        weekly_volume: round1(weekly_volume),
        monthly_volume: round1(monthly_volume),
        best_one_rep_max: best
            .into_iter()
            .map(|(exercise, one_rm)| (exercise, round1(one_rm)))
            .collect(),
        daily_volumes,
    }
}

/// Summed volume per date string, ordered by date.
///
/// ISO dates sort chronologically as strings. Dates that do not parse are
/// kept and sort wherever their text falls.
fn volume_by_date(records: &[WorkoutRecord]) -> BTreeMap<String, f64> {
    let mut by_date: BTreeMap<String, f64> = BTreeMap::new();
    for record in records.iter().filter(|r| r.has_sets()) {
        let record_volume: f64 = record.strength_sets().iter().map(|s| s.volume()).sum();
        *by_date.entry(record.date.clone()).or_insert(0.0) += record_volume;
    }
    by_date
}

/// Highest unrounded one-rep max estimate seen for each exercise
fn best_one_rep_max(records: &[WorkoutRecord]) -> HashMap<String, f64> {
    let mut best: HashMap<String, f64> = HashMap::new();
    for record in records {
        for set in record.strength_sets() {
            let estimate = set.estimated_one_rep_max();
            best.entry(record.exercise.clone())
                .and_modify(|current| *current = current.max(estimate))
                .or_insert(estimate);
        }
    }
    best
}

/// First day of a window of `days` days ending on `today`.
///
/// `None` when the window reaches past the earliest representable date, in
/// which case it has no lower bound.
fn window_start(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    today.checked_sub_signed(Duration::days(days - 1))
}

fn in_window(day: NaiveDate, start: Option<NaiveDate>, today: NaiveDate) -> bool {
    start.map_or(true, |start| day >= start) && day <= today
}

/// Parse a stored date in strict `YYYY-MM-DD` form.
///
/// Only the zero-padded ten-character form is accepted, so every parsed date
/// string is canonical and string order matches calendar order.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    let canonical = date.len() == 10
        && date.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !canonical {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Round half-up to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}
