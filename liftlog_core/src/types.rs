//! Core domain types for the workout log.
//!
//! This module defines:
//! - Workout records and their strength sets
//! - The derived statistics report

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Workout Records
// ============================================================================

/// A single strength set: `reps` repetitions at `weight`.
///
/// Weight is unit-agnostic; the client decides whether it logs kilograms or
/// pounds and the log never converts between them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetEntry {
    pub reps: i32,
    pub weight: f64,
}

impl SetEntry {
    pub fn new(reps: i32, weight: f64) -> Self {
        Self { reps, weight }
    }

    /// Training volume of this set (`reps * weight`)
    pub fn volume(&self) -> f64 {
        f64::from(self.reps) * self.weight
    }

    /// Epley estimate of the one-rep max: `weight * (1 + reps / 30)`
    pub fn estimated_one_rep_max(&self) -> f64 {
        self.weight * (1.0 + f64::from(self.reps) / 30.0)
    }
}

/// A logged workout, either strength (sets) or cardio (duration in minutes).
///
/// Records are immutable once admitted; the store only ever appends them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutRecord {
    /// ISO 8601 calendar date, `YYYY-MM-DD`
    pub date: String,
    pub exercise: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<Vec<SetEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
}

impl WorkoutRecord {
    pub fn strength(
        date: impl Into<String>,
        exercise: impl Into<String>,
        sets: Vec<SetEntry>,
    ) -> Self {
        Self {
            date: date.into(),
            exercise: exercise.into(),
            sets: Some(sets),
            duration: None,
        }
    }

    pub fn cardio(date: impl Into<String>, exercise: impl Into<String>, minutes: i32) -> Self {
        Self {
            date: date.into(),
            exercise: exercise.into(),
            sets: None,
            duration: Some(minutes),
        }
    }

    /// Strength sets of this record; empty for cardio-only records
    pub fn strength_sets(&self) -> &[SetEntry] {
        self.sets.as_deref().unwrap_or_default()
    }

    pub fn has_sets(&self) -> bool {
        !self.strength_sets().is_empty()
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Total volume lifted on one calendar date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyVolume {
    pub date: String,
    pub volume: f64,
}

/// Aggregate view over the whole log, recomputed on every request
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub weekly_volume: f64,
    pub monthly_volume: f64,
    pub best_one_rep_max: BTreeMap<String, f64>,
    pub daily_volumes: Vec<DailyVolume>,
}
