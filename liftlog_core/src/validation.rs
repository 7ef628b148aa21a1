//! Admission rules for submitted workouts.
//!
//! A request body is first decoded into a [`WorkoutDraft`] whose fields are
//! all optional, then checked rule by rule. Only a draft that passes every
//! rule becomes a [`WorkoutRecord`].

use crate::{SetEntry, ValidationError, WorkoutRecord};
use serde::{Deserialize, Serialize};

/// A strength set as submitted; missing numbers decode as zero
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SetDraft {
    #[serde(default)]
    pub reps: i32,
    #[serde(default)]
    pub weight: f64,
}

/// A decoded but not yet validated workout submission
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkoutDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<Vec<SetDraft>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
}

impl WorkoutDraft {
    /// Decode a request body.
    ///
    /// Returns `None` for an empty body, the JSON literal `null`, or anything
    /// that does not match the workout shape.
    pub fn from_body(body: &str) -> Option<Self> {
        if body.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<Option<WorkoutDraft>>(body) {
            Ok(draft) => draft,
            Err(e) => {
                tracing::debug!("Rejecting undecodable workout body: {}", e);
                None
            }
        }
    }

    /// Validate and convert into an immutable record
    pub fn into_record(self) -> Result<WorkoutRecord, ValidationError> {
        validate(Some(&self))?;

        let sets = self
            .sets
            .filter(|sets| !sets.is_empty())
            .map(|sets| {
                sets.into_iter()
                    .map(|s| SetEntry::new(s.reps, s.weight))
                    .collect()
            });

        Ok(WorkoutRecord {
            date: self.date.unwrap_or_default(),
            exercise: self.exercise.unwrap_or_default(),
            sets,
            duration: self.duration,
        })
    }
}

/// Check a submission against the admission rules.
///
/// Rules run in order and the first failure is returned.
pub fn validate(draft: Option<&WorkoutDraft>) -> Result<(), ValidationError> {
    let draft = draft.ok_or(ValidationError::BodyMissing)?;

    if is_blank(draft.date.as_deref()) {
        return Err(ValidationError::DateRequired);
    }
    if is_blank(draft.exercise.as_deref()) {
        return Err(ValidationError::ExerciseRequired);
    }

    let sets = draft.sets.as_deref().unwrap_or_default();
    let has_duration = draft.duration.is_some_and(|minutes| minutes > 0);
    if sets.is_empty() && !has_duration {
        return Err(ValidationError::NoSetsOrDuration);
    }

    for set in sets {
        if set.reps <= 0 {
            return Err(ValidationError::NonPositiveReps);
        }
        if set.weight < 0.0 {
            return Err(ValidationError::NegativeWeight);
        }
    }

    Ok(())
}

/// Decode and validate a request body in one step
pub fn parse_submission(body: &str) -> Result<WorkoutRecord, ValidationError> {
    WorkoutDraft::from_body(body)
        .ok_or(ValidationError::BodyMissing)?
        .into_record()
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |s| s.trim().is_empty())
}
