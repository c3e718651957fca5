use async_graphql::SimpleObject;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Scheduling state for one question, keyed by `question_id`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    pub question_id: String,
    pub project_id: String,
    pub ease_factor: f64,
    pub interval_days: u32,
    pub repetitions: u32, // Consecutive reviews graded 3 or better
    pub next_review_at: DateTime<Utc>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl ReviewState {
    /// Fresh state for a newly created question; due immediately.
    pub fn new(question_id: &str, project_id: &str, now: DateTime<Utc>) -> Self {
        ReviewState {
            question_id: question_id.to_string(),
            project_id: project_id.to_string(),
            ease_factor: DEFAULT_EASE_FACTOR,
            interval_days: 0,
            repetitions: 0,
            next_review_at: now.trunc_subsecs(0),
            last_reviewed_at: None,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_review_at
    }
}
