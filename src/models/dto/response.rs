use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Question, ReviewState, ScheduledQuestion};

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsResponse {
    pub inserted: u32,
    pub questions: Vec<Question>,
}

/// A served batch. `session_id` is absent when nothing was due.
#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct DueQuestionsResponse {
    pub session_id: Option<String>,
    pub questions: Vec<ScheduledQuestion>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub question_id: String,
    pub is_correct: bool,
    pub quality: i32,
    pub correct_answer: String,
    pub explanation: Option<String>,
    pub review: ReviewState,
}

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub session_id: String,
    pub completed_at: DateTime<Utc>,
    pub sessions_completed: u64,
    pub questions_answered: u64,
    pub correct_answers: u64,
    /// Share of answered questions that were correct, 0.0 when none were.
    pub accuracy: f64,
    pub questions_in_bank: u64,
    pub due_now: u64,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub questions_per_session: u32,
    pub max_questions_per_generation: u32,
}
