use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One quiz-taking episode. Created when a due batch is served and completed
/// exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub project_id: Option<String>, // None for the cross-project daily quiz
    pub question_ids: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub correct_count: u32,
    pub total_count: u32,
}

impl Session {
    pub fn start(project_id: Option<&str>, question_ids: Vec<String>) -> Self {
        Session {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.map(str::to_string),
            question_ids,
            started_at: Utc::now(),
            completed_at: None,
            correct_count: 0,
            total_count: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}
