use async_graphql::InputObject;
use serde::Deserialize;
use validator::Validate;

use crate::{
    models::domain::{GenerationMode, ProjectProfile},
    services::answer_grader::UserResponse,
};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Project name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Folder path is required"))]
    pub path: String,

    #[serde(default)]
    pub profile: ProjectProfile,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsRequest {
    #[validate(range(min = 1, message = "Count must be at least 1"))]
    pub count: u32,

    #[serde(default)]
    #[graphql(default)]
    pub mode: GenerationMode,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueQuestionsQuery {
    pub limit: Option<u32>,
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    pub response: UserResponse,
    pub session_id: Option<String>,
    #[serde(default)]
    pub confidence_bonus: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
#[serde(rename_all = "camelCase")]
pub struct CompleteSessionRequest {
    pub correct: u32,
    /// Zero when the session ended before any answer.
    pub total: u32,
}
