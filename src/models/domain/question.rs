use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;
pub const DEFAULT_DIFFICULTY: u8 = 3;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String, // Assigned on creation, never changes
    pub project_id: String,
    #[serde(rename = "type")]
    #[graphql(name = "type")]
    pub question_type: QuestionType,
    pub difficulty: u8,
    pub source: QuestionSource,
    pub question: String,
    pub choices: Option<Vec<String>>, // Single-choice only
    pub answer: String,
    pub explanation: Option<String>,
    pub file_path: Option<String>,
    pub code_snippet: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Enum, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    SingleChoice, // Four lettered choices, answer is a letter
    TrueFalse,    // Answer is "true" or "false"
    Open,         // Free text, fuzzy graded
    FindTheBug,   // Free text about a snippet, fuzzy graded
}

impl QuestionType {
    /// Parses the wire name; anything unrecognised is `None`.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "single-choice" => Some(QuestionType::SingleChoice),
            "true-false" => Some(QuestionType::TrueFalse),
            "open" => Some(QuestionType::Open),
            "find-the-bug" => Some(QuestionType::FindTheBug),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Enum, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum QuestionSource {
    Project, // References the scanned code
    General, // General knowledge about a detected technology
}

/// Which kind of questions a generation run asks the model for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Mixed,
    Project,
    General,
}

/// A validated question recovered from model output, before it is given an
/// identity and attached to a project.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// 1 (trivia) to 5 (deep understanding)
    pub difficulty: u8,
    pub source: QuestionSource,
    pub question: String,
    /// Exactly four entries prefixed "A) ".."D) " for single-choice questions
    pub choices: Option<Vec<String>>,
    /// A letter for single-choice, "true"/"false" for true-false, prose otherwise
    pub answer: String,
    pub explanation: Option<String>,
    pub file_path: Option<String>,
    pub code_snippet: Option<String>,
}

impl Question {
    pub fn from_generated(project_id: &str, generated: GeneratedQuestion) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            question_type: generated.question_type,
            difficulty: generated.difficulty,
            source: generated.source,
            question: generated.question,
            choices: generated.choices,
            answer: generated.answer,
            explanation: generated.explanation,
            file_path: generated.file_path,
            code_snippet: generated.code_snippet,
            created_at: Utc::now(),
        }
    }
}
