#[cfg(test)]
pub mod fixtures {
    use chrono::{DateTime, Utc};

    use crate::models::domain::{
        project::{ExtensionCount, KeyFile},
        GeneratedQuestion, Project, ProjectProfile, Question, QuestionSource, QuestionType,
        ReviewState, ScheduledQuestion,
    };

    /// A small Rust project profile with two key files
    pub fn sample_profile() -> ProjectProfile {
        ProjectProfile {
            project_name: "demo".to_string(),
            tech: vec!["Rust".to_string(), "Actix".to_string()],
            concepts: vec!["async".to_string(), "caching".to_string()],
            top_extensions: vec![ExtensionCount {
                ext: ".rs".to_string(),
                count: 14,
            }],
            file_count: 18,
            key_files: vec![
                KeyFile {
                    path: "src/main.rs".to_string(),
                    content: "fn main() {}".to_string(),
                },
                KeyFile {
                    path: "src/cache.rs".to_string(),
                    content: "pub struct Cache;".to_string(),
                },
            ],
        }
    }

    pub fn sample_project() -> Project {
        Project::new("demo", "/home/dev/demo", sample_profile())
    }

    pub fn generated_question(question_type: QuestionType, answer: &str) -> GeneratedQuestion {
        GeneratedQuestion {
            question_type,
            difficulty: 3,
            source: QuestionSource::Project,
            question: "What does the cache do?".to_string(),
            choices: match question_type {
                QuestionType::SingleChoice => Some(vec![
                    "A) Stores sessions".to_string(),
                    "B) Memoizes lookups".to_string(),
                    "C) Logs requests".to_string(),
                    "D) Nothing".to_string(),
                ]),
                _ => None,
            },
            answer: answer.to_string(),
            explanation: Some("See src/cache.rs".to_string()),
            file_path: Some("src/cache.rs".to_string()),
            code_snippet: None,
        }
    }

    pub fn sample_question(project_id: &str, question_type: QuestionType, answer: &str) -> Question {
        Question::from_generated(project_id, generated_question(question_type, answer))
    }

    /// A question paired with a fresh schedule due at `now`
    pub fn scheduled(question: Question, now: DateTime<Utc>) -> ScheduledQuestion {
        let review = ReviewState::new(&question.id, &question.project_id, now);
        ScheduledQuestion { question, review }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::QuestionType;

    #[test]
    fn sample_project_carries_profile() {
        let project = sample_project();
        assert_eq!(project.profile.key_files.len(), 2);
        assert_eq!(project.profile.project_name, "demo");
    }

    #[test]
    fn single_choice_fixture_has_four_choices() {
        let question = sample_question("p-1", QuestionType::SingleChoice, "B");
        assert_eq!(question.choices.map(|c| c.len()), Some(4));
    }
}
