use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    constants::question_prompt::QUESTION_GENERATOR_PROMPT,
    errors::{AppError, AppResult},
    models::{
        domain::{Question, ReviewState, ScheduledQuestion},
        dto::{request::GenerateQuestionsRequest, response::GenerateQuestionsResponse},
    },
    repositories::{ProjectRepository, QuestionRepository},
    services::{
        model_service::CompletionModel, prompt_builder::build_question_prompt,
        question_parser::parse_questions,
    },
};

pub struct QuestionService {
    projects: Arc<dyn ProjectRepository>,
    questions: Arc<dyn QuestionRepository>,
    model: Arc<dyn CompletionModel>,
    max_questions_per_generation: u32,
}

impl QuestionService {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        questions: Arc<dyn QuestionRepository>,
        model: Arc<dyn CompletionModel>,
        max_questions_per_generation: u32,
    ) -> Self {
        Self {
            projects,
            questions,
            model,
            max_questions_per_generation,
        }
    }

    /// Asks the model for a batch of questions and stores every recovered
    /// one with a fresh schedule. Nothing is stored when the model call fails
    /// or yields no usable questions.
    pub async fn generate_questions(
        &self,
        project_id: &str,
        request: GenerateQuestionsRequest,
    ) -> AppResult<GenerateQuestionsResponse> {
        request.validate()?;

        if request.count > self.max_questions_per_generation {
            return Err(AppError::ValidationError(format!(
                "Count must be at most {}, got {}",
                self.max_questions_per_generation, request.count
            )));
        }

        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Project with id '{}' not found", project_id))
            })?;

        let prompt = build_question_prompt(&project.profile, request.count, request.mode);
        log::info!(
            "Generating {} {:?} questions for project '{}'",
            request.count,
            request.mode,
            project.name
        );

        let raw = self
            .model
            .complete(QUESTION_GENERATOR_PROMPT, &prompt)
            .await
            .inspect_err(|e| log::error!("Question generation failed: {}", e))?;

        let parsed = parse_questions(&raw);
        if parsed.is_empty() {
            log::warn!(
                "Model output for project '{}' held no usable questions ({} chars)",
                project.name,
                raw.len()
            );
            return Err(AppError::UpstreamError(
                "no valid questions produced, try again".to_string(),
            ));
        }
        log::debug!("Recovered {} questions from model output", parsed.len());

        let now = Utc::now();
        let batch: Vec<ScheduledQuestion> = parsed
            .into_iter()
            .take(request.count as usize)
            .map(|generated| {
                let question = Question::from_generated(&project.id, generated);
                let review = ReviewState::new(&question.id, &question.project_id, now);
                ScheduledQuestion { question, review }
            })
            .collect();

        let questions: Vec<Question> = batch.iter().map(|item| item.question.clone()).collect();
        let inserted = self.questions.insert_batch(batch).await?;

        log::info!("Stored {} new questions for project '{}'", inserted, project.name);

        Ok(GenerateQuestionsResponse {
            inserted: inserted as u32,
            questions,
        })
    }

    pub async fn list_questions(&self, project_id: &str) -> AppResult<Vec<ScheduledQuestion>> {
        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Project with id '{}' not found",
                project_id
            )));
        }

        self.questions.list_by_project(project_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::{GenerationMode, QuestionType},
        repositories::{
            project_repository::MockProjectRepository,
            question_repository::MockQuestionRepository,
        },
        services::model_service::MockCompletionModel,
        test_utils::fixtures::sample_project,
    };

    const TWO_QUESTIONS: &str = r#"```json
[
  {"type":"true-false","difficulty":2,"source":"project","question":"Cache is LRU?","answer":"false"},
  {"type":"open","question":"Why does eviction matter?","answer":"Stale entries are removed"}
]
```"#;

    fn projects_with_sample() -> (MockProjectRepository, String) {
        let project = sample_project();
        let id = project.id.clone();
        let mut projects = MockProjectRepository::new();
        projects
            .expect_find_by_id()
            .returning(move |_| Ok(Some(project.clone())));
        (projects, id)
    }

    fn model_returning(text: &'static str) -> MockCompletionModel {
        let mut model = MockCompletionModel::new();
        model
            .expect_complete()
            .times(1)
            .returning(move |_, _| Ok(text.to_string()));
        model
    }

    fn request(count: u32) -> GenerateQuestionsRequest {
        GenerateQuestionsRequest {
            count,
            mode: GenerationMode::Mixed,
        }
    }

    #[tokio::test]
    async fn generate_stores_parsed_questions_with_fresh_schedules() {
        let (projects, project_id) = projects_with_sample();
        let mut questions = MockQuestionRepository::new();
        let expected_project = project_id.clone();
        questions
            .expect_insert_batch()
            .times(1)
            .withf(move |batch| {
                batch.len() == 2
                    && batch.iter().all(|item| {
                        item.question.project_id == expected_project
                            && item.review.question_id == item.question.id
                            && item.review.repetitions == 0
                            && item.review.interval_days == 0
                    })
            })
            .returning(|batch| Ok(batch.len()));

        let service = QuestionService::new(
            Arc::new(projects),
            Arc::new(questions),
            Arc::new(model_returning(TWO_QUESTIONS)),
            20,
        );

        let response = service
            .generate_questions(&project_id, request(5))
            .await
            .expect("generation should succeed");

        assert_eq!(response.inserted, 2);
        assert_eq!(response.questions[0].question_type, QuestionType::TrueFalse);
        assert_eq!(response.questions[1].difficulty, 3);
    }

    #[tokio::test]
    async fn generate_truncates_to_requested_count() {
        let (projects, project_id) = projects_with_sample();
        let mut questions = MockQuestionRepository::new();
        questions
            .expect_insert_batch()
            .withf(|batch| batch.len() == 1)
            .returning(|batch| Ok(batch.len()));

        let service = QuestionService::new(
            Arc::new(projects),
            Arc::new(questions),
            Arc::new(model_returning(TWO_QUESTIONS)),
            20,
        );

        let response = service
            .generate_questions(&project_id, request(1))
            .await
            .expect("generation should succeed");

        assert_eq!(response.inserted, 1);
        assert_eq!(response.questions.len(), 1);
    }

    #[tokio::test]
    async fn unusable_output_is_an_upstream_error_and_stores_nothing() {
        let (projects, project_id) = projects_with_sample();
        let mut questions = MockQuestionRepository::new();
        questions.expect_insert_batch().never();

        let service = QuestionService::new(
            Arc::new(projects),
            Arc::new(questions),
            Arc::new(model_returning("Sorry, I cannot help with that.")),
            20,
        );

        let result = service.generate_questions(&project_id, request(3)).await;

        assert!(matches!(result, Err(AppError::UpstreamError(_))));
    }

    #[tokio::test]
    async fn model_failure_leaves_bank_untouched() {
        let (projects, project_id) = projects_with_sample();
        let mut questions = MockQuestionRepository::new();
        questions.expect_insert_batch().never();
        let mut model = MockCompletionModel::new();
        model
            .expect_complete()
            .returning(|_, _| Err(AppError::UpstreamError("connection reset".to_string())));

        let service = QuestionService::new(
            Arc::new(projects),
            Arc::new(questions),
            Arc::new(model),
            20,
        );

        let result = service.generate_questions(&project_id, request(3)).await;

        assert!(matches!(result, Err(AppError::UpstreamError(_))));
    }

    #[tokio::test]
    async fn count_above_limit_is_rejected_before_calling_the_model() {
        let mut model = MockCompletionModel::new();
        model.expect_complete().never();

        let service = QuestionService::new(
            Arc::new(MockProjectRepository::new()),
            Arc::new(MockQuestionRepository::new()),
            Arc::new(model),
            10,
        );

        let result = service.generate_questions("p-1", request(11)).await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn unknown_project_is_not_found() {
        let mut projects = MockProjectRepository::new();
        projects.expect_find_by_id().returning(|_| Ok(None));

        let service = QuestionService::new(
            Arc::new(projects),
            Arc::new(MockQuestionRepository::new()),
            Arc::new(MockCompletionModel::new()),
            20,
        );

        let result = service.generate_questions("missing", request(3)).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
