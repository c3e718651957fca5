use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{ReviewState, Session},
        dto::{
            request::{CompleteSessionRequest, DueQuestionsQuery, SubmitAnswerRequest},
            response::{AnswerResult, DueQuestionsResponse, SessionStats, SettingsResponse},
        },
    },
    repositories::{ProjectRepository, QuestionRepository, SessionRepository},
    services::{answer_grader, review_scheduler},
};

/// Serves due batches, grades answers into the schedule and closes sessions.
pub struct SessionService {
    projects: Arc<dyn ProjectRepository>,
    questions: Arc<dyn QuestionRepository>,
    sessions: Arc<dyn SessionRepository>,
    questions_per_session: u32,
    max_questions_per_generation: u32,
}

impl SessionService {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        questions: Arc<dyn QuestionRepository>,
        sessions: Arc<dyn SessionRepository>,
        questions_per_session: u32,
        max_questions_per_generation: u32,
    ) -> Self {
        Self {
            projects,
            questions,
            sessions,
            questions_per_session,
            max_questions_per_generation,
        }
    }

    /// Opens a session over the questions due now. No session is created
    /// when nothing is due.
    pub async fn get_due_questions(
        &self,
        query: DueQuestionsQuery,
    ) -> AppResult<DueQuestionsResponse> {
        let limit = query.limit.unwrap_or(self.questions_per_session);
        if limit == 0 {
            return Err(AppError::ValidationError(
                "Limit must be at least 1".to_string(),
            ));
        }

        if let Some(project_id) = query.project_id.as_deref() {
            if self.projects.find_by_id(project_id).await?.is_none() {
                return Err(AppError::NotFound(format!(
                    "Project with id '{}' not found",
                    project_id
                )));
            }
        }

        let due = self
            .questions
            .find_due(Utc::now(), limit, query.project_id.clone())
            .await?;

        if due.is_empty() {
            log::debug!("No questions due for {:?}", query.project_id);
            return Ok(DueQuestionsResponse {
                session_id: None,
                questions: due,
            });
        }

        let question_ids = due.iter().map(|item| item.question.id.clone()).collect();
        let session = self
            .sessions
            .create(Session::start(query.project_id.as_deref(), question_ids))
            .await?;

        log::info!(
            "Started session {} with {} due questions",
            session.id,
            due.len()
        );

        Ok(DueQuestionsResponse {
            session_id: Some(session.id),
            questions: due,
        })
    }

    /// Grades one answer and reschedules the question. Works whether or not
    /// the question is still part of a due batch.
    pub async fn submit_answer(
        &self,
        question_id: &str,
        request: SubmitAnswerRequest,
    ) -> AppResult<AnswerResult> {
        let question = self
            .questions
            .find_by_id(question_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Question with id '{}' not found", question_id))
            })?;

        let now = Utc::now();
        let current = match self.questions.find_review_state(question_id).await? {
            Some(state) => state,
            None => {
                log::warn!(
                    "No review state for question {}, starting from defaults",
                    question_id
                );
                ReviewState::new(&question.id, &question.project_id, now)
            }
        };

        let outcome = answer_grader::grade(&question, &request.response);
        let quality = answer_grader::to_quality(outcome.is_correct, request.confidence_bonus);
        let next = review_scheduler::next_state(&current, quality, now);
        let review = self.questions.save_review_state(next).await?;

        log::debug!(
            "Answer for question {} in session {:?}: correct={} quality={} next review in {} days",
            question_id,
            request.session_id,
            outcome.is_correct,
            quality,
            review.interval_days
        );

        Ok(AnswerResult {
            question_id: question.id,
            is_correct: outcome.is_correct,
            quality,
            correct_answer: question.answer,
            explanation: question.explanation,
            review,
        })
    }

    /// Records the final score of a session and reports the aggregate
    /// stats for its scope. A session can be completed once.
    pub async fn complete_session(
        &self,
        session_id: &str,
        request: CompleteSessionRequest,
    ) -> AppResult<SessionStats> {
        request.validate()?;

        if request.correct > request.total {
            return Err(AppError::ValidationError(format!(
                "Correct count {} exceeds total {}",
                request.correct, request.total
            )));
        }

        let completed = self
            .sessions
            .complete(session_id, request.correct, request.total, Utc::now())
            .await?;

        let session = match completed {
            Some(session) => session,
            None => {
                return match self.sessions.find_by_id(session_id).await? {
                    Some(_) => Err(AppError::Conflict(format!(
                        "Session '{}' is already completed",
                        session_id
                    ))),
                    None => Err(AppError::NotFound(format!(
                        "Session with id '{}' not found",
                        session_id
                    ))),
                };
            }
        };

        log::info!(
            "Completed session {}: {}/{} correct",
            session.id,
            session.correct_count,
            session.total_count
        );

        self.stats_for(&session).await
    }

    pub fn settings(&self) -> SettingsResponse {
        SettingsResponse {
            questions_per_session: self.questions_per_session,
            max_questions_per_generation: self.max_questions_per_generation,
        }
    }

    async fn stats_for(&self, session: &Session) -> AppResult<SessionStats> {
        let now = Utc::now();
        let scope = session.project_id.clone();

        let completed = self.sessions.list_completed(scope.clone()).await?;
        let questions_answered: u64 = completed.iter().map(|s| s.total_count as u64).sum();
        let correct_answers: u64 = completed.iter().map(|s| s.correct_count as u64).sum();

        let questions_in_bank = self.questions.count_questions(scope.clone()).await?;
        let due_now = self.questions.count_due(now, scope).await?;

        Ok(SessionStats {
            session_id: session.id.clone(),
            completed_at: session.completed_at.unwrap_or(now),
            sessions_completed: completed.len() as u64,
            questions_answered,
            correct_answers,
            accuracy: accuracy(correct_answers, questions_answered),
            questions_in_bank,
            due_now,
        })
    }
}

fn accuracy(correct: u64, answered: u64) -> f64 {
    if answered == 0 {
        0.0
    } else {
        correct as f64 / answered as f64
    }
}
