use std::sync::Arc;

use crate::{
    config::Config,
    db::{Database, HealthCheck},
    errors::AppResult,
    repositories::{
        MongoProjectRepository, MongoQuestionRepository, MongoSessionRepository,
        ProjectRepository, QuestionRepository, SessionRepository,
    },
    services::{
        model_service::{CompletionModel, OpenAiCompletionModel},
        ProjectService, QuestionService, SessionService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub project_service: Arc<ProjectService>,
    pub question_service: Arc<QuestionService>,
    pub session_service: Arc<SessionService>,
    pub db: Arc<dyn HealthCheck>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let project_repository = MongoProjectRepository::new(&db);
        project_repository.ensure_indexes().await?;

        let question_repository = MongoQuestionRepository::new(&db);
        question_repository.ensure_indexes().await?;

        let session_repository = MongoSessionRepository::new(&db);
        session_repository.ensure_indexes().await?;

        log::info!("Repositories ready on database '{}'", db.db_name());

        let model = Arc::new(OpenAiCompletionModel::new(&config));

        Ok(Self::from_parts(
            config,
            Arc::new(project_repository),
            Arc::new(question_repository),
            Arc::new(session_repository),
            model,
            Arc::new(db),
        ))
    }

    /// Wires services over the given storage and model backends.
    pub fn from_parts(
        config: Config,
        projects: Arc<dyn ProjectRepository>,
        questions: Arc<dyn QuestionRepository>,
        sessions: Arc<dyn SessionRepository>,
        model: Arc<dyn CompletionModel>,
        db: Arc<dyn HealthCheck>,
    ) -> Self {
        let project_service = Arc::new(ProjectService::new(projects.clone()));
        let question_service = Arc::new(QuestionService::new(
            projects.clone(),
            questions.clone(),
            model,
            config.max_questions_per_generation,
        ));
        let session_service = Arc::new(SessionService::new(
            projects,
            questions,
            sessions,
            config.questions_per_session,
            config.max_questions_per_generation,
        ));

        Self {
            project_service,
            question_service,
            session_service,
            db,
            config: Arc::new(config),
        }
    }
}
