#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use code_recall_server::{
    app_state::AppState,
    config::Config,
    db::HealthCheck,
    errors::{AppError, AppResult},
    models::domain::{
        project::KeyFile, Project, ProjectProfile, Question, ReviewState, ScheduledQuestion,
        Session,
    },
    repositories::{ProjectRepository, QuestionRepository, SessionRepository},
    services::model_service::CompletionModel,
};

pub const MODEL_OUTPUT: &str = r#"Here are your questions:
```json
[
  {"type":"single-choice","difficulty":2,"source":"project","question":"Which struct caches lookups?","choices":["A) Router","B) Cache","C) Logger","D) Config"],"answer":"B","filePath":"src/cache.rs"},
  {"type":"true-false","question":"Rust has a garbage collector.","answer":"false"},
  {"type":"open","difficulty":4,"question":"Why can the cache serve stale data?","answer":"The cache returns stale data because eviction never runs","explanation":"No TTL is configured."}
]
```"#;

pub struct InMemoryProjectRepository {
    projects: Arc<RwLock<HashMap<String, Project>>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self {
            projects: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn create(&self, project: Project) -> AppResult<Project> {
        let mut projects = self.projects.write().await;
        if projects.contains_key(&project.id) {
            return Err(AppError::AlreadyExists(format!(
                "Project with id '{}' already exists",
                project.id
            )));
        }

        projects.insert(project.id.clone(), project.clone());
        Ok(project)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.get(id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Project>> {
        let projects = self.projects.read().await;
        let mut items: Vec<_> = projects.values().cloned().collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(items)
    }
}

#[derive(Default)]
struct QuestionBank {
    questions: HashMap<String, Question>,
    states: HashMap<String, ReviewState>,
    order: Vec<String>,
}

pub struct InMemoryQuestionRepository {
    bank: Arc<RwLock<QuestionBank>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self {
            bank: Arc::new(RwLock::new(QuestionBank::default())),
        }
    }

    pub async fn state_count(&self) -> usize {
        self.bank.read().await.states.len()
    }
}

fn in_scope(state: &ReviewState, project_id: Option<&str>) -> bool {
    project_id.map_or(true, |id| state.project_id == id)
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn insert_batch(&self, items: Vec<ScheduledQuestion>) -> AppResult<usize> {
        let mut bank = self.bank.write().await;

        // Validate the whole batch before touching the bank.
        {
            let mut seen = HashSet::new();
            for item in &items {
                let id = &item.question.id;
                if bank.questions.contains_key(id) || !seen.insert(id.as_str()) {
                    return Err(AppError::AlreadyExists(format!(
                        "Question with id '{}' already exists",
                        id
                    )));
                }
            }
        }

        let count = items.len();
        for item in items {
            bank.order.push(item.question.id.clone());
            bank.states
                .insert(item.question.id.clone(), item.review.clone());
            bank.questions.insert(item.question.id.clone(), item.question);
        }
        Ok(count)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        Ok(self.bank.read().await.questions.get(id).cloned())
    }

    async fn find_review_state(&self, question_id: &str) -> AppResult<Option<ReviewState>> {
        Ok(self.bank.read().await.states.get(question_id).cloned())
    }

    async fn save_review_state(&self, state: ReviewState) -> AppResult<ReviewState> {
        let mut bank = self.bank.write().await;
        bank.states.insert(state.question_id.clone(), state.clone());
        Ok(state)
    }

    async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: u32,
        project_id: Option<String>,
    ) -> AppResult<Vec<ScheduledQuestion>> {
        let bank = self.bank.read().await;
        let mut due: Vec<&ReviewState> = bank
            .states
            .values()
            .filter(|s| s.next_review_at <= now && in_scope(s, project_id.as_deref()))
            .collect();
        due.sort_by(|a, b| a.next_review_at.cmp(&b.next_review_at));

        Ok(due
            .into_iter()
            .take(limit as usize)
            .filter_map(|state| {
                bank.questions
                    .get(&state.question_id)
                    .map(|question| ScheduledQuestion {
                        question: question.clone(),
                        review: state.clone(),
                    })
            })
            .collect())
    }

    async fn list_by_project(&self, project_id: &str) -> AppResult<Vec<ScheduledQuestion>> {
        let bank = self.bank.read().await;
        Ok(bank
            .order
            .iter()
            .filter_map(|id| {
                let question = bank.questions.get(id)?;
                let review = bank.states.get(id)?;
                (question.project_id == project_id).then(|| ScheduledQuestion {
                    question: question.clone(),
                    review: review.clone(),
                })
            })
            .collect())
    }

    async fn count_questions(&self, project_id: Option<String>) -> AppResult<u64> {
        let bank = self.bank.read().await;
        let count = bank
            .questions
            .values()
            .filter(|q| project_id.as_deref().map_or(true, |id| q.project_id == id))
            .count();
        Ok(count as u64)
    }

    async fn count_due(&self, now: DateTime<Utc>, project_id: Option<String>) -> AppResult<u64> {
        let bank = self.bank.read().await;
        let count = bank
            .states
            .values()
            .filter(|s| s.next_review_at <= now && in_scope(s, project_id.as_deref()))
            .count();
        Ok(count as u64)
    }
}

pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: Session) -> AppResult<Session> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(AppError::AlreadyExists(format!(
                "Session with id '{}' already exists",
                session.id
            )));
        }

        sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Session>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn complete(
        &self,
        id: &str,
        correct: u32,
        total: u32,
        completed_at: DateTime<Utc>,
    ) -> AppResult<Option<Session>> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(id) else {
            return Ok(None);
        };
        if session.is_completed() {
            return Ok(None);
        }

        session.correct_count = correct;
        session.total_count = total;
        session.completed_at = Some(completed_at);
        Ok(Some(session.clone()))
    }

    async fn list_completed(&self, project_id: Option<String>) -> AppResult<Vec<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|s| s.is_completed())
            .filter(|s| project_id.is_none() || s.project_id == project_id)
            .cloned()
            .collect())
    }
}

/// Replays a canned completion and counts calls.
pub struct StubCompletionModel {
    response: AppResult<String>,
    calls: AtomicUsize,
}

impl StubCompletionModel {
    pub fn replying(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(AppError::UpstreamError(message.to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionModel for StubCompletionModel {
    async fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

pub struct StaticHealth {
    pub healthy: bool,
}

#[async_trait]
impl HealthCheck for StaticHealth {
    async fn health_check(&self) -> AppResult<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(AppError::DatabaseError("ping failed".to_string()))
        }
    }
}

/// Handles into an `AppState` built over in-memory storage.
pub struct TestApp {
    pub state: AppState,
    pub projects: Arc<InMemoryProjectRepository>,
    pub questions: Arc<InMemoryQuestionRepository>,
    pub sessions: Arc<InMemorySessionRepository>,
    pub model: Arc<StubCompletionModel>,
}

pub fn test_app(model: StubCompletionModel) -> TestApp {
    test_app_with_health(model, true)
}

pub fn test_app_with_health(model: StubCompletionModel, healthy: bool) -> TestApp {
    let projects = Arc::new(InMemoryProjectRepository::new());
    let questions = Arc::new(InMemoryQuestionRepository::new());
    let sessions = Arc::new(InMemorySessionRepository::new());
    let model = Arc::new(model);

    let state = AppState::from_parts(
        Config::test_config(),
        projects.clone(),
        questions.clone(),
        sessions.clone(),
        model.clone(),
        Arc::new(StaticHealth { healthy }),
    );

    TestApp {
        state,
        projects,
        questions,
        sessions,
        model,
    }
}

pub fn sample_profile() -> ProjectProfile {
    ProjectProfile {
        project_name: "demo".to_string(),
        tech: vec!["Rust".to_string()],
        concepts: vec!["caching".to_string()],
        top_extensions: vec![],
        file_count: 3,
        key_files: vec![KeyFile {
            path: "src/cache.rs".to_string(),
            content: "pub struct Cache;".to_string(),
        }],
    }
}

pub async fn seed_project(app: &TestApp) -> Project {
    app.projects
        .create(Project::new("demo", "/home/dev/demo", sample_profile()))
        .await
        .expect("project should be stored")
}
