use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{domain::Project, dto::request::CreateProjectRequest},
    repositories::ProjectRepository,
};

pub struct ProjectService {
    repository: Arc<dyn ProjectRepository>,
}

impl ProjectService {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_project(&self, request: CreateProjectRequest) -> AppResult<Project> {
        request.validate()?;

        let name = request.name.trim();
        let path = request.path.trim();
        if name.is_empty() || path.is_empty() {
            return Err(AppError::ValidationError(
                "Project name and folder path are required".to_string(),
            ));
        }

        let mut profile = request.profile;
        if profile.project_name.trim().is_empty() {
            profile.project_name = name.to_string();
        }

        let project = self
            .repository
            .create(Project::new(name, path, profile))
            .await?;

        log::info!("Registered project '{}' ({})", project.name, project.id);
        Ok(project)
    }

    pub async fn get_project(&self, id: &str) -> AppResult<Project> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project with id '{}' not found", id)))
    }

    pub async fn list_projects(&self) -> AppResult<Vec<Project>> {
        self.repository.find_all().await
    }
}
