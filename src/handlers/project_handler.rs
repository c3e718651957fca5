use actix_web::{get, post, web, HttpResponse};

use crate::{app_state::AppState, errors::AppError, models::dto::request::CreateProjectRequest};

#[post("/api/projects")]
async fn create_project(
    state: web::Data<AppState>,
    request: web::Json<CreateProjectRequest>,
) -> Result<HttpResponse, AppError> {
    let project = state
        .project_service
        .create_project(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(project))
}

#[get("/api/projects")]
async fn list_projects(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let projects = state.project_service.list_projects().await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[get("/api/projects/{id}")]
async fn get_project(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let project = state.project_service.get_project(&id).await?;
    Ok(HttpResponse::Ok().json(project))
}
