use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{DueQuestionsQuery, GenerateQuestionsRequest, SubmitAnswerRequest},
};

#[post("/api/projects/{id}/questions/generate")]
async fn generate_questions(
    state: web::Data<AppState>,
    project_id: web::Path<String>,
    request: web::Json<GenerateQuestionsRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .question_service
        .generate_questions(&project_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("/api/projects/{id}/questions")]
async fn list_questions(
    state: web::Data<AppState>,
    project_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let questions = state.question_service.list_questions(&project_id).await?;
    Ok(HttpResponse::Ok().json(questions))
}

#[get("/api/questions/due")]
async fn get_due_questions(
    state: web::Data<AppState>,
    query: web::Query<DueQuestionsQuery>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .session_service
        .get_due_questions(query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/questions/{id}/answer")]
async fn submit_answer(
    state: web::Data<AppState>,
    question_id: web::Path<String>,
    request: web::Json<SubmitAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state
        .session_service
        .submit_answer(&question_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}
