use actix_web::{get, post, web, HttpResponse};

use crate::{app_state::AppState, errors::AppError, models::dto::request::CompleteSessionRequest};

#[post("/api/sessions/{id}/complete")]
async fn complete_session(
    state: web::Data<AppState>,
    session_id: web::Path<String>,
    request: web::Json<CompleteSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let stats = state
        .session_service
        .complete_session(&session_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(stats))
}

#[get("/api/settings")]
async fn get_settings(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.session_service.settings())
}
