use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::{
    app_state::AppState,
    models::dto::{
        request::{CompleteSessionRequest, GenerateQuestionsRequest, SubmitAnswerRequest},
        response::{AnswerResult, GenerateQuestionsResponse, SessionStats},
    },
    services::answer_grader::UserResponse,
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn generate_questions(
        &self,
        ctx: &Context<'_>,
        project_id: String,
        input: GenerateQuestionsRequest,
    ) -> Result<GenerateQuestionsResponse> {
        let state = ctx.data::<AppState>()?;
        state
            .question_service
            .generate_questions(&project_id, input)
            .await
            .map_err(|e| e.extend())
    }

    /// `response` is the choice letter, "true"/"false" or free text.
    async fn submit_answer(
        &self,
        ctx: &Context<'_>,
        question_id: String,
        response: String,
        session_id: Option<String>,
        #[graphql(default)] confidence_bonus: bool,
    ) -> Result<AnswerResult> {
        let state = ctx.data::<AppState>()?;
        let request = SubmitAnswerRequest {
            response: UserResponse::Text(response),
            session_id,
            confidence_bonus,
        };
        state
            .session_service
            .submit_answer(&question_id, request)
            .await
            .map_err(|e| e.extend())
    }

    async fn complete_session(
        &self,
        ctx: &Context<'_>,
        session_id: String,
        input: CompleteSessionRequest,
    ) -> Result<SessionStats> {
        let state = ctx.data::<AppState>()?;
        state
            .session_service
            .complete_session(&session_id, input)
            .await
            .map_err(|e| e.extend())
    }
}
