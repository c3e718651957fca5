use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::{
    app_state::AppState,
    models::{
        domain::{Project, ScheduledQuestion},
        dto::{
            request::DueQuestionsQuery,
            response::{DueQuestionsResponse, SettingsResponse},
        },
    },
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn projects(&self, ctx: &Context<'_>) -> Result<Vec<Project>> {
        let state = ctx.data::<AppState>()?;
        state
            .project_service
            .list_projects()
            .await
            .map_err(|e| e.extend())
    }

    async fn project(&self, ctx: &Context<'_>, id: String) -> Result<Project> {
        let state = ctx.data::<AppState>()?;
        state
            .project_service
            .get_project(&id)
            .await
            .map_err(|e| e.extend())
    }

    async fn questions(
        &self,
        ctx: &Context<'_>,
        project_id: String,
    ) -> Result<Vec<ScheduledQuestion>> {
        let state = ctx.data::<AppState>()?;
        state
            .question_service
            .list_questions(&project_id)
            .await
            .map_err(|e| e.extend())
    }

    /// Serves a due batch and opens a session for it.
    async fn due_questions(
        &self,
        ctx: &Context<'_>,
        limit: Option<u32>,
        project_id: Option<String>,
    ) -> Result<DueQuestionsResponse> {
        let state = ctx.data::<AppState>()?;
        state
            .session_service
            .get_due_questions(DueQuestionsQuery { limit, project_id })
            .await
            .map_err(|e| e.extend())
    }

    async fn settings(&self, ctx: &Context<'_>) -> Result<SettingsResponse> {
        let state = ctx.data::<AppState>()?;
        Ok(state.session_service.settings())
    }
}
