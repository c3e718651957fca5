use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::Session};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: Session) -> AppResult<Session>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Session>>;
    /// Records the final counts. Returns `None` when the session is unknown
    /// or was already completed.
    async fn complete(
        &self,
        id: &str,
        correct: u32,
        total: u32,
        completed_at: DateTime<Utc>,
    ) -> AppResult<Option<Session>>;
    async fn list_completed(&self, project_id: Option<String>) -> AppResult<Vec<Session>>;
}

pub struct MongoSessionRepository {
    collection: Collection<Session>,
}

impl MongoSessionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("sessions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for sessions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let project_index = IndexModel::builder()
            .keys(doc! { "projectId": 1, "completedAt": 1 })
            .options(
                IndexOptions::builder()
                    .name("project_completed".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(project_index).await?;

        log::info!("Successfully created indexes for sessions collection");
        Ok(())
    }
}

fn completed_filter(project_id: Option<&str>) -> Document {
    let mut filter = doc! { "completedAt": { "$ne": null } };
    if let Some(project_id) = project_id {
        filter.insert("projectId", project_id);
    }
    filter
}

#[async_trait]
impl SessionRepository for MongoSessionRepository {
    async fn create(&self, session: Session) -> AppResult<Session> {
        self.collection.insert_one(&session).await?;
        Ok(session)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Session>> {
        let session = self.collection.find_one(doc! { "id": id }).await?;
        Ok(session)
    }

    async fn complete(
        &self,
        id: &str,
        correct: u32,
        total: u32,
        completed_at: DateTime<Utc>,
    ) -> AppResult<Option<Session>> {
        // Matching on a null completedAt makes completion a one-shot transition.
        let filter = doc! { "id": id, "completedAt": null };
        let update = doc! {
            "$set": {
                "completedAt": completed_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                "correctCount": correct as i64,
                "totalCount": total as i64,
            }
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let session = self
            .collection
            .find_one_and_update(filter, update)
            .with_options(options)
            .await?;
        Ok(session)
    }

    async fn list_completed(&self, project_id: Option<String>) -> AppResult<Vec<Session>> {
        let cursor = self
            .collection
            .find(completed_filter(project_id.as_deref()))
            .sort(doc! { "completedAt": -1 })
            .await?;
        let sessions: Vec<Session> = cursor.try_collect().await?;
        Ok(sessions)
    }
}
