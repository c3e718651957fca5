use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Project};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: Project) -> AppResult<Project>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Project>>;
    async fn find_all(&self) -> AppResult<Vec<Project>>;
}

pub struct MongoProjectRepository {
    collection: Collection<Project>,
}

impl MongoProjectRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("projects");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for projects collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;

        log::info!("Successfully created indexes for projects collection");
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for MongoProjectRepository {
    async fn create(&self, project: Project) -> AppResult<Project> {
        self.collection.insert_one(&project).await?;
        Ok(project)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Project>> {
        let project = self.collection.find_one(doc! { "id": id }).await?;
        Ok(project)
    }

    async fn find_all(&self) -> AppResult<Vec<Project>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": 1 })
            .await?;
        let projects: Vec<Project> = cursor.try_collect().await?;
        Ok(projects)
    }
}
