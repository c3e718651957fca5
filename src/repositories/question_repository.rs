use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, DateTime as BsonDateTime, Document},
    options::{FindOptions, IndexOptions, ReplaceOptions},
    Client, Collection, IndexModel,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{Question, ReviewState, ScheduledQuestion},
};

/// Questions and their review states. The two always travel together: a
/// question is never stored without its schedule.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Inserts every pair or none of them.
    async fn insert_batch(&self, items: Vec<ScheduledQuestion>) -> AppResult<usize>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>>;
    async fn find_review_state(&self, question_id: &str) -> AppResult<Option<ReviewState>>;
    async fn save_review_state(&self, state: ReviewState) -> AppResult<ReviewState>;
    /// Questions due at `now`, soonest first, at most `limit`.
    async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: u32,
        project_id: Option<String>,
    ) -> AppResult<Vec<ScheduledQuestion>>;
    async fn list_by_project(&self, project_id: &str) -> AppResult<Vec<ScheduledQuestion>>;
    async fn count_questions(&self, project_id: Option<String>) -> AppResult<u64>;
    async fn count_due(&self, now: DateTime<Utc>, project_id: Option<String>) -> AppResult<u64>;
}

/// Stored shape of a review state; timestamps are BSON dates so due
/// selection can compare and sort them server-side.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewStateDocument {
    question_id: String,
    project_id: String,
    ease_factor: f64,
    interval_days: i64,
    repetitions: i64,
    next_review_at: BsonDateTime,
    last_reviewed_at: Option<BsonDateTime>,
}

impl From<&ReviewState> for ReviewStateDocument {
    fn from(state: &ReviewState) -> Self {
        ReviewStateDocument {
            question_id: state.question_id.clone(),
            project_id: state.project_id.clone(),
            ease_factor: state.ease_factor,
            interval_days: state.interval_days as i64,
            repetitions: state.repetitions as i64,
            next_review_at: to_bson_datetime(state.next_review_at),
            last_reviewed_at: state.last_reviewed_at.map(to_bson_datetime),
        }
    }
}

impl From<ReviewStateDocument> for ReviewState {
    fn from(document: ReviewStateDocument) -> Self {
        ReviewState {
            question_id: document.question_id,
            project_id: document.project_id,
            ease_factor: document.ease_factor,
            interval_days: u32::try_from(document.interval_days).unwrap_or_default(),
            repetitions: u32::try_from(document.repetitions).unwrap_or_default(),
            next_review_at: from_bson_datetime(document.next_review_at),
            last_reviewed_at: document.last_reviewed_at.map(from_bson_datetime),
        }
    }
}

fn to_bson_datetime(value: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(value.timestamp_millis())
}

fn from_bson_datetime(value: BsonDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or_default()
}

fn due_filter(now: DateTime<Utc>, project_id: Option<&str>) -> Document {
    let mut filter = doc! { "nextReviewAt": { "$lte": to_bson_datetime(now) } };
    if let Some(project_id) = project_id {
        filter.insert("projectId", project_id);
    }
    filter
}

/// Soonest review first, capped at `limit`.
fn due_find_options(limit: u32) -> FindOptions {
    FindOptions::builder()
        .sort(doc! { "nextReviewAt": 1 })
        .limit(i64::from(limit))
        .build()
}

fn project_filter(project_id: Option<&str>) -> Document {
    match project_id {
        Some(project_id) => doc! { "projectId": project_id },
        None => doc! {},
    }
}

pub struct MongoQuestionRepository {
    client: Client,
    questions: Collection<Question>,
    review_states: Collection<ReviewStateDocument>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            client: db.client().clone(),
            questions: db.get_collection("questions"),
            review_states: db.get_collection("review_states"),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for questions and review_states collections");

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
            .keys(doc! { "projectId": 1 })
            .options(IndexOptions::builder().name("project_id".to_string()).build())
            .build();

        let question_id_index = IndexModel::builder()
            .keys(doc! { "questionId": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("question_id_unique".to_string())
                    .build(),
            )
            .build();

        let due_index = IndexModel::builder()
            .keys(doc! { "projectId": 1, "nextReviewAt": 1 })
            .options(IndexOptions::builder().name("project_due".to_string()).build())
            .build();

        self.questions.create_index(id_index).await?;
        self.questions.create_index(project_index).await?;
        self.review_states.create_index(question_id_index).await?;
        self.review_states.create_index(due_index).await?;

        log::info!("Successfully created indexes for questions and review_states collections");
        Ok(())
    }

    async fn questions_by_id(&self, ids: Vec<String>) -> AppResult<HashMap<String, Question>> {
        let questions: Vec<Question> = self
            .questions
            .find(doc! { "id": { "$in": ids } })
            .await?
            .try_collect()
            .await?;

        Ok(questions.into_iter().map(|q| (q.id.clone(), q)).collect())
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn insert_batch(&self, items: Vec<ScheduledQuestion>) -> AppResult<usize> {
        if items.is_empty() {
            return Ok(0);
        }

        let count = items.len();
        let states: Vec<ReviewStateDocument> = items
            .iter()
            .map(|item| ReviewStateDocument::from(&item.review))
            .collect();
        let questions: Vec<Question> = items.into_iter().map(|item| item.question).collect();

        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;

        let inserted = async {
            self.questions
                .insert_many(&questions)
                .session(&mut session)
                .await?;
            self.review_states
                .insert_many(&states)
                .session(&mut session)
                .await?;
            Ok::<(), mongodb::error::Error>(())
        }
        .await;

        match inserted {
            Ok(()) => {
                session.commit_transaction().await?;
                log::info!("Inserted batch of {} questions", count);
                Ok(count)
            }
            Err(err) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    log::error!("Failed to abort question batch transaction: {}", abort_err);
                }
                Err(err.into())
            }
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        let question = self.questions.find_one(doc! { "id": id }).await?;
        Ok(question)
    }

    async fn find_review_state(&self, question_id: &str) -> AppResult<Option<ReviewState>> {
        let document = self
            .review_states
            .find_one(doc! { "questionId": question_id })
            .await?;
        Ok(document.map(ReviewState::from))
    }

    async fn save_review_state(&self, state: ReviewState) -> AppResult<ReviewState> {
        let options = ReplaceOptions::builder().upsert(true).build();

        self.review_states
            .replace_one(
                doc! { "questionId": &state.question_id },
                ReviewStateDocument::from(&state),
            )
            .with_options(options)
            .await?;

        Ok(state)
    }

    async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: u32,
        project_id: Option<String>,
    ) -> AppResult<Vec<ScheduledQuestion>> {
        let states: Vec<ReviewStateDocument> = self
            .review_states
            .find(due_filter(now, project_id.as_deref()))
            .with_options(due_find_options(limit))
            .await?
            .try_collect()
            .await?;

        let ids = states.iter().map(|s| s.question_id.clone()).collect();
        let mut questions = self.questions_by_id(ids).await?;

        let due = states
            .into_iter()
            .filter_map(|state| match questions.remove(&state.question_id) {
                Some(question) => Some(ScheduledQuestion {
                    question,
                    review: state.into(),
                }),
                None => {
                    log::warn!("Review state for missing question {}", state.question_id);
                    None
                }
            })
            .collect();

        Ok(due)
    }

    async fn list_by_project(&self, project_id: &str) -> AppResult<Vec<ScheduledQuestion>> {
        let questions: Vec<Question> = self
            .questions
            .find(doc! { "projectId": project_id })
            .sort(doc! { "createdAt": 1 })
            .await?
            .try_collect()
            .await?;

        let states: Vec<ReviewStateDocument> = self
            .review_states
            .find(doc! { "projectId": project_id })
            .await?
            .try_collect()
            .await?;
        let mut states: HashMap<String, ReviewState> = states
            .into_iter()
            .map(|s| (s.question_id.clone(), ReviewState::from(s)))
            .collect();

        let now = Utc::now();
        Ok(questions
            .into_iter()
            .map(|question| {
                let review = states
                    .remove(&question.id)
                    .unwrap_or_else(|| ReviewState::new(&question.id, &question.project_id, now));
                ScheduledQuestion { question, review }
            })
            .collect())
    }

    async fn count_questions(&self, project_id: Option<String>) -> AppResult<u64> {
        let count = self
            .questions
            .count_documents(project_filter(project_id.as_deref()))
            .await?;
        Ok(count)
    }

    async fn count_due(&self, now: DateTime<Utc>, project_id: Option<String>) -> AppResult<u64> {
        let count = self
            .review_states
            .count_documents(due_filter(now, project_id.as_deref()))
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::SubsecRound;

    #[test]
    fn review_state_document_round_trip_keeps_schedule() {
        let now = Utc::now().trunc_subsecs(0);
        let mut state = ReviewState::new("q-1", "p-1", now);
        state.interval_days = 6;
        state.repetitions = 2;
        state.last_reviewed_at = Some(now);

        let restored = ReviewState::from(ReviewStateDocument::from(&state));

        assert_eq!(restored, state);
    }

    #[test]
    fn due_filter_scopes_to_project_when_given() {
        let now = Utc::now();

        assert!(due_filter(now, Some("p-1")).contains_key("projectId"));
        assert!(!due_filter(now, None).contains_key("projectId"));
        assert!(due_filter(now, None).contains_key("nextReviewAt"));
    }

    #[test]
    fn due_filter_includes_reviews_scheduled_exactly_now() {
        let now = Utc::now();
        let filter = due_filter(now, None);

        let bound = filter
            .get_document("nextReviewAt")
            .and_then(|range| range.get_datetime("$lte"))
            .expect("nextReviewAt upper bound");
        assert_eq!(*bound, to_bson_datetime(now));
    }

    #[test]
    fn due_options_sort_soonest_first_and_cap_the_batch() {
        let options = due_find_options(7);

        assert_eq!(options.sort, Some(doc! { "nextReviewAt": 1 }));
        assert_eq!(options.limit, Some(7));
    }

    #[test]
    fn project_filter_is_empty_for_global_scope() {
        assert!(project_filter(None).is_empty());
        assert_eq!(project_filter(Some("p")).get_str("projectId").ok(), Some("p"));
    }
}
