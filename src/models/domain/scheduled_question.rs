use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};

use crate::models::domain::{Question, ReviewState};

/// A question together with its review schedule.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledQuestion {
    pub question: Question,
    pub review: ReviewState,
}
