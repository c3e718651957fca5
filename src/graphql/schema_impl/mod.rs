pub mod mutations;
pub mod queries;

use async_graphql::{EmptySubscription, Schema as GraphQLSchema};

use crate::app_state::AppState;

pub use mutations::MutationRoot;
pub use queries::QueryRoot;

pub type Schema = GraphQLSchema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn create_schema(app_state: AppState) -> Schema {
    GraphQLSchema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(app_state)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_exposes_quiz_operations() {
        let sdl = GraphQLSchema::build(QueryRoot, MutationRoot, EmptySubscription)
            .finish()
            .sdl();

        for field in ["dueQuestions", "generateQuestions", "submitAnswer", "completeSession"] {
            assert!(sdl.contains(field), "schema is missing {}", field);
        }
    }
}
