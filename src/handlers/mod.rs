pub mod graphql_handler;
pub mod health_handler;
pub mod project_handler;
pub mod question_handler;
pub mod session_handler;

use actix_web::web;

pub use graphql_handler::{graphiql, graphql};
pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use project_handler::{create_project, get_project, list_projects};
pub use question_handler::{generate_questions, get_due_questions, list_questions, submit_answer};
pub use session_handler::{complete_session, get_settings};

/// Registers every REST and health route. The GraphQL routes need the schema
/// as app data and are registered separately.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(health_check_ready)
        .service(create_project)
        .service(list_projects)
        .service(get_project)
        .service(generate_questions)
        .service(list_questions)
        .service(get_due_questions)
        .service(submit_answer)
        .service(complete_session)
        .service(get_settings);
}

pub fn configure_graphql(cfg: &mut web::ServiceConfig) {
    cfg.service(graphql).service(graphiql);
}
