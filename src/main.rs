use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use code_recall_server::{
    app_state::AppState, config::Config, graphql::create_schema, handlers,
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if let Err(err) = config.validate() {
        log::error!("Invalid configuration: {}", err);
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, err));
    }

    let state = match AppState::new(config).await {
        Ok(state) => state,
        Err(err) => {
            log::error!("Failed to initialise application state: {}", err);
            return Err(std::io::Error::other(err));
        }
    };

    let schema = create_schema(state.clone());
    let host = state.config.web_server_host.clone();
    let port = state.config.web_server_port;

    log::info!("Starting HTTP server on http://{}:{}", host, port);
    log::info!("GraphiQL playground: http://{}:{}/graphiql", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(schema.clone()))
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .configure(handlers::configure)
            .configure(handlers::configure_graphql)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
