use std::env;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

pub const DEFAULT_QUESTIONS_PER_SESSION: u32 = 7;
pub const DEFAULT_MAX_QUESTIONS_PER_GENERATION: u32 = 20;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub openai_api_key: SecretString,
    pub openai_api_base: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_timeout_seconds: u64,
    pub questions_per_session: u32,
    pub max_questions_per_generation: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "code-recall-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            openai_api_key: SecretString::from(env::var("OPENAI_API_KEY").unwrap_or_default()),
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            llm_temperature: env::var("LLM_TEMPERATURE")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(0.7),
            llm_timeout_seconds: env::var("LLM_TIMEOUT_SECONDS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(120),
            questions_per_session: env::var("QUESTIONS_PER_SESSION")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(DEFAULT_QUESTIONS_PER_SESSION),
            max_questions_per_generation: env::var("MAX_QUESTIONS_PER_GENERATION")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(DEFAULT_MAX_QUESTIONS_PER_GENERATION),
        }
    }

    /// Rejects settings the server cannot start with.
    pub fn validate(&self) -> AppResult<()> {
        if self.openai_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::ValidationError(
                "OPENAI_API_KEY is not set".to_string(),
            ));
        }

        if !(1..=50).contains(&self.questions_per_session) {
            return Err(AppError::ValidationError(format!(
                "QUESTIONS_PER_SESSION must be between 1 and 50, got {}",
                self.questions_per_session
            )));
        }

        if !(1..=50).contains(&self.max_questions_per_generation) {
            return Err(AppError::ValidationError(format!(
                "MAX_QUESTIONS_PER_GENERATION must be between 1 and 50, got {}",
                self.max_questions_per_generation
            )));
        }

        if !(0.0..=2.0).contains(&self.llm_temperature) {
            return Err(AppError::ValidationError(format!(
                "LLM_TEMPERATURE must be between 0 and 2, got {}",
                self.llm_temperature
            )));
        }

        Ok(())
    }

    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "code-recall-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            openai_api_key: SecretString::from("test-api-key".to_string()),
            openai_api_base: "http://localhost:9999/v1".to_string(),
            llm_model: "test-model".to_string(),
            llm_temperature: 0.2,
            llm_timeout_seconds: 5,
            questions_per_session: DEFAULT_QUESTIONS_PER_SESSION,
            max_questions_per_generation: DEFAULT_MAX_QUESTIONS_PER_GENERATION,
        }
    }
}
