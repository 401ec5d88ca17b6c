use std::time::Duration;

use crate::error::{Result, ServiceError};

/// Service configuration, read from the environment at startup.
///
/// `DATABASE_URL`, `LLM_BASE_URL`, and `LLM_MODEL` are required; the process
/// refuses to start without them.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub database_url: String,
    /// Upper bound on pooled database connections.
    pub database_pool_size: u32,
    pub llm: LlmConfig,
}

/// Language-model client configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL for the completion API.
    pub base_url: String,
    /// Model name passed on every request.
    pub model: String,
    /// Bearer token, sent when present.
    pub api_key: Option<String>,
    /// Request timeout. The only backstop on a stalled model call.
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            listen_addr: env_or("LISTEN_ADDR", "0.0.0.0:8074"),
            database_url: require("DATABASE_URL")?,
            database_pool_size: std::env::var("DATABASE_POOL_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            llm: LlmConfig {
                base_url: require("LLM_BASE_URL")?,
                model: require("LLM_MODEL")?,
                api_key: std::env::var("LLM_API_KEY").ok(),
                timeout: Duration::from_secs(
                    std::env::var("LLM_TIMEOUT_SECS")
                        .ok()
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(120),
                ),
                temperature: 0.2,
                max_tokens: 512,
            },
        })
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| ServiceError::config(format!("missing required environment variable {name}")))
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
