use std::sync::Arc;

use sqlx::PgPool;

use crate::assistant::Assistant;

/// Shared application state. Handlers build repositories from the pool per
/// request; the assistant is constructed once at startup and injected here.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub assistant: Arc<Assistant>,
}

impl AppState {
    pub fn new(pool: PgPool, assistant: Arc<Assistant>) -> Self {
        Self { pool, assistant }
    }
}
