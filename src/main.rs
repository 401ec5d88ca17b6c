use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medbay_service::{
    api::{create_routes, AppState},
    assistant::{Assistant, OllamaClient},
    config::Config,
    db::{create_pool, PoolSettings},
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medbay_service=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        listen_addr = %config.listen_addr,
        llm_model = %config.llm.model,
        "Starting medbay-service"
    );

    let pool = create_pool(
        &config.database_url,
        PoolSettings::with_size(config.database_pool_size),
    )
    .await?;

    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Database migrations completed");

    let llm = Arc::new(OllamaClient::new(config.llm.clone())?);
    let assistant = Arc::new(Assistant::new(llm)?);

    let app = create_routes(AppState::new(pool, assistant));

    let addr: SocketAddr = config.listen_addr.parse()?;
    tracing::info!(?addr, "Medbay service listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
