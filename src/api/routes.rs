use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/v1/supplies",
            get(handlers::supplies::list_supplies).post(handlers::supplies::create_supply),
        )
        .route(
            "/api/v1/supplies/:id",
            get(handlers::supplies::get_supply)
                .put(handlers::supplies::update_supply)
                .delete(handlers::supplies::delete_supply),
        )
        .route(
            "/api/v1/lots",
            get(handlers::inventory::list_lots).post(handlers::inventory::create_lot),
        )
        .route("/api/v1/lots/:id", put(handlers::inventory::update_lot))
        .route("/api/v1/lots/:id/claim", post(handlers::inventory::claim_lot))
        .route(
            "/api/v1/crew",
            get(handlers::crew::list_crew).post(handlers::crew::create_crew_member),
        )
        .route(
            "/api/v1/crew/:id",
            get(handlers::crew::get_crew_member).put(handlers::crew::update_crew_member),
        )
        .route(
            "/api/v1/logs",
            get(handlers::logs::list_logs).post(handlers::logs::create_log),
        )
        .route("/api/v1/logs/:id", delete(handlers::logs::delete_log))
        .route("/api/v1/assistant/ask", post(handlers::assistant::ask))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
