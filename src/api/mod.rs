pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

pub use routes::create_routes;
pub use state::AppState;
