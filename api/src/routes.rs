use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, state::AppState};

pub fn raffle_routes() -> Router<AppState> {
    Router::new()
        .route("/raffle/all", get(handlers::get_all_raffles))
        .route("/raffle/:address", get(handlers::get_raffle))
        .route("/raffle/:address/submit", post(handlers::submit_raffle))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health_check))
}

pub fn observability_routes() -> Router<AppState> {
    Router::new().route("/metrics", get(handlers::metrics_endpoint))
}
