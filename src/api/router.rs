use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::{self, AppState};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/alerts/trigger", post(api::alerts::trigger_alert))
        .route("/api/alerts", get(api::alerts::list_alerts))
        .route("/api/alerts/:id", get(api::alerts::get_alert))
        .route(
            "/api/users/:id/notifications",
            get(api::notifications::list_user_notifications),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
