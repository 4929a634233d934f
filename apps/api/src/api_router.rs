use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use validash_core::AppError;

use crate::handlers;
use crate::state::AppState;

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let api_routes = Router::new()
        .route(
            "/api/environments",
            get(handlers::environments::list_environments_handler),
        )
        .route(
            "/api/requests",
            post(handlers::requests::submit_request_handler),
        )
        .route("/api/logs", get(handlers::logs::list_logs_handler))
        .route("/api/logs/export", get(handlers::logs::export_logs_handler))
        .route(
            "/api/logs/payload/{value}",
            get(handlers::logs::payload_text_handler),
        )
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications_handler),
        )
        .route(
            "/api/notifications/{notification_id}/click",
            post(handlers::notifications::click_notification_handler),
        );

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
