use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    handler::{
        agents::{admin_agent_handler, agent_handler},
        inquiries::{admin_inquiry_handler, inquiry_handler},
        payments::{admin_payment_handler, payment_handler},
        properties::{admin_property_handler, property_handler},
    },
    middleware::auth,
    AppState,
};

// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // inline images arrive full size; the pipeline enforces the stored size
    let upload_limit = DefaultBodyLimit::max(app_state.env.max_upload_bytes);

    let admin_routes = Router::new()
        .nest("/properties", admin_property_handler().layer(upload_limit.clone()))
        .nest("/agents", admin_agent_handler().layer(upload_limit))
        .nest("/inquiries", admin_inquiry_handler())
        .nest("/payments", admin_payment_handler())
        .layer(middleware::from_fn(auth));

    let api_route = Router::new()
        .nest("/properties", property_handler())
        .nest("/agents", agent_handler())
        .nest("/inquiries", inquiry_handler())
        .nest("/payments", payment_handler())
        .nest("/admin", admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state.clone()));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
        .nest_service("/media", ServeDir::new(&app_state.env.media_dir))
}
