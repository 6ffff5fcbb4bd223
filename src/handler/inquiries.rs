use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{inquirydb::InquiryExt, propertydb::PropertyExt},
    dtos::inquirydtos::{CreateInquiryDto, UpdateInquiryStatusDto},
    error::HttpError,
    middleware::role_check,
    models::usermodel::UserRole,
    service::error::ServiceError,
    AppState,
};

pub fn inquiry_handler() -> Router {
    Router::new().route("/", post(create_inquiry))
}

pub fn admin_inquiry_handler() -> Router {
    Router::new()
        .route("/", get(get_inquiries))
        .route("/:inquiry_id/status", put(update_inquiry_status))
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }))
}

pub async fn create_inquiry(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateInquiryDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    // title comes from the stored listing, not the form
    let property = app_state.db_client
        .get_property_by_id(body.property_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::PropertyNotFound(body.property_id))?;

    let inquiry = app_state.db_client
        .create_inquiry(
            property.id,
            property.title,
            body.name,
            body.email,
            body.phone,
            body.message,
        )
        .await
        .map_err(ServiceError::from)?;

    tracing::info!("Inquiry {} received for property {}", inquiry.id, inquiry.property_id);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": "Inquiry sent. An agent will contact you soon.",
            "data": {
                "inquiry": inquiry
            }
        })),
    ))
}

pub async fn get_inquiries(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let inquiries = app_state.db_client
        .get_inquiries()
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "inquiries": inquiries,
            "total": inquiries.len()
        }
    })))
}

pub async fn update_inquiry_status(
    Path(inquiry_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<UpdateInquiryStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let inquiry = app_state.db_client
        .update_inquiry_status(inquiry_id, body.status)
        .await
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::InquiryNotFound(inquiry_id))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "inquiry": inquiry
        }
    })))
}
