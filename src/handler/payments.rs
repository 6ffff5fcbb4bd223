use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{paymentdb::PaymentExt, propertydb::PropertyExt},
    dtos::{
        commondtos::non_blank,
        paymentdtos::{BankTransferPaymentDto, EasypaisaPaymentDto, PaymentQueryDto, UpdatePaymentStatusDto},
    },
    error::HttpError,
    middleware::role_check,
    models::{
        paymentmodel::NewPaymentRequest,
        propertymodel::Property,
        usermodel::UserRole,
    },
    service::error::ServiceError,
    AppState,
};

pub fn payment_handler() -> Router {
    Router::new()
        .route("/easypaisa", post(create_easypaisa_payment))
        .route("/bank-transfer", post(create_bank_transfer_payment))
}

pub fn admin_payment_handler() -> Router {
    Router::new()
        .route("/", get(get_payments))
        .route("/:payment_id/status", put(update_payment_status))
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }))
}

async fn find_property(app_state: &AppState, property_id: Uuid) -> Result<Property, ServiceError> {
    app_state.db_client
        .get_property_by_id(property_id)
        .await?
        .ok_or(ServiceError::PropertyNotFound(property_id))
}

async fn record_payment(app_state: &AppState, payment: NewPaymentRequest) -> Result<impl IntoResponse, HttpError> {
    let payment = app_state.db_client
        .create_payment_request(payment)
        .await
        .map_err(ServiceError::from)?;

    tracing::info!(
        "Payment request {} recorded for property {} ({:?})",
        payment.id,
        payment.property_id,
        payment.payment_method
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": "Payment request submitted. We will confirm once it is verified.",
            "data": {
                "payment": payment
            }
        })),
    ))
}

pub async fn create_easypaisa_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<EasypaisaPaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let property = find_property(&app_state, body.property_id).await?;
    let payment = body.into_new_request(property.title, property.price);

    record_payment(&app_state, payment).await
}

pub async fn create_bank_transfer_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<BankTransferPaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let property = find_property(&app_state, body.property_id).await?;
    let payment = body.into_new_request(property.title, property.price);

    record_payment(&app_state, payment).await
}

pub async fn get_payments(
    Query(query_params): Query<PaymentQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let payments = match non_blank(&query_params.email) {
        Some(email) => app_state.db_client.get_payment_requests_by_email(&email).await,
        None => app_state.db_client.get_payment_requests().await,
    }
    .map_err(ServiceError::from)?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "payments": payments,
            "total": payments.len()
        }
    })))
}

pub async fn get_property_payments(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let payments = app_state.db_client
        .get_payment_requests_by_property(property_id)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "payments": payments,
            "total": payments.len()
        }
    })))
}

pub async fn update_payment_status(
    Path(payment_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<UpdatePaymentStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let payment = app_state.db_client
        .update_payment_status(payment_id, body.status, non_blank(&body.transaction_id))
        .await
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::PaymentNotFound(payment_id))?;

    tracing::info!("Payment request {} marked {:?}", payment.id, payment.status);

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "payment": payment
        }
    })))
}
