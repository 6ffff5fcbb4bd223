use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::HttpError,
    models::propertymodel::PropertyStatus,
    service::{blob_store::BlobError, image_pipeline::ImageError},
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Property {0} not found")]
    PropertyNotFound(Uuid),

    #[error("Agent {0} not found")]
    AgentNotFound(Uuid),

    #[error("Inquiry {0} not found")]
    InquiryNotFound(Uuid),

    #[error("Payment request {0} not found")]
    PaymentNotFound(Uuid),

    #[error("Cannot change property status from {} to {}", .from.to_str(), .to.to_str())]
    InvalidStatusTransition { from: PropertyStatus, to: PropertyStatus },

    #[error("Property {0} was modified by another request, reload and try again")]
    ConcurrentModification(Uuid),

    #[error("{0}")]
    Image(#[from] ImageError),

    #[error("Failed to store image: {0}")]
    Blob(#[from] BlobError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::PropertyNotFound(_)
            | ServiceError::AgentNotFound(_)
            | ServiceError::InquiryNotFound(_)
            | ServiceError::PaymentNotFound(_) => HttpError::not_found(error.to_string()),

            ServiceError::InvalidStatusTransition { .. }
            | ServiceError::Image(_)
            | ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            ServiceError::ConcurrentModification(_) => HttpError::conflict(error.to_string()),

            ServiceError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                HttpError::server_error(error.to_string())
            }

            _ => HttpError::server_error(error.to_string()),
        }
    }
}

impl From<String> for ServiceError {
    fn from(err: String) -> Self {
        ServiceError::Other(err)
    }
}
