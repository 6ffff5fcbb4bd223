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
    db::propertydb::PropertyExt,
    dtos::{
        commondtos::RequestQueryDto,
        propertydtos::{
            CreatePropertyDto, PropertyDetailDto, PropertySearchQueryDto, PropertySummaryDto,
            PropertyTypeOptionDto, UpdatePropertyDto, UpdatePropertyStatusDto,
        },
    },
    error::{ErrorMessage, HttpError},
    handler::payments::get_property_payments,
    middleware::{role_check, JWTAuthMiddeware},
    models::{
        propertymodel::{NewProperty, PropertyType, PropertyUpdate},
        usermodel::UserRole,
    },
    service::{error::ServiceError, search::search},
    AppState,
};

pub fn property_handler() -> Router {
    Router::new()
        .route("/", get(get_properties))
        .route("/search", get(search_properties))
        .route("/types", get(get_property_types))
        .route("/:property_id", get(get_property_by_id))
}

/// Mounted behind `auth`; everything except `/mine` also needs the admin role.
pub fn admin_property_handler() -> Router {
    Router::new()
        .route(
            "/",
            post(create_property).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
        .route("/mine", get(get_my_properties))
        .route(
            "/:property_id",
            put(update_property)
                .delete(delete_property)
                .layer(middleware::from_fn(|state, req, next| {
                    role_check(state, req, next, vec![UserRole::Admin])
                })),
        )
        .route(
            "/:property_id/status",
            put(update_property_status).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
        .route(
            "/:property_id/payments",
            get(get_property_payments).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
}

fn accepted_type(app_state: &AppState, property_type: Option<PropertyType>) -> Result<Option<PropertyType>, HttpError> {
    match property_type {
        Some(property_type) if !app_state.env.catalog_variant.accepts(property_type) => {
            Err(HttpError::bad_request(format!(
                "Property type '{}' is not offered by this catalog",
                property_type.as_str()
            )))
        }
        other => Ok(other),
    }
}

pub async fn get_properties(
    Query(query_params): Query<RequestQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    query_params.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let properties = app_state.db_client
        .get_all_properties(query_params.limit)
        .await
        .map_err(ServiceError::from)?;

    let summaries = PropertySummaryDto::from_properties(&properties, app_state.env.catalog_variant);

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "properties": summaries,
            "total": summaries.len()
        }
    })))
}

pub async fn search_properties(
    Query(query_params): Query<PropertySearchQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let (query, filters) = query_params.into_parts()
        .map_err(HttpError::bad_request)?;

    let records = app_state.catalog
        .records_with(|| app_state.db_client.get_all_properties(None))
        .await
        .map_err(ServiceError::from)?;

    let found = search(&records, &query, &filters);
    tracing::debug!("Search matched {} of {} listings", found.len(), records.len());

    let summaries = PropertySummaryDto::from_properties(found, app_state.env.catalog_variant);

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "properties": summaries,
            "total": summaries.len()
        }
    })))
}

pub async fn get_property_types(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let options = PropertyTypeOptionDto::for_variant(app_state.env.catalog_variant);

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "types": options
        }
    })))
}

pub async fn get_property_by_id(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let property = app_state.db_client
        .get_property_by_id(property_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::PropertyNotFound.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "property": PropertyDetailDto::from_property(property, app_state.env.catalog_variant)
        }
    })))
}

pub async fn get_my_properties(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let properties = app_state.db_client
        .get_properties_by_owner(&user.user.id)
        .await
        .map_err(ServiceError::from)?;

    let summaries = PropertySummaryDto::from_properties(&properties, app_state.env.catalog_variant);

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "properties": summaries,
            "total": summaries.len()
        }
    })))
}

pub async fn create_property(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreatePropertyDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let property_type = accepted_type(&app_state, body.parsed_type())?
        .ok_or_else(|| HttpError::bad_request("Unknown property type"))?;

    let images = app_state.media.resolve_all(&body.images).await?;

    let property = app_state.db_client
        .create_property(NewProperty {
            title: body.title.trim().to_string(),
            description: body.description,
            location: body.location.trim().to_string(),
            property_type,
            price: body.price,
            bedrooms: body.bedrooms,
            bathrooms: body.bathrooms,
            area: body.area,
            amenities: body.amenities,
            rating: body.rating,
            images,
            owner_id: user.user.id.clone(),
            owner_email: user.user.email.clone(),
        })
        .await
        .map_err(ServiceError::from)?;

    app_state.catalog.invalidate();
    tracing::info!("Property {} created by {}", property.id, user.user.email);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": "Property created successfully",
            "data": {
                "property": PropertyDetailDto::from_property(property, app_state.env.catalog_variant)
            }
        })),
    ))
}

pub async fn update_property(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<UpdatePropertyDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;
    body.check_clear()
        .map_err(HttpError::bad_request)?;

    let property_type = accepted_type(&app_state, body.parsed_type())?;

    let images = match body.replacement_images() {
        Some(references) => Some(app_state.media.resolve_all(references).await?),
        None => None,
    };

    let changes = PropertyUpdate {
        title: body.title.map(|title| title.trim().to_string()),
        description: body.description,
        location: body.location.map(|location| location.trim().to_string()),
        property_type,
        price: body.price,
        bedrooms: body.bedrooms,
        bathrooms: body.bathrooms,
        area: body.area,
        amenities: body.amenities,
        rating: body.rating,
        images,
        clear: body.clear,
    };

    let property = app_state.db_client
        .update_property(property_id, changes)
        .await
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::PropertyNotFound(property_id))?;

    app_state.catalog.invalidate();

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Property updated successfully",
        "data": {
            "property": PropertyDetailDto::from_property(property, app_state.env.catalog_variant)
        }
    })))
}

pub async fn update_property_status(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<UpdatePropertyStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let current = app_state.db_client
        .get_property_by_id(property_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::PropertyNotFound(property_id))?;

    let property = if current.status == body.status {
        current
    } else {
        if !current.status.can_transition_to(body.status) {
            return Err(ServiceError::InvalidStatusTransition {
                from: current.status,
                to: body.status,
            }
            .into());
        }

        let updated = app_state.db_client
            .update_property_status(property_id, current.status, body.status)
            .await
            .map_err(ServiceError::from)?
            .ok_or(ServiceError::ConcurrentModification(property_id))?;

        app_state.catalog.invalidate();
        tracing::info!(
            "Property {} moved from {} to {}",
            property_id,
            current.status.to_str(),
            updated.status.to_str()
        );
        updated
    };

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "property": PropertyDetailDto::from_property(property, app_state.env.catalog_variant)
        }
    })))
}

pub async fn delete_property(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let deleted = app_state.db_client
        .delete_property(property_id)
        .await
        .map_err(ServiceError::from)?;

    if !deleted {
        return Err(HttpError::not_found(ErrorMessage::PropertyNotFound.to_string()));
    }

    app_state.catalog.invalidate();
    tracing::info!("Property {} deleted", property_id);

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Property deleted successfully"
    })))
}
