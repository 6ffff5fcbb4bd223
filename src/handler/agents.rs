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
    db::agentdb::AgentExt,
    dtos::{
        agentdtos::{CreateAgentDto, UpdateAgentDto},
        commondtos::{non_blank, RequestQueryDto},
    },
    error::{ErrorMessage, HttpError},
    middleware::role_check,
    models::{
        agentmodel::{AgentUpdate, NewAgent},
        usermodel::UserRole,
    },
    service::error::ServiceError,
    AppState,
};

pub fn agent_handler() -> Router {
    Router::new().route("/", get(get_agents))
}

pub fn admin_agent_handler() -> Router {
    Router::new()
        .route("/", post(create_agent))
        .route("/:agent_id", put(update_agent).delete(delete_agent))
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }))
}

pub async fn get_agents(
    Query(query_params): Query<RequestQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    query_params.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let agents = app_state.db_client
        .get_agents(query_params.limit)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "agents": agents,
            "total": agents.len()
        }
    })))
}

pub async fn create_agent(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateAgentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let photo_url = match non_blank(&body.photo) {
        Some(photo) => app_state.media.resolve(&photo).await?,
        None => String::new(),
    };

    let agent = app_state.db_client
        .create_agent(NewAgent {
            full_name: body.full_name.trim().to_string(),
            specialization: body.specialization,
            experience_years: body.experience_years,
            phone: body.phone,
            email: body.email,
            photo_url,
        })
        .await
        .map_err(ServiceError::from)?;

    tracing::info!("Agent {} added", agent.id);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "data": {
                "agent": agent
            }
        })),
    ))
}

pub async fn update_agent(
    Path(agent_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<UpdateAgentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let photo_url = match non_blank(&body.photo) {
        Some(photo) => Some(app_state.media.resolve(&photo).await?),
        None => None,
    };

    let agent = app_state.db_client
        .update_agent(
            agent_id,
            AgentUpdate {
                full_name: body.full_name,
                specialization: body.specialization,
                experience_years: body.experience_years,
                phone: body.phone,
                email: body.email,
                photo_url,
            },
        )
        .await
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::AgentNotFound(agent_id))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "agent": agent
        }
    })))
}

pub async fn delete_agent(
    Path(agent_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let deleted = app_state.db_client
        .delete_agent(agent_id)
        .await
        .map_err(ServiceError::from)?;

    if !deleted {
        return Err(HttpError::not_found(ErrorMessage::AgentNotFound.to_string()));
    }

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Agent deleted successfully"
    })))
}
