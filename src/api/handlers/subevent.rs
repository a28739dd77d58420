use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateSubeventRequest, UpdateSubeventRequest};
use crate::api::dtos::responses::{SubeventOptionResponse, SubeventResponse};
use crate::domain::models::subevent::Subevent;
use crate::domain::services::capacity;
use crate::error::AppError;
use crate::state::AppState;

async fn to_response(
    state: &AppState,
    subevent: Subevent,
) -> Result<SubeventResponse, AppError> {
    let occupancy = capacity::subevent_occupancy(state.subevent_repo.as_ref(), &subevent).await?;
    Ok(SubeventResponse {
        id: subevent.id,
        name: subevent.name,
        capacity: subevent.capacity,
        implicit: subevent.implicit,
        fee: subevent.fee,
        occupied: occupancy.occupied,
        remaining: occupancy.remaining,
    })
}

pub async fn list_subevents(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let subevents = state.subevent_repo.list().await?;
    let mut out = Vec::with_capacity(subevents.len());
    for subevent in subevents {
        out.push(to_response(&state, subevent).await?);
    }
    Ok(Json(out))
}

/// Explicit subevents as select options, occupancy appended for limited ones.
pub async fn subevent_options(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let subevents = state.subevent_repo.list_explicit().await?;
    let mut options = Vec::with_capacity(subevents.len());
    for subevent in subevents {
        let label = if subevent.has_limited_capacity() {
            let occupied = state
                .subevent_repo
                .count_approved_users(&subevent.id)
                .await?;
            format!(
                "{} ({}/{})",
                subevent.name,
                occupied,
                subevent.capacity.unwrap_or(0)
            )
        } else {
            subevent.name.clone()
        };
        options.push(SubeventOptionResponse {
            id: subevent.id,
            label,
        });
    }
    Ok(Json(options))
}

pub async fn get_subevent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let subevent = state
        .subevent_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Subevent not found".into()))?;
    Ok(Json(to_response(&state, subevent).await?))
}

pub async fn create_subevent(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateSubeventRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Subevent name must not be empty".into()));
    }
    if state.subevent_repo.name_exists(&payload.name, None).await? {
        return Err(AppError::Validation("Subevent name already exists".into()));
    }

    let subevent = Subevent::new(payload.name, payload.capacity, payload.fee.unwrap_or(0));
    let created = state.subevent_repo.create(&subevent).await?;
    info!("Created subevent: {}", created.name);
    Ok(Json(to_response(&state, created).await?))
}

pub async fn update_subevent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSubeventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut subevent = state
        .subevent_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Subevent not found".into()))?;

    if subevent.implicit {
        return Err(AppError::InvariantViolation(
            "The implicit subevent cannot be edited".into(),
        ));
    }
    if state
        .subevent_repo
        .name_exists(&payload.name, Some(&id))
        .await?
    {
        return Err(AppError::Validation("Subevent name already exists".into()));
    }

    subevent.name = payload.name;
    subevent.capacity = payload.capacity;
    if let Some(fee) = payload.fee {
        subevent.fee = fee;
    }

    let updated = state.subevent_repo.update(&subevent).await?;
    Ok(Json(to_response(&state, updated).await?))
}

/// Deleting a subevent first reassigns its blocks to the implicit subevent,
/// so no block is ever orphaned.
pub async fn delete_subevent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let subevent = state
        .subevent_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Subevent not found".into()))?;

    if subevent.implicit {
        return Err(AppError::InvariantViolation(
            "The implicit subevent cannot be deleted".into(),
        ));
    }

    state.subevent_repo.remove(&id).await?;
    info!("Deleted subevent: {} ({})", subevent.name, id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
