use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{
    CreateApplicationRequest, CreateProgramRequest, CreateRoomRequest, CreateUserRequest,
    UpdateApplicationStateRequest, UpdateSettingRequest,
};
use crate::domain::models::{
    application::{Application, User},
    program::{Program, Room},
};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, AppError> {
    let room = Room::new(payload.name);
    let created = state.room_repo.create(&room).await?;
    Ok(Json(created))
}

pub async fn create_program(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateProgramRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.end <= payload.start {
        return Err(AppError::Validation(
            "Program end must be after its start".into(),
        ));
    }
    state
        .block_repo
        .find_by_id(&payload.block_id)
        .await?
        .ok_or(AppError::NotFound("Block not found".into()))?;
    if let Some(room_id) = &payload.room_id {
        state
            .room_repo
            .find_by_id(room_id)
            .await?
            .ok_or(AppError::NotFound("Room not found".into()))?;
    }

    let program = Program::new(payload.block_id, payload.room_id, payload.start, payload.end);
    let created = state.program_repo.create(&program).await?;
    info!("Created program: {} [{} - {}]", created.id, created.start_time, created.end_time);
    Ok(Json(created))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let users = state.user_repo.list().await?;
    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = User::new(payload.name, payload.approved, payload.allowed_register_programs);
    let created = state.user_repo.create(&user).await?;
    Ok(Json(created))
}

pub async fn create_application(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateApplicationRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .user_repo
        .find_by_id(&payload.user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;
    let subevent = state
        .subevent_repo
        .find_by_id(&payload.subevent_id)
        .await?
        .ok_or(AppError::NotFound("Subevent not found".into()))?;

    // A closed subevent is never assignable; fullness is enforced by the
    // guarded insert in the repository.
    if subevent.capacity == Some(0) {
        return Err(AppError::CapacityExceeded("Subevent is closed".into()));
    }

    let application = Application::new(payload.user_id, payload.subevent_id);
    let created = state
        .application_repo
        .create(&application, subevent.capacity)
        .await?;
    info!(
        "Created application: user {} -> subevent {}",
        created.user_id, created.subevent_id
    );
    Ok(Json(created))
}

pub async fn update_application_state(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateApplicationStateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.application_repo.set_state(&id, payload.state).await?;
    info!("Application {} -> {:?}", updated.id, updated.state);
    Ok(Json(updated))
}

pub async fn get_setting(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let value = state
        .settings_repo
        .get(&key)
        .await?
        .ok_or(AppError::NotFound("Setting not found".into()))?;
    Ok(Json(serde_json::json!({ "key": key, "value": value })))
}

pub async fn put_setting(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(payload): Json<UpdateSettingRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.settings_repo.set(&key, &payload.value).await?;
    Ok(Json(serde_json::json!({ "key": key, "value": payload.value })))
}
