use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateBlockRequest, CreateExclusionGroupRequest};
use crate::domain::models::block::{Block, ExclusionGroup, NewBlockParams};
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_blocks(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let blocks = state.block_repo.list().await?;
    Ok(Json(blocks))
}

pub async fn create_block(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBlockRequest>,
) -> Result<impl IntoResponse, AppError> {
    let subevent_id = match payload.subevent_id {
        Some(id) => {
            state
                .subevent_repo
                .find_by_id(&id)
                .await?
                .ok_or(AppError::NotFound("Subevent not found".into()))?
                .id
        }
        None => state.subevent_repo.find_implicit().await?.id,
    };

    for lector_id in &payload.lector_ids {
        state
            .user_repo
            .find_by_id(lector_id)
            .await?
            .ok_or(AppError::NotFound("Lector not found".into()))?;
    }

    let block = Block::new(NewBlockParams {
        name: payload.name,
        category: payload.category,
        capacity: payload.capacity,
        mandatory: payload.mandatory,
        auto_registered: payload.auto_registered,
        subevent_id,
    });
    let created = state.block_repo.create(&block, &payload.lector_ids).await?;
    info!("Created block: {}", created.name);
    Ok(Json(created))
}

pub async fn create_exclusion_group(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateExclusionGroupRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.block_ids.len() < 2 {
        return Err(AppError::Validation(
            "An exclusion group needs at least two blocks".into(),
        ));
    }
    for block_id in &payload.block_ids {
        state
            .block_repo
            .find_by_id(block_id)
            .await?
            .ok_or(AppError::NotFound("Block not found".into()))?;
    }

    let group = ExclusionGroup::new(payload.name);
    let created = state
        .block_repo
        .create_exclusion_group(&group, &payload.block_ids)
        .await?;
    info!("Created exclusion group: {}", created.name);
    Ok(Json(created))
}
