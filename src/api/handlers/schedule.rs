use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::api::dtos::responses::{
    AttendProgramResponse, BlockResponse, CalendarConfigResponse, ProgramCounts, ProgramResponse,
    RoomResponse,
};
use crate::api::extractors::user::CurrentUser;
use crate::domain::ports::settings_keys;
use crate::domain::services::exclusion;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_calendar_config(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let settings = &state.settings_repo;
    Ok(Json(CalendarConfigResponse {
        seminar_from_date: settings
            .get_or(settings_keys::SEMINAR_FROM_DATE, "2000-01-01")
            .await?,
        seminar_to_date: settings
            .get_or(settings_keys::SEMINAR_TO_DATE, "2000-01-01")
            .await?,
        min_time: settings.get_or(settings_keys::MIN_TIME, "0").await?,
        max_time: settings.get_or(settings_keys::MAX_TIME, "24").await?,
    }))
}

pub async fn get_blocks(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let blocks = state.block_repo.list().await?;
    let attended = state.program_repo.list_attended_by_user(&user.id).await?;
    let attended_blocks: HashSet<&str> = attended.iter().map(|p| p.block_id.as_str()).collect();
    let user_allowed = user.may_register_programs();

    let mut out = Vec::with_capacity(blocks.len());
    for block in blocks {
        let lectors = state.block_repo.find_lectors(&block.id).await?;
        out.push(BlockResponse {
            user_attends: attended_blocks.contains(block.id.as_str()),
            user_allowed,
            lectors: lectors.iter().map(|l| l.id.clone()).collect(),
            lectors_names: lectors.into_iter().map(|l| l.name).collect(),
            id: block.id,
            name: block.name,
            category: block.category,
            capacity: block.capacity,
            mandatory: block.mandatory,
            auto_registered: block.auto_registered,
            subevent_id: block.subevent_id,
        });
    }
    Ok(Json(out))
}

pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let rooms = state.room_repo.list().await?;
    Ok(Json(
        rooms
            .into_iter()
            .map(|r| RoomResponse { id: r.id, name: r.name })
            .collect::<Vec<_>>(),
    ))
}

pub async fn get_programs(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let programs = state.program_repo.list().await?;
    let counts = state.program_repo.attendee_counts().await?;
    let attended = state.program_repo.list_attended_by_user(&user.id).await?;
    let attended_ids: HashSet<&str> = attended.iter().map(|p| p.id.as_str()).collect();
    let exclusions = state.block_repo.exclusion_map().await?;

    let blocks = state.block_repo.list().await?;
    let subevent_by_block: HashMap<&str, &str> = blocks
        .iter()
        .map(|b| (b.id.as_str(), b.subevent_id.as_str()))
        .collect();

    // Payment gate per subevent, resolved once per distinct subevent.
    let mut paid_by_subevent: HashMap<String, bool> = HashMap::new();
    for subevent_id in subevent_by_block.values() {
        if !paid_by_subevent.contains_key(*subevent_id) {
            let paid = state
                .registration_service
                .payment_satisfied(&user.id, subevent_id)
                .await?;
            paid_by_subevent.insert((*subevent_id).to_string(), paid);
        }
    }

    let mut out = Vec::with_capacity(programs.len());
    for program in &programs {
        let user_attends = attended_ids.contains(program.id.as_str());
        let blocked = !user_attends
            && attended
                .iter()
                .filter(|q| q.id != program.id)
                .any(|q| exclusion::mutually_excludes(program, q, &exclusions));
        let paid = subevent_by_block
            .get(program.block_id.as_str())
            .and_then(|s| paid_by_subevent.get(*s))
            .copied()
            .unwrap_or(false);

        let mut blocks_list: Vec<String> =
            exclusion::compute_blocked_set(program, &programs, &exclusions)
                .into_iter()
                .collect();
        blocks_list.sort();

        out.push(ProgramResponse {
            id: program.id.clone(),
            block_id: program.block_id.clone(),
            room_id: program.room_id.clone(),
            start: program.start_time,
            end: program.end_time,
            attendees_count: counts.get(&program.id).copied().unwrap_or(0),
            user_attends,
            blocks: blocks_list,
            blocked,
            paid,
        });
    }
    Ok(Json(out))
}

pub async fn attend_program(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(program_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state
        .registration_service
        .attend(&user.id, &program_id)
        .await?;
    Ok(Json(AttendProgramResponse {
        status: outcome.status,
        message: outcome.message,
        program: ProgramCounts {
            attendees_count: outcome.attendees_count,
        },
    }))
}

pub async fn unattend_program(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(program_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state
        .registration_service
        .unattend(&user.id, &program_id)
        .await?;
    Ok(Json(AttendProgramResponse {
        status: outcome.status,
        message: outcome.message,
        program: ProgramCounts {
            attendees_count: outcome.attendees_count,
        },
    }))
}
