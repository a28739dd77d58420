use crate::domain::models::application::ApplicationState;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateSubeventRequest {
    pub name: String,
    pub capacity: Option<i64>,
    pub fee: Option<i64>,
}

/// PUT semantics: absent capacity means unlimited.
#[derive(Deserialize)]
pub struct UpdateSubeventRequest {
    pub name: String,
    pub capacity: Option<i64>,
    pub fee: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateBlockRequest {
    pub name: String,
    pub category: Option<String>,
    pub capacity: Option<i64>,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub auto_registered: bool,
    /// Defaults to the implicit subevent.
    pub subevent_id: Option<String>,
    #[serde(default)]
    pub lector_ids: Vec<String>,
}

#[derive(Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateProgramRequest {
    pub block_id: String,
    pub room_id: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub allowed_register_programs: bool,
}

#[derive(Deserialize)]
pub struct CreateApplicationRequest {
    pub user_id: String,
    pub subevent_id: String,
}

#[derive(Deserialize)]
pub struct UpdateApplicationStateRequest {
    pub state: ApplicationState,
}

#[derive(Deserialize)]
pub struct CreateExclusionGroupRequest {
    pub name: String,
    pub block_ids: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateSettingRequest {
    pub value: String,
}
