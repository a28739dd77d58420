use crate::error::ResponseStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generic `{status, message}` body; errors use the same shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub status: ResponseStatus,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubeventResponse {
    pub id: String,
    pub name: String,
    pub capacity: Option<i64>,
    pub implicit: bool,
    pub fee: i64,
    pub occupied: i64,
    /// `null` for unlimited capacity.
    pub remaining: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubeventOptionResponse {
    pub id: String,
    /// Name, with "(occupied/total)" appended for limited capacity.
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfigResponse {
    pub seminar_from_date: String,
    pub seminar_to_date: String,
    pub min_time: String,
    pub max_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockResponse {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub capacity: Option<i64>,
    pub mandatory: bool,
    pub auto_registered: bool,
    pub subevent_id: String,
    pub lectors: Vec<String>,
    pub lectors_names: Vec<String>,
    pub user_allowed: bool,
    pub user_attends: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramResponse {
    pub id: String,
    pub block_id: String,
    pub room_id: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub attendees_count: i64,
    pub user_attends: bool,
    /// Ids of programs this one mutually excludes.
    pub blocks: Vec<String>,
    pub blocked: bool,
    pub paid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramCounts {
    pub attendees_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendProgramResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub program: ProgramCounts,
}
