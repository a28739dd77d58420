use crate::api::dtos::responses::{
    ApiMessage, AttendProgramResponse, BlockResponse, CalendarConfigResponse, ProgramResponse,
    RoomResponse,
};
use crate::domain::services::exclusion::{derive_display_state, DisplayContext, ProgramColor};
use crate::error::ResponseStatus;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Synthetic resource for programs without a room.
pub const UNASSIGNED_ROOM_ID: &str = "0";

#[derive(Debug, Clone)]
pub struct Resource {
    pub id: String,
    pub title: String,
}

/// Per-program view state, derived from the API collections.
#[derive(Debug, Clone)]
pub struct ScheduleEntry {
    pub id: String,
    pub resource_id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub block_id: String,
    pub capacity: Option<i64>,
    pub mandatory: bool,
    pub user_allowed: bool,
    pub attendees_count: i64,
    pub user_attends: bool,
    pub blocked: bool,
    pub paid: bool,
    pub occupied: bool,
    /// Ids of programs this one mutually excludes, as served by the API.
    pub blocks: Vec<String>,
    pub color: ProgramColor,
}

/// Headless schedule state. The UI owns one of these and applies server
/// responses through the reducer methods; updates happen after server
/// confirmation only, never optimistically.
#[derive(Debug, Default)]
pub struct ScheduleStore {
    pub config: Option<CalendarConfigResponse>,
    pub resources: Vec<Resource>,
    pub entries: HashMap<String, ScheduleEntry>,
    pub message: Option<ApiMessage>,
    pub not_registered_mandatory_programs: u32,
    loading: u32,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading > 0
    }

    pub fn loading(&self) -> u32 {
        self.loading
    }

    /// Every begin_request must be paired with one finish_request, on failure
    /// paths too.
    pub fn begin_request(&mut self) {
        self.loading += 1;
    }

    pub fn finish_request(&mut self) {
        debug_assert!(self.loading > 0, "finish_request without begin_request");
        self.loading = self.loading.saturating_sub(1);
    }

    pub fn set_config(&mut self, config: CalendarConfigResponse) {
        self.config = Some(config);
    }

    /// Builds the in-memory maps from the fetched collections.
    pub fn load(
        &mut self,
        blocks: Vec<BlockResponse>,
        rooms: Vec<RoomResponse>,
        programs: Vec<ProgramResponse>,
    ) {
        self.not_registered_mandatory_programs = blocks
            .iter()
            .filter(|b| b.mandatory && b.user_allowed && !b.user_attends)
            .count() as u32;

        self.resources = rooms
            .into_iter()
            .map(|room| Resource {
                id: room.id,
                title: room.name,
            })
            .collect();
        self.resources.push(Resource {
            id: UNASSIGNED_ROOM_ID.to_string(),
            title: "Unassigned".to_string(),
        });

        let blocks_map: HashMap<&str, &BlockResponse> =
            blocks.iter().map(|b| (b.id.as_str(), b)).collect();

        self.entries = programs
            .into_iter()
            .filter_map(|program| {
                let block = blocks_map.get(program.block_id.as_str())?;
                let mut entry = ScheduleEntry {
                    id: program.id.clone(),
                    resource_id: program
                        .room_id
                        .clone()
                        .unwrap_or_else(|| UNASSIGNED_ROOM_ID.to_string()),
                    title: block.name.clone(),
                    start: program.start,
                    end: program.end,
                    block_id: program.block_id,
                    capacity: block.capacity,
                    mandatory: block.mandatory,
                    user_allowed: block.user_allowed,
                    attendees_count: program.attendees_count,
                    user_attends: program.user_attends,
                    blocked: program.blocked,
                    paid: program.paid,
                    occupied: false,
                    blocks: program.blocks,
                    color: ProgramColor::Voluntary,
                };
                refresh(&mut entry);
                Some((program.id, entry))
            })
            .collect();
    }

    pub fn set_message(&mut self, status: ResponseStatus, message: String) {
        self.message = Some(ApiMessage { status, message });
    }

    fn set_user_attends(&mut self, program_id: &str, user_attends: bool) {
        if let Some(entry) = self.entries.get_mut(program_id) {
            entry.user_attends = user_attends;
            refresh(entry);
        }
    }

    fn set_attendees_count(&mut self, program_id: &str, attendees_count: i64) {
        if let Some(entry) = self.entries.get_mut(program_id) {
            entry.attendees_count = attendees_count;
            refresh(entry);
        }
    }

    fn set_blocked(&mut self, program_id: &str, blocked: bool) {
        if let Some(entry) = self.entries.get_mut(program_id) {
            entry.blocked = blocked;
            refresh(entry);
        }
    }

    /// Reconciles a confirmed attend: the attended program's siblings become
    /// blocked and the mandatory counter goes down for a mandatory block.
    pub fn apply_attend_success(&mut self, program_id: &str, response: &AttendProgramResponse) {
        let Some(entry) = self.entries.get(program_id) else {
            return;
        };
        let siblings = entry.blocks.clone();
        let mandatory = entry.mandatory;

        self.set_user_attends(program_id, true);
        self.set_attendees_count(program_id, response.program.attendees_count);
        for sibling in &siblings {
            self.set_blocked(sibling, true);
        }
        if mandatory {
            self.not_registered_mandatory_programs =
                self.not_registered_mandatory_programs.saturating_sub(1);
        }
        self.set_message(response.status, response.message.clone());
    }

    /// Reconciles a confirmed unattend. The blocked set is recomputed from
    /// scratch: siblings stay blocked only if another attended program still
    /// excludes them.
    pub fn apply_unattend_success(&mut self, program_id: &str, response: &AttendProgramResponse) {
        let Some(entry) = self.entries.get(program_id) else {
            return;
        };
        let mandatory = entry.mandatory;

        self.set_user_attends(program_id, false);
        self.set_attendees_count(program_id, response.program.attendees_count);

        let ids: Vec<String> = self.entries.keys().cloned().collect();
        for id in &ids {
            self.set_blocked(id, false);
        }
        let still_blocked: Vec<String> = self
            .entries
            .values()
            .filter(|e| e.user_attends)
            .flat_map(|e| {
                let own_id = e.id.clone();
                e.blocks
                    .iter()
                    .filter(move |id| **id != own_id)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        for id in &still_blocked {
            self.set_blocked(id, true);
        }

        if mandatory {
            self.not_registered_mandatory_programs += 1;
        }
        self.set_message(response.status, response.message.clone());
    }

    /// A structured error body is surfaced unchanged; anything else (transport
    /// failure, malformed body) becomes a generic message.
    pub fn apply_error(&mut self, body: Option<ApiMessage>) {
        self.message = Some(body.unwrap_or(ApiMessage {
            status: ResponseStatus::Danger,
            message: "Unknown error".to_string(),
        }));
    }
}

fn refresh(entry: &mut ScheduleEntry) {
    let state = derive_display_state(&DisplayContext {
        user_attends: entry.user_attends,
        blocked: entry.blocked,
        attendees_count: entry.attendees_count,
        capacity: entry.capacity,
        mandatory: entry.mandatory,
        user_allowed: entry.user_allowed,
        paid: entry.paid,
    });
    entry.occupied = state.occupied;
    entry.color = state.color;
}
