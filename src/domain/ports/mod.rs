use crate::domain::models::{
    application::{Application, ApplicationState, User},
    block::{Block, ExclusionGroup},
    program::{Program, Room},
    subevent::Subevent,
};
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

/// Seminar-wide settings keys.
pub mod settings_keys {
    pub const SEMINAR_FROM_DATE: &str = "seminar_from_date";
    pub const SEMINAR_TO_DATE: &str = "seminar_to_date";
    pub const MIN_TIME: &str = "min_time";
    pub const MAX_TIME: &str = "max_time";
    pub const REGISTER_PROGRAMS_BEFORE_PAYMENT: &str = "register_programs_before_payment";
}

#[async_trait]
pub trait SubeventRepository: Send + Sync {
    async fn create(&self, subevent: &Subevent) -> Result<Subevent, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Subevent>, AppError>;
    /// The implicit subevent always exists; a missing row is a broken database.
    async fn find_implicit(&self) -> Result<Subevent, AppError>;
    async fn list(&self) -> Result<Vec<Subevent>, AppError>;
    /// Non-implicit subevents, ordered by name.
    async fn list_explicit(&self) -> Result<Vec<Subevent>, AppError>;
    async fn name_exists(&self, name: &str, exclude_id: Option<&str>) -> Result<bool, AppError>;
    /// Distinct approved users with an application in WAITING_FOR_PAYMENT or PAID.
    async fn count_approved_users(&self, subevent_id: &str) -> Result<i64, AppError>;
    async fn update(&self, subevent: &Subevent) -> Result<Subevent, AppError>;
    /// Reassigns the subevent's blocks to the implicit subevent and deletes it,
    /// in one transaction. The caller must reject implicit subevents first.
    async fn remove(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BlockRepository: Send + Sync {
    async fn create(&self, block: &Block, lector_ids: &[String]) -> Result<Block, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Block>, AppError>;
    async fn list(&self) -> Result<Vec<Block>, AppError>;
    async fn find_lectors(&self, block_id: &str) -> Result<Vec<User>, AppError>;
    async fn create_exclusion_group(
        &self,
        group: &ExclusionGroup,
        block_ids: &[String],
    ) -> Result<ExclusionGroup, AppError>;
    /// Block id -> block ids excluded through a shared exclusion group.
    async fn exclusion_map(&self) -> Result<HashMap<String, HashSet<String>>, AppError>;
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, room: &Room) -> Result<Room, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Room>, AppError>;
    async fn list(&self) -> Result<Vec<Room>, AppError>;
}

#[async_trait]
pub trait ProgramRepository: Send + Sync {
    async fn create(&self, program: &Program) -> Result<Program, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Program>, AppError>;
    async fn list(&self) -> Result<Vec<Program>, AppError>;
    async fn count_attendees(&self, program_id: &str) -> Result<i64, AppError>;
    /// Attendee counts for all programs in one query, keyed by program id.
    async fn attendee_counts(&self) -> Result<HashMap<String, i64>, AppError>;
    async fn list_attended_by_user(&self, user_id: &str) -> Result<Vec<Program>, AppError>;
    async fn is_attending(&self, user_id: &str, program_id: &str) -> Result<bool, AppError>;
    /// Creates the attendance row and returns the new attendee count. The
    /// capacity check and the insert run in one transaction; a full program
    /// fails with `CapacityExceeded` and writes nothing. Attending an already
    /// attended program is a no-op returning the current count.
    async fn attend(
        &self,
        user_id: &str,
        program_id: &str,
        capacity: Option<i64>,
    ) -> Result<i64, AppError>;
    /// Removes the attendance row and returns the new attendee count.
    /// Unattending a non-attended program is a no-op.
    async fn unattend(&self, user_id: &str, program_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Creates the application. The subevent occupancy check runs as a guard
    /// on the insert itself, so two concurrent applications cannot both take
    /// the last seat; a full subevent fails with `CapacityExceeded` and
    /// writes nothing.
    async fn create(
        &self,
        application: &Application,
        capacity: Option<i64>,
    ) -> Result<Application, AppError>;
    async fn set_state(&self, id: &str, state: ApplicationState) -> Result<Application, AppError>;
    /// State is WAITING_FOR_PAYMENT or PAID.
    async fn has_active(&self, user_id: &str, subevent_id: &str) -> Result<bool, AppError>;
    async fn has_paid(&self, user_id: &str, subevent_id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    async fn get_or(&self, key: &str, default: &str) -> Result<String, AppError> {
        Ok(self.get(key).await?.unwrap_or_else(|| default.to_string()))
    }

    async fn get_bool(&self, key: &str) -> Result<bool, AppError> {
        Ok(self
            .get(key)
            .await?
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false))
    }
}
