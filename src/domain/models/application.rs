use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Only `WaitingForPayment` and `Paid` count toward subevent occupancy,
/// and only for approved users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationState {
    WaitingForPayment,
    Paid,
    Canceled,
}

impl ApplicationState {
    pub fn counts_toward_occupancy(self) -> bool {
        matches!(self, ApplicationState::WaitingForPayment | ApplicationState::Paid)
    }
}

/// A user's registration into a subevent.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Application {
    pub id: String,
    pub user_id: String,
    pub subevent_id: String,
    pub state: ApplicationState,
    pub created_at: DateTime<Utc>,
}

impl Application {
    pub fn new(user_id: String, subevent_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            subevent_id,
            state: ApplicationState::WaitingForPayment,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub approved: bool,
    pub allowed_register_programs: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, approved: bool, allowed_register_programs: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            approved,
            allowed_register_programs,
            created_at: Utc::now(),
        }
    }

    /// Whether the schedule accepts attend/unattend actions from this user at all.
    pub fn may_register_programs(&self) -> bool {
        self.approved && self.allowed_register_programs
    }
}
