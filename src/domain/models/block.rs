use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A recurring activity template. Programs are scheduled instances of a block;
/// the block carries the capacity that gates attendance of its programs.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Block {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub capacity: Option<i64>,
    pub mandatory: bool,
    pub auto_registered: bool,
    pub subevent_id: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewBlockParams {
    pub name: String,
    pub category: Option<String>,
    pub capacity: Option<i64>,
    pub mandatory: bool,
    pub auto_registered: bool,
    pub subevent_id: String,
}

impl Block {
    pub fn new(params: NewBlockParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            category: params.category,
            capacity: params.capacity,
            mandatory: params.mandatory,
            auto_registered: params.auto_registered,
            subevent_id: params.subevent_id,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ExclusionGroup {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl ExclusionGroup {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            created_at: Utc::now(),
        }
    }
}
