use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registrable sub-part of the seminar. Capacity `None` means unlimited,
/// `Some(0)` means closed. Exactly one subevent is implicit; it absorbs the
/// blocks of deleted subevents and can itself never be deleted.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Subevent {
    pub id: String,
    pub name: String,
    pub capacity: Option<i64>,
    pub implicit: bool,
    pub fee: i64,
    pub created_at: DateTime<Utc>,
}

impl Subevent {
    pub fn new(name: String, capacity: Option<i64>, fee: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            capacity,
            implicit: false,
            fee,
            created_at: Utc::now(),
        }
    }

    pub fn has_limited_capacity(&self) -> bool {
        self.capacity.is_some()
    }
}
