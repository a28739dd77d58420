use crate::domain::models::subevent::Subevent;
use crate::domain::ports::SubeventRepository;
use crate::error::AppError;

/// Read-side occupancy projection for a subevent or program capacity scope.
#[derive(Debug, Clone, Copy)]
pub struct Occupancy {
    pub occupied: i64,
    /// `None` for unlimited capacity. May be transiently negative; enforcement
    /// happens at registration time, the projection only reports.
    pub remaining: Option<i64>,
}

pub fn remaining(capacity: Option<i64>, occupied: i64) -> Option<i64> {
    capacity.map(|c| c - occupied)
}

/// Capacity `Some(0)` means closed and is always full; `None` never is.
pub fn is_full(capacity: Option<i64>, occupied: i64) -> bool {
    capacity.is_some_and(|c| occupied >= c)
}

pub async fn subevent_occupancy(
    repo: &dyn SubeventRepository,
    subevent: &Subevent,
) -> Result<Occupancy, AppError> {
    let occupied = repo.count_approved_users(&subevent.id).await?;
    Ok(Occupancy {
        occupied,
        remaining: remaining(subevent.capacity, occupied),
    })
}
