use crate::domain::{
    models::application::{Application, ApplicationState},
    ports::ApplicationRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

pub struct SqliteApplicationRepo {
    pool: SqlitePool,
}

impl SqliteApplicationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn exists(&self, sql: &str, user_id: &str, subevent_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(sql)
            .bind(user_id)
            .bind(subevent_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count") > 0)
    }
}

#[async_trait]
impl ApplicationRepository for SqliteApplicationRepo {
    async fn create(
        &self,
        application: &Application,
        capacity: Option<i64>,
    ) -> Result<Application, AppError> {
        // Single guarded insert: the occupancy count and the write cannot be
        // split by a concurrent application taking the last seat.
        sqlx::query_as::<_, Application>(
            "INSERT INTO applications (id, user_id, subevent_id, state, created_at)
             SELECT ?, ?, ?, ?, ?
             WHERE ? IS NULL OR (
                 SELECT COUNT(DISTINCT a.user_id) FROM applications a
                 JOIN users u ON u.id = a.user_id AND u.approved = 1
                 WHERE a.subevent_id = ? AND a.state IN ('WAITING_FOR_PAYMENT', 'PAID')
             ) < ?
             RETURNING *",
        )
        .bind(&application.id)
        .bind(&application.user_id)
        .bind(&application.subevent_id)
        .bind(application.state)
        .bind(application.created_at)
        .bind(capacity)
        .bind(&application.subevent_id)
        .bind(capacity)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::CapacityExceeded("Subevent is full".into()))
    }

    async fn set_state(&self, id: &str, state: ApplicationState) -> Result<Application, AppError> {
        sqlx::query_as::<_, Application>(
            "UPDATE applications SET state = ? WHERE id = ? RETURNING *",
        )
        .bind(state)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::NotFound("Application not found".into()))
    }

    async fn has_active(&self, user_id: &str, subevent_id: &str) -> Result<bool, AppError> {
        self.exists(
            "SELECT COUNT(*) as count FROM applications
             WHERE user_id = ? AND subevent_id = ? AND state IN ('WAITING_FOR_PAYMENT', 'PAID')",
            user_id,
            subevent_id,
        )
        .await
    }

    async fn has_paid(&self, user_id: &str, subevent_id: &str) -> Result<bool, AppError> {
        self.exists(
            "SELECT COUNT(*) as count FROM applications
             WHERE user_id = ? AND subevent_id = ? AND state = 'PAID'",
            user_id,
            subevent_id,
        )
        .await
    }
}
