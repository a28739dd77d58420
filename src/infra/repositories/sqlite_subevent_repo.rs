use crate::domain::{models::subevent::Subevent, ports::SubeventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

pub struct SqliteSubeventRepo {
    pool: SqlitePool,
}

impl SqliteSubeventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubeventRepository for SqliteSubeventRepo {
    async fn create(&self, subevent: &Subevent) -> Result<Subevent, AppError> {
        sqlx::query_as::<_, Subevent>(
            "INSERT INTO subevents (id, name, capacity, implicit, fee, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&subevent.id)
        .bind(&subevent.name)
        .bind(subevent.capacity)
        .bind(subevent.implicit)
        .bind(subevent.fee)
        .bind(subevent.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Subevent>, AppError> {
        sqlx::query_as::<_, Subevent>("SELECT * FROM subevents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_implicit(&self) -> Result<Subevent, AppError> {
        sqlx::query_as::<_, Subevent>("SELECT * FROM subevents WHERE implicit = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::Internal)
    }

    async fn list(&self) -> Result<Vec<Subevent>, AppError> {
        sqlx::query_as::<_, Subevent>("SELECT * FROM subevents ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_explicit(&self) -> Result<Vec<Subevent>, AppError> {
        sqlx::query_as::<_, Subevent>(
            "SELECT * FROM subevents WHERE implicit = 0 ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn name_exists(&self, name: &str, exclude_id: Option<&str>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "SELECT COUNT(*) as count FROM subevents WHERE name = ? AND id != ?",
        )
        .bind(name)
        .bind(exclude_id.unwrap_or(""))
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count") > 0)
    }

    async fn count_approved_users(&self, subevent_id: &str) -> Result<i64, AppError> {
        let result = sqlx::query(
            "SELECT COUNT(DISTINCT a.user_id) as count
             FROM applications a
             JOIN users u ON u.id = a.user_id AND u.approved = 1
             WHERE a.subevent_id = ? AND a.state IN ('WAITING_FOR_PAYMENT', 'PAID')",
        )
        .bind(subevent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count"))
    }

    async fn update(&self, subevent: &Subevent) -> Result<Subevent, AppError> {
        sqlx::query_as::<_, Subevent>(
            "UPDATE subevents SET name = ?, capacity = ?, fee = ? WHERE id = ? RETURNING *",
        )
        .bind(&subevent.name)
        .bind(subevent.capacity)
        .bind(subevent.fee)
        .bind(&subevent.id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn remove(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let implicit_id = sqlx::query("SELECT id FROM subevents WHERE implicit = 1")
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .get::<String, _>("id");

        sqlx::query("UPDATE blocks SET subevent_id = ? WHERE subevent_id = ?")
            .bind(&implicit_id)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM subevents WHERE id = ? AND implicit = 0")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Subevent not found".into()));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
