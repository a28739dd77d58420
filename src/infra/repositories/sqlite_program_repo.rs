use crate::domain::{models::program::Program, ports::ProgramRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;

pub struct SqliteProgramRepo {
    pool: SqlitePool,
}

impl SqliteProgramRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn count_in<'c, E>(executor: E, program_id: &str) -> Result<i64, AppError>
where
    E: sqlx::Executor<'c, Database = sqlx::Sqlite>,
{
    let result =
        sqlx::query("SELECT COUNT(*) as count FROM program_attendees WHERE program_id = ?")
            .bind(program_id)
            .fetch_one(executor)
            .await
            .map_err(AppError::Database)?;
    Ok(result.get::<i64, _>("count"))
}

#[async_trait]
impl ProgramRepository for SqliteProgramRepo {
    async fn create(&self, program: &Program) -> Result<Program, AppError> {
        sqlx::query_as::<_, Program>(
            "INSERT INTO programs (id, block_id, room_id, start_time, end_time, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&program.id)
        .bind(&program.block_id)
        .bind(&program.room_id)
        .bind(program.start_time)
        .bind(program.end_time)
        .bind(program.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Program>, AppError> {
        sqlx::query_as::<_, Program>("SELECT * FROM programs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Program>, AppError> {
        sqlx::query_as::<_, Program>("SELECT * FROM programs ORDER BY start_time ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_attendees(&self, program_id: &str) -> Result<i64, AppError> {
        count_in(&self.pool, program_id).await
    }

    async fn attendee_counts(&self) -> Result<HashMap<String, i64>, AppError> {
        let rows = sqlx::query(
            "SELECT program_id, COUNT(*) as count FROM program_attendees GROUP BY program_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get("program_id"), row.get("count")))
            .collect())
    }

    async fn list_attended_by_user(&self, user_id: &str) -> Result<Vec<Program>, AppError> {
        sqlx::query_as::<_, Program>(
            "SELECT p.* FROM programs p
             JOIN program_attendees pa ON pa.program_id = p.id
             WHERE pa.user_id = ?
             ORDER BY p.start_time ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn is_attending(&self, user_id: &str, program_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "SELECT COUNT(*) as count FROM program_attendees WHERE program_id = ? AND user_id = ?",
        )
        .bind(program_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count") > 0)
    }

    async fn attend(
        &self,
        user_id: &str,
        program_id: &str,
        capacity: Option<i64>,
    ) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Single guarded insert: the capacity check and the write cannot be
        // split by a concurrent attend taking the last seat.
        let result = sqlx::query(
            "INSERT INTO program_attendees (program_id, user_id, created_at)
             SELECT ?, ?, ?
             WHERE NOT EXISTS (
                 SELECT 1 FROM program_attendees WHERE program_id = ? AND user_id = ?
             )
             AND (? IS NULL OR (SELECT COUNT(*) FROM program_attendees WHERE program_id = ?) < ?)",
        )
        .bind(program_id)
        .bind(user_id)
        .bind(Utc::now())
        .bind(program_id)
        .bind(user_id)
        .bind(capacity)
        .bind(program_id)
        .bind(capacity)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            let already = sqlx::query(
                "SELECT COUNT(*) as count FROM program_attendees WHERE program_id = ? AND user_id = ?",
            )
            .bind(program_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .get::<i64, _>("count")
                > 0;

            if !already {
                return Err(AppError::CapacityExceeded("Program is full".into()));
            }
        }

        let count = count_in(&mut *tx, program_id).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(count)
    }

    async fn unattend(&self, user_id: &str, program_id: &str) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM program_attendees WHERE program_id = ? AND user_id = ?")
            .bind(program_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let count = count_in(&mut *tx, program_id).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(count)
    }
}
