use crate::domain::{
    models::{
        application::User,
        block::{Block, ExclusionGroup},
    },
    ports::BlockRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::collections::{HashMap, HashSet};

pub struct SqliteBlockRepo {
    pool: SqlitePool,
}

impl SqliteBlockRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlockRepository for SqliteBlockRepo {
    async fn create(&self, block: &Block, lector_ids: &[String]) -> Result<Block, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Block>(
            "INSERT INTO blocks (id, name, category, capacity, mandatory, auto_registered, subevent_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&block.id)
        .bind(&block.name)
        .bind(&block.category)
        .bind(block.capacity)
        .bind(block.mandatory)
        .bind(block.auto_registered)
        .bind(&block.subevent_id)
        .bind(block.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        for lector_id in lector_ids {
            sqlx::query("INSERT INTO block_lectors (block_id, user_id) VALUES (?, ?)")
                .bind(&block.id)
                .bind(lector_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Block>, AppError> {
        sqlx::query_as::<_, Block>("SELECT * FROM blocks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Block>, AppError> {
        sqlx::query_as::<_, Block>("SELECT * FROM blocks ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_lectors(&self, block_id: &str) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT u.* FROM users u
             JOIN block_lectors bl ON bl.user_id = u.id
             WHERE bl.block_id = ?
             ORDER BY u.name ASC",
        )
        .bind(block_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn create_exclusion_group(
        &self,
        group: &ExclusionGroup,
        block_ids: &[String],
    ) -> Result<ExclusionGroup, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, ExclusionGroup>(
            "INSERT INTO exclusion_groups (id, name, created_at) VALUES (?, ?, ?) RETURNING *",
        )
        .bind(&group.id)
        .bind(&group.name)
        .bind(group.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        for block_id in block_ids {
            sqlx::query("INSERT INTO exclusion_group_blocks (group_id, block_id) VALUES (?, ?)")
                .bind(&group.id)
                .bind(block_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn exclusion_map(&self) -> Result<HashMap<String, HashSet<String>>, AppError> {
        let rows = sqlx::query(
            "SELECT a.block_id as block_id, b.block_id as excluded_block_id
             FROM exclusion_group_blocks a
             JOIN exclusion_group_blocks b
               ON a.group_id = b.group_id AND a.block_id != b.block_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let mut map: HashMap<String, HashSet<String>> = HashMap::new();
        for row in rows {
            map.entry(row.get("block_id"))
                .or_default()
                .insert(row.get("excluded_block_id"));
        }
        Ok(map)
    }
}
