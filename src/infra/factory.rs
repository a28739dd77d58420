use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::registration::RegistrationService;
use crate::infra::repositories::{
    sqlite_application_repo::SqliteApplicationRepo, sqlite_block_repo::SqliteBlockRepo,
    sqlite_program_repo::SqliteProgramRepo, sqlite_room_repo::SqliteRoomRepo,
    sqlite_settings_repo::SqliteSettingsRepo, sqlite_subevent_repo::SqliteSubeventRepo,
    sqlite_user_repo::SqliteUserRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    info!("Initializing SQLite connection with WAL Mode...");

    let opts = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite");

    run_migrations(&pool).await;

    build_state(config, pool)
}

pub fn build_state(config: &Config, pool: SqlitePool) -> AppState {
    let subevent_repo = Arc::new(SqliteSubeventRepo::new(pool.clone()));
    let block_repo = Arc::new(SqliteBlockRepo::new(pool.clone()));
    let room_repo = Arc::new(SqliteRoomRepo::new(pool.clone()));
    let program_repo = Arc::new(SqliteProgramRepo::new(pool.clone()));
    let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
    let application_repo = Arc::new(SqliteApplicationRepo::new(pool.clone()));
    let settings_repo = Arc::new(SqliteSettingsRepo::new(pool));

    let registration_service = Arc::new(RegistrationService::new(
        program_repo.clone(),
        block_repo.clone(),
        application_repo.clone(),
        user_repo.clone(),
        settings_repo.clone(),
    ));

    AppState {
        config: config.clone(),
        subevent_repo,
        block_repo,
        room_repo,
        program_repo,
        user_repo,
        application_repo,
        settings_repo,
        registration_service,
    }
}

pub async fn run_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
