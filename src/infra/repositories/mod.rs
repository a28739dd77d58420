pub mod sqlite_application_repo;
pub mod sqlite_block_repo;
pub mod sqlite_program_repo;
pub mod sqlite_room_repo;
pub mod sqlite_settings_repo;
pub mod sqlite_subevent_repo;
pub mod sqlite_user_repo;
