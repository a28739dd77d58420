use crate::config::Config;
use crate::domain::ports::{
    ApplicationRepository, BlockRepository, ProgramRepository, RoomRepository, SettingsRepository,
    SubeventRepository, UserRepository,
};
use crate::domain::services::registration::RegistrationService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub subevent_repo: Arc<dyn SubeventRepository>,
    pub block_repo: Arc<dyn BlockRepository>,
    pub room_repo: Arc<dyn RoomRepository>,
    pub program_repo: Arc<dyn ProgramRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub application_repo: Arc<dyn ApplicationRepository>,
    pub settings_repo: Arc<dyn SettingsRepository>,
    pub registration_service: Arc<RegistrationService>,
}
