use crate::domain::models::{block::Block, program::Program};
use crate::domain::ports::{
    settings_keys, ApplicationRepository, BlockRepository, ProgramRepository, SettingsRepository,
    UserRepository,
};
use crate::domain::services::exclusion;
use crate::error::{AppError, ResponseStatus};
use std::sync::Arc;
use tracing::info;

/// Outcome of an attend/unattend transition, surfaced to the caller unchanged.
pub struct RegistrationOutcome {
    pub status: ResponseStatus,
    pub message: String,
    pub attendees_count: i64,
}

/// Governs attend/unattend transitions for a (user, program) pair, enforcing
/// capacity, mutual exclusion and payment gating. Both operations are
/// idempotent at the observable level: repeating one is a warning no-op that
/// still reports current state.
pub struct RegistrationService {
    programs: Arc<dyn ProgramRepository>,
    blocks: Arc<dyn BlockRepository>,
    applications: Arc<dyn ApplicationRepository>,
    users: Arc<dyn UserRepository>,
    settings: Arc<dyn SettingsRepository>,
}

impl RegistrationService {
    pub fn new(
        programs: Arc<dyn ProgramRepository>,
        blocks: Arc<dyn BlockRepository>,
        applications: Arc<dyn ApplicationRepository>,
        users: Arc<dyn UserRepository>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            programs,
            blocks,
            applications,
            users,
            settings,
        }
    }

    async fn load_program(&self, program_id: &str) -> Result<(Program, Block), AppError> {
        let program = self
            .programs
            .find_by_id(program_id)
            .await?
            .ok_or(AppError::NotFound("Program not found".into()))?;
        let block = self
            .blocks
            .find_by_id(&program.block_id)
            .await?
            .ok_or(AppError::NotFound("Block not found".into()))?;
        Ok((program, block))
    }

    /// Whether the user's application for the block's subevent satisfies the
    /// payment gate. With registration-before-payment enabled an unpaid but
    /// active application is enough.
    pub async fn payment_satisfied(
        &self,
        user_id: &str,
        subevent_id: &str,
    ) -> Result<bool, AppError> {
        let before_payment = self
            .settings
            .get_bool(settings_keys::REGISTER_PROGRAMS_BEFORE_PAYMENT)
            .await?;
        if before_payment {
            self.applications.has_active(user_id, subevent_id).await
        } else {
            self.applications.has_paid(user_id, subevent_id).await
        }
    }

    pub async fn attend(
        &self,
        user_id: &str,
        program_id: &str,
    ) -> Result<RegistrationOutcome, AppError> {
        let (program, block) = self.load_program(program_id).await?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound("User not found".into()))?;
        if !user.may_register_programs() {
            return Err(AppError::Validation(
                "User is not allowed to register programs".into(),
            ));
        }

        if !self.payment_satisfied(user_id, &block.subevent_id).await? {
            return Err(AppError::NotPaid(
                "Subevent registration is not paid".into(),
            ));
        }

        if self.programs.is_attending(user_id, program_id).await? {
            let count = self.programs.count_attendees(program_id).await?;
            return Ok(RegistrationOutcome {
                status: ResponseStatus::Warning,
                message: "Already attending this program".into(),
                attendees_count: count,
            });
        }

        let attended = self.programs.list_attended_by_user(user_id).await?;
        let exclusions = self.blocks.exclusion_map().await?;
        if attended
            .iter()
            .any(|p| exclusion::mutually_excludes(&program, p, &exclusions))
        {
            return Err(AppError::MutuallyExclusive(
                "Program conflicts with an attended program".into(),
            ));
        }

        // Capacity 0 is closed for registration outright.
        if block.capacity == Some(0) {
            return Err(AppError::CapacityExceeded("Program is closed".into()));
        }

        // The repository re-checks capacity inside the write transaction, so
        // two concurrent attends cannot both take the last seat.
        let count = self
            .programs
            .attend(user_id, program_id, block.capacity)
            .await?;

        info!("User {} attends program {}", user_id, program_id);
        Ok(RegistrationOutcome {
            status: ResponseStatus::Success,
            message: "Program attendance confirmed".into(),
            attendees_count: count,
        })
    }

    pub async fn unattend(
        &self,
        user_id: &str,
        program_id: &str,
    ) -> Result<RegistrationOutcome, AppError> {
        let (_, block) = self.load_program(program_id).await?;

        if block.auto_registered {
            return Err(AppError::InvariantViolation(
                "Auto-registered programs cannot be unattended".into(),
            ));
        }

        if !self.programs.is_attending(user_id, program_id).await? {
            let count = self.programs.count_attendees(program_id).await?;
            return Ok(RegistrationOutcome {
                status: ResponseStatus::Warning,
                message: "Not attending this program".into(),
                attendees_count: count,
            });
        }

        let count = self.programs.unattend(user_id, program_id).await?;

        info!("User {} unattends program {}", user_id, program_id);
        Ok(RegistrationOutcome {
            status: ResponseStatus::Success,
            message: "Program attendance cancelled".into(),
            attendees_count: count,
        })
    }
}
