//! Moderation workflow
//!
//! Admin-only ban and unban of alumni accounts, plus the listings backing
//! the moderation dashboard. A banned account keeps its data but can no
//! longer log in or act.

use uuid::Uuid;

use crate::database::AlumniRepository;
use crate::models::{Actor, Alumni};
use crate::utils::errors::{AluMapError, Result};
use crate::utils::logging::log_admin_action;

#[derive(Clone)]
pub struct ModerationService {
    alumni: AlumniRepository,
}

impl ModerationService {
    /// Create a new ModerationService instance
    pub fn new(alumni: AlumniRepository) -> Self {
        Self { alumni }
    }

    /// Ban an alumni account. A no-op ban is reported as a conflict.
    pub async fn ban(&self, actor: &Actor, alumni_id: Uuid) -> Result<Alumni> {
        self.set_ban(actor, alumni_id, true).await
    }

    /// Lift a ban
    pub async fn unban(&self, actor: &Actor, alumni_id: Uuid) -> Result<Alumni> {
        self.set_ban(actor, alumni_id, false).await
    }

    async fn set_ban(&self, actor: &Actor, alumni_id: Uuid, banned: bool) -> Result<Alumni> {
        require_admin(actor)?;

        let alumni = self
            .alumni
            .find_by_id(alumni_id)
            .await?
            .ok_or_else(|| AluMapError::not_found("User"))?;

        if alumni.is_banned == banned {
            let message = if banned {
                "User is already banned"
            } else {
                "User is not banned"
            };
            return Err(AluMapError::Conflict(message.to_string()));
        }

        let alumni = self.alumni.set_ban_status(alumni_id, banned).await?;
        let action = if banned { "ban" } else { "unban" };
        log_admin_action(actor.id(), action, Some(&alumni.email));
        Ok(alumni)
    }

    /// Paginated listing of every alumni account
    pub async fn list_alumni(
        &self,
        actor: &Actor,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Alumni>> {
        require_admin(actor)?;
        self.alumni.list(limit, offset).await
    }

    /// Listing of currently banned accounts
    pub async fn list_banned(&self, actor: &Actor) -> Result<Vec<Alumni>> {
        require_admin(actor)?;
        self.alumni.list_banned().await
    }
}

fn require_admin(actor: &Actor) -> Result<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AluMapError::Forbidden(
            "You are not authorized to access this resource".to_string(),
        ))
    }
}
