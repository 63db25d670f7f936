//! Authenticated actor
//!
//! Admin and Alumni accounts are disjoint. Every authorization check matches
//! exhaustively on this sum type instead of inspecting a runtime type.

use uuid::Uuid;

use super::{Admin, Alumni};

#[derive(Debug, Clone)]
pub enum Actor {
    Admin(Admin),
    Alumni(Alumni),
}

impl Actor {
    pub fn id(&self) -> Uuid {
        match self {
            Actor::Admin(admin) => admin.id,
            Actor::Alumni(alumni) => alumni.id,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Actor::Admin(_))
    }

    /// Admin-or-self rule used by the participation workflow
    pub fn may_act_on(&self, target_id: Uuid) -> bool {
        match self {
            Actor::Admin(_) => true,
            Actor::Alumni(alumni) => alumni.id == target_id,
        }
    }

    /// Owner-or-admin rule used by the event lifecycle workflow
    pub fn may_manage_event(&self, owner_id: Uuid) -> bool {
        match self {
            Actor::Admin(_) => true,
            Actor::Alumni(alumni) => alumni.id == owner_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn alumni(id: Uuid) -> Actor {
        Actor::Alumni(Alumni {
            id,
            email: "a@inst.edu".to_string(),
            hashed_password: String::new(),
            first_name: "Ada".to_string(),
            last_name: "Graduate".to_string(),
            graduation_year: 2020,
            telegram_alias: None,
            is_verified: true,
            is_banned: false,
            created_at: Utc::now(),
        })
    }

    fn admin() -> Actor {
        Actor::Admin(Admin {
            id: Uuid::new_v4(),
            email: "mod@inst.edu".to_string(),
            hashed_password: String::new(),
            created_at: Utc::now(),
        })
    }

    #[test]
    fn test_admin_may_act_on_anyone() {
        assert!(admin().may_act_on(Uuid::new_v4()));
        assert!(admin().may_manage_event(Uuid::new_v4()));
    }

    #[test]
    fn test_alumni_may_only_act_on_self() {
        let id = Uuid::new_v4();
        let actor = alumni(id);
        assert!(actor.may_act_on(id));
        assert!(!actor.may_act_on(Uuid::new_v4()));
    }

    #[test]
    fn test_alumni_may_only_manage_own_event() {
        let id = Uuid::new_v4();
        let actor = alumni(id);
        assert!(actor.may_manage_event(id));
        assert!(!actor.may_manage_event(Uuid::new_v4()));
    }
}
