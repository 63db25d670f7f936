//! Database service layer
//!
//! Bundles all repositories behind one handle for service construction.

use crate::database::{
    AdminRepository, AllowedEmailRepository, AlumniRepository, CityRepository, DatabasePool,
    EventRepository, SettingsRepository, VerificationRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub alumni: AlumniRepository,
    pub admins: AdminRepository,
    pub events: EventRepository,
    pub verifications: VerificationRepository,
    pub allowed_emails: AllowedEmailRepository,
    pub settings: SettingsRepository,
    pub cities: CityRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            alumni: AlumniRepository::new(pool.clone()),
            admins: AdminRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            verifications: VerificationRepository::new(pool.clone()),
            allowed_emails: AllowedEmailRepository::new(pool.clone()),
            settings: SettingsRepository::new(pool.clone()),
            cities: CityRepository::new(pool),
        }
    }
}
