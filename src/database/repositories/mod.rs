//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod admin;
pub mod allowed_email;
pub mod alumni;
pub mod city;
pub mod event;
pub mod settings;
pub mod verification;

// Re-export repositories
pub use admin::AdminRepository;
pub use allowed_email::AllowedEmailRepository;
pub use alumni::AlumniRepository;
pub use city::CityRepository;
pub use event::{EventRepository, ParticipantOutcome};
pub use settings::SettingsRepository;
pub use verification::{CodeConsumeOutcome, VerificationRepository};
