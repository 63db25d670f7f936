//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod actor;
pub mod admin;
pub mod alumni;
pub mod city;
pub mod event;
pub mod event_settings;
pub mod verification;

// Re-export commonly used models
pub use actor::Actor;
pub use admin::{Admin, CreateAdminRequest};
pub use alumni::{Alumni, CreateAlumniRecord, RegisterAlumniRequest};
pub use city::{City, Coordinates};
pub use event::{
    ApprovalStatus, CreateEventRequest, Event, EventChanges, TimeFilter, UpdateEventRequest,
};
pub use event_settings::{EventSettings, EVENT_SETTINGS_KEY};
pub use verification::VerificationRecord;
