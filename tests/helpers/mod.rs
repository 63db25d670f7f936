//! Shared test infrastructure

pub mod database;

pub use database::{test_settings, TestDatabase};
