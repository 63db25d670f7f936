//! Utility modules
//!
//! This module contains common utilities used throughout the application,
//! including error handling, logging setup, security primitives and helper
//! functions.

pub mod errors;
pub mod helpers;
pub mod logging;
pub mod security;

pub use errors::{AluMapError, Result};
