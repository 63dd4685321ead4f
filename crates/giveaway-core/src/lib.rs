//! # giveaway-core
//!
//! Shared building blocks for the giveaway service:
//! - configuration types and the file+env loader
//! - registration input validation
//! - shareable link token generation

pub mod config;
pub mod link;
pub mod registration;

pub use config::{load_config, AdminConfig, AppConfig, DatabaseConfig, ServerConfig};
pub use link::{compose_link, generate_token, TOKEN_LEN};
pub use registration::{RegistrationInput, ValidRegistration, ValidationError};
