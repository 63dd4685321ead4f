//! Registration input validation.

use thiserror::Error;

/// Rejections surfaced to the visitor when a submission is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("all fields are required")]
    MissingField,

    #[error("phone number must be 11 or 12 digits")]
    InvalidPhone,
}

/// Raw form fields as submitted by the visitor.
#[derive(Debug, Clone)]
pub struct RegistrationInput {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// A submission that passed validation; fields are trimmed.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl RegistrationInput {
    /// Validate the submission: all fields non-empty after trimming, phone
    /// exactly 11 or 12 ASCII digits (no '+', no separators).
    pub fn validate(self) -> Result<ValidRegistration, ValidationError> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        let phone = self.phone.trim().to_string();

        if name.is_empty() || email.is_empty() || phone.is_empty() {
            return Err(ValidationError::MissingField);
        }

        if !matches!(phone.len(), 11 | 12) || !phone.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidPhone);
        }

        Ok(ValidRegistration { name, email, phone })
    }
}
