use serde::{Deserialize, Serialize};
use std::fmt;

pub const REPORT_VALIDATION_FAILED: &str = "REPORT_VALIDATION_FAILED";
pub const REPORT_NOT_FOUND: &str = "REPORT_NOT_FOUND";
pub const REPORT_INVALID_TRANSITION: &str = "REPORT_INVALID_TRANSITION";
pub const PERSISTENCE_FAILED: &str = "PERSISTENCE_FAILED";

/// Single structured error shape returned by every fallible core operation.
///
/// `code` is stable and meant for matching; `message` and `details` are for humans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(REPORT_VALIDATION_FAILED, message)
    }

    pub fn not_found(id: &str) -> Self {
        Self::new(REPORT_NOT_FOUND, "Report not found").with_details(format!("id={id}"))
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::new(PERSISTENCE_FAILED, message)
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
