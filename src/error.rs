//! # Client Error Types
//!
//! Unified error handling for the submission pipeline, the gateway adapters
//! and the CLI. Every variant is fatal to the pipeline instance that raised it.

use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, GepxError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GepxError {
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    #[error("Identity error: {0}")]
    Identity(String),

    #[error("Record not found: {record_id}")]
    NotFound { record_id: String },

    #[error("Unsupported organization count {count} on record {record_id} (expected 1 or 2)")]
    UnsupportedOrganizationCount { record_id: String, count: usize },

    #[error("Endorsement failed: {0}")]
    Endorsement(String),

    #[error("Commit failed (conflicting write: {conflict}): {message}")]
    Commit { message: String, conflict: bool },

    #[error("Malformed response from {context}: {reason}")]
    MalformedResponse { context: String, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("State transition error: {0}")]
    StateTransition(String),
}

impl GepxError {
    pub fn not_found(record_id: impl Into<String>) -> Self {
        Self::NotFound {
            record_id: record_id.into(),
        }
    }

    pub fn malformed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            context: context.into(),
            reason: reason.into(),
        }
    }

    pub fn commit(message: impl Into<String>) -> Self {
        Self::Commit {
            message: message.into(),
            conflict: false,
        }
    }

    /// A commit rejected because another client wrote the same keys first
    pub fn commit_conflict(message: impl Into<String>) -> Self {
        Self::Commit {
            message: message.into(),
            conflict: true,
        }
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Commit { conflict: true, .. })
    }
}

impl From<config::ConfigError> for GepxError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
