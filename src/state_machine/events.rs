use serde::{Deserialize, Serialize};

/// Events that move a pipeline between stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PipelineEvent {
    /// Begin reading the record
    Start,
    /// The record (or its absence, for creates) is known
    RecordRead,
    /// Endorsing organizations are fixed
    EndorsersResolved,
    /// The invocation is ready
    InvocationBuilt,
    /// Ordering and commit succeeded
    Committed,
    /// The post-commit read succeeded
    Confirmed,
    /// Abort with error message
    Fail(String),
}

impl PipelineEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::RecordRead => "record_read",
            Self::EndorsersResolved => "endorsers_resolved",
            Self::InvocationBuilt => "invocation_built",
            Self::Committed => "committed",
            Self::Confirmed => "confirmed",
            Self::Fail(_) => "fail",
        }
    }

    /// Create a failure event with the given error message
    pub fn fail_with_error(error: impl Into<String>) -> Self {
        Self::Fail(error.into())
    }
}
