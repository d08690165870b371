use serde::{Deserialize, Serialize};
use std::fmt;

/// Stages of one submission pipeline instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Nothing has happened yet
    #[default]
    Idle,
    /// Reading the record that scopes endorsement
    Reading,
    /// Computing the endorsing organizations
    Resolving,
    /// Assembling public args and private payload
    Building,
    /// Waiting for endorsement, ordering and commit
    Submitting,
    /// Re-reading the record after commit
    Confirming,
    /// Confirmed state handed back to the caller
    Reported,
    /// Aborted; nothing further happens in this instance
    Failed,
}

impl PipelineState {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Reported | Self::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Reading => write!(f, "reading"),
            Self::Resolving => write!(f, "resolving"),
            Self::Building => write!(f, "building"),
            Self::Submitting => write!(f, "submitting"),
            Self::Confirming => write!(f, "confirming"),
            Self::Reported => write!(f, "reported"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
