use super::{events::PipelineEvent, states::PipelineState};
use crate::error::{GepxError, Result};
use tracing::debug;

/// Tracks one pipeline instance through its stages.
///
/// Transitions only move forward; `Failed` and `Reported` are terminal and
/// there is no retry edge.
#[derive(Debug, Clone, Default)]
pub struct PipelineStateMachine {
    current: PipelineState,
    history: Vec<PipelineState>,
}

impl PipelineStateMachine {
    pub fn new() -> Self {
        Self {
            current: PipelineState::Idle,
            history: vec![PipelineState::Idle],
        }
    }

    pub fn current_state(&self) -> PipelineState {
        self.current
    }

    /// Every state entered so far, starting with `Idle`
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    pub fn transition(&mut self, event: PipelineEvent) -> Result<PipelineState> {
        let target = Self::determine_target_state(self.current, &event)?;
        debug!(
            from = %self.current,
            to = %target,
            event = event.event_type(),
            "Pipeline transition"
        );
        self.current = target;
        self.history.push(target);
        Ok(target)
    }

    /// Move to `Failed` from wherever the pipeline stopped.
    ///
    /// Returns the stage that was active when the failure happened.
    pub fn fail(&mut self, error: &GepxError) -> PipelineState {
        let stage = self.current;
        if self.transition(PipelineEvent::fail_with_error(error.to_string())).is_err() {
            debug!(stage = %stage, "Failure reported on a terminal pipeline");
        }
        stage
    }

    fn determine_target_state(
        current: PipelineState,
        event: &PipelineEvent,
    ) -> Result<PipelineState> {
        let target = match (current, event) {
            (PipelineState::Idle, PipelineEvent::Start) => PipelineState::Reading,
            (PipelineState::Reading, PipelineEvent::RecordRead) => PipelineState::Resolving,
            (PipelineState::Resolving, PipelineEvent::EndorsersResolved) => PipelineState::Building,
            (PipelineState::Building, PipelineEvent::InvocationBuilt) => PipelineState::Submitting,
            (PipelineState::Submitting, PipelineEvent::Committed) => PipelineState::Confirming,
            (PipelineState::Confirming, PipelineEvent::Confirmed) => PipelineState::Reported,

            (from, PipelineEvent::Fail(_)) if !from.is_terminal() => PipelineState::Failed,

            (from, _) => {
                return Err(GepxError::StateTransition(format!(
                    "cannot apply {} in state {from}",
                    event.event_type()
                )))
            }
        };
        Ok(target)
    }
}
