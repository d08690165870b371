// State machine module for the submission pipeline
//
// Every pipeline instance walks Idle -> Reading -> Resolving -> Building ->
// Submitting -> Confirming -> Reported, or drops to Failed from any
// non-terminal stage.

pub mod events;
pub mod pipeline_state_machine;
pub mod states;

// Re-export main types for convenient access
pub use events::PipelineEvent;
pub use pipeline_state_machine::PipelineStateMachine;
pub use states::PipelineState;
