//! # Submission Pipeline
//!
//! The read-resolve-build-submit-confirm sequence shared by every
//! state-changing operation:
//!
//! 1. [`RecordReader`] reads the record the operation targets
//! 2. [`EndorsementResolver`] turns its participant list into an [`OrgSet`]
//! 3. [`TransactionBuilder`] binds function, public args, endorsers and any
//!    private payload
//! 4. [`SubmissionOrchestrator`] submits once and waits for commit
//! 5. [`ConfirmationReporter`] re-reads the record and reports it
//!
//! Each call to [`Pipeline::run`] is an independent instance with its own
//! [`PipelineStateMachine`]; nothing is cached between runs.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gepx_client::ledger::LedgerGateway;
//! use gepx_client::models::RecordKind;
//! use gepx_client::pipeline::{Operation, Pipeline, PipelineSettings};
//! use std::sync::Arc;
//!
//! # async fn example(gateway: Arc<dyn LedgerGateway>) -> anyhow::Result<()> {
//! let pipeline = Pipeline::new(gateway, PipelineSettings::new(RecordKind::Session, "Org1MSP"));
//! let outcome = pipeline.run("session-1", &Operation::Close).await?;
//! println!("{}", serde_json::to_string_pretty(outcome.record())?);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod operation;
pub mod orchestrator;
pub mod reader;
pub mod reporter;
pub mod resolver;

pub use builder::TransactionBuilder;
pub use operation::{EndorsementSource, Operation, PayloadSource};
pub use orchestrator::SubmissionOrchestrator;
pub use reader::RecordReader;
pub use reporter::{Confirmation, ConfirmationReporter};
pub use resolver::EndorsementResolver;

use crate::config::{ClientConfig, OrganizationProfile};
use crate::error::{GepxError, Result};
use crate::ledger::{CommitReceipt, LedgerGateway, OrgSet};
use crate::logging::{log_error, log_pipeline_stage};
use crate::models::{BidPayload, Record, RecordKind};
use crate::state_machine::{PipelineEvent, PipelineState, PipelineStateMachine};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Per-pipeline settings derived from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub record_kind: RecordKind,
    /// MSP id of the organization the caller acts for
    pub client_msp_id: String,
}

impl PipelineSettings {
    pub fn new(record_kind: RecordKind, client_msp_id: impl Into<String>) -> Self {
        Self {
            record_kind,
            client_msp_id: client_msp_id.into(),
        }
    }

    pub fn from_config(config: &ClientConfig, organization: &OrganizationProfile) -> Self {
        Self::new(config.record_kind, organization.msp_id.clone())
    }
}

/// Everything a successful run produced
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutcome {
    pub run_id: String,
    pub operation: String,
    pub record_id: String,
    pub endorsers: OrgSet,
    pub receipt: CommitReceipt,
    /// Record as read before submitting; `None` for creates
    pub before: Option<Record>,
    pub confirmation: Confirmation,
    /// Id of a newly placed bid, for `Bid`
    pub placed_bid_id: Option<String>,
    pub history: Vec<PipelineState>,
}

impl PipelineOutcome {
    /// The confirmed, post-commit record
    pub fn record(&self) -> &Record {
        &self.confirmation.record
    }
}

/// A run that ended in `Failed`
#[derive(Debug, Clone, Error)]
#[error("{operation} on {record_id} failed while {stage}")]
pub struct PipelineFailure {
    pub operation: String,
    pub record_id: String,
    /// Stage that was active when the error surfaced
    pub stage: PipelineState,
    pub history: Vec<PipelineState>,
    #[source]
    pub error: GepxError,
}

impl PipelineFailure {
    pub fn reached(&self, state: PipelineState) -> bool {
        self.history.contains(&state)
    }
}

pub struct Pipeline {
    gateway: Arc<dyn LedgerGateway>,
    settings: PipelineSettings,
    resolver: EndorsementResolver,
}

impl Pipeline {
    pub fn new(gateway: Arc<dyn LedgerGateway>, settings: PipelineSettings) -> Self {
        Self {
            gateway,
            settings,
            resolver: EndorsementResolver,
        }
    }

    /// Read-only lookup; nothing is endorsed or submitted
    pub async fn query(&self, record_id: &str) -> Result<Record> {
        RecordReader::new(self.gateway.as_ref(), self.settings.record_kind)
            .read(record_id)
            .await
    }

    /// Run one operation end to end
    pub async fn run(
        &self,
        record_id: &str,
        operation: &Operation,
    ) -> std::result::Result<PipelineOutcome, PipelineFailure> {
        let run_id = Uuid::new_v4().to_string();
        let function = operation.function_name(self.settings.record_kind);
        let mut state_machine = PipelineStateMachine::new();

        match self
            .execute(&run_id, record_id, operation, &function, &mut state_machine)
            .await
        {
            Ok(outcome) => Ok(outcome),
            Err(error) => {
                let stage = state_machine.fail(&error);
                log_error(
                    "pipeline",
                    &function,
                    &error.to_string(),
                    Some(&format!("run_id={run_id} record_id={record_id} stage={stage}")),
                );
                Err(PipelineFailure {
                    operation: function,
                    record_id: record_id.to_string(),
                    stage,
                    history: state_machine.history().to_vec(),
                    error,
                })
            }
        }
    }

    async fn execute(
        &self,
        run_id: &str,
        record_id: &str,
        operation: &Operation,
        function: &str,
        state_machine: &mut PipelineStateMachine,
    ) -> Result<PipelineOutcome> {
        let gateway = self.gateway.as_ref();
        let kind = self.settings.record_kind;
        let stage = |state: PipelineState, details: Option<&str>| {
            log_pipeline_stage(run_id, function, record_id, &state.to_string(), details);
        };

        if record_id.trim().is_empty() {
            return Err(GepxError::InvalidInput("record id is empty".into()));
        }

        stage(state_machine.transition(PipelineEvent::Start)?, None);
        let reader = RecordReader::new(gateway, kind);
        let before = if operation.requires_existing_record() {
            Some(reader.read(record_id).await?)
        } else {
            None
        };

        stage(state_machine.transition(PipelineEvent::RecordRead)?, None);
        let endorsers = match operation.endorsement() {
            EndorsementSource::RecordParticipants => {
                let record = before.as_ref().ok_or_else(|| {
                    GepxError::StateTransition(format!(
                        "{function} needs the record's participants but no record was read"
                    ))
                })?;
                self.resolver.resolve(record)?
            }
            EndorsementSource::ClientOrganization => {
                self.resolver.for_client(&self.settings.client_msp_id)?
            }
        };

        let endorsers_text = endorsers.to_string();
        stage(
            state_machine.transition(PipelineEvent::EndorsersResolved)?,
            Some(&endorsers_text),
        );
        let payload = self
            .private_payload(&reader, record_id, &operation.payload_source())
            .await?;
        let invocation = TransactionBuilder::build_invocation(
            function,
            endorsers.clone(),
            operation.public_args(record_id),
            payload,
        )?;

        stage(state_machine.transition(PipelineEvent::InvocationBuilt)?, None);
        let receipt = SubmissionOrchestrator::new(gateway)
            .submit(&invocation)
            .await?;

        stage(
            state_machine.transition(PipelineEvent::Committed)?,
            Some(&receipt.transaction_id),
        );
        let confirmation = ConfirmationReporter::new(RecordReader::new(gateway, kind))
            .confirm(record_id, &receipt, before.as_ref())
            .await?;

        stage(state_machine.transition(PipelineEvent::Confirmed)?, None);
        let placed_bid_id = match operation {
            Operation::PlaceBid { .. } => Some(
                receipt
                    .result_text()?
                    .unwrap_or_else(|| receipt.transaction_id.clone()),
            ),
            _ => None,
        };

        Ok(PipelineOutcome {
            run_id: run_id.to_string(),
            operation: function.to_string(),
            record_id: record_id.to_string(),
            endorsers,
            receipt,
            before,
            confirmation,
            placed_bid_id,
            history: state_machine.history().to_vec(),
        })
    }

    /// Build the private payload right before submission
    async fn private_payload(
        &self,
        reader: &RecordReader<'_>,
        record_id: &str,
        source: &PayloadSource,
    ) -> Result<Option<Vec<u8>>> {
        let payload = match source {
            PayloadSource::None => return Ok(None),
            PayloadSource::StoredBid { bid_id } => {
                let bid = reader.read_bid(record_id, bid_id).await?;
                BidPayload::from(&bid)
            }
            PayloadSource::NewBid { bid_type, volume } => {
                let bidder = reader.client_identity().await?;
                BidPayload::new(*bid_type, *volume, self.settings.client_msp_id.clone(), bidder)?
            }
        };
        payload.to_bytes().map(Some)
    }
}
