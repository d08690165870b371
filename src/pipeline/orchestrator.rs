//! Submission Orchestrator: one attempt, no retries.

use crate::error::{GepxError, Result};
use crate::ledger::{CommitReceipt, LedgerGateway, PendingInvocation};
use std::time::Instant;
use tracing::{info, warn};

pub struct SubmissionOrchestrator<'a> {
    gateway: &'a dyn LedgerGateway,
}

impl<'a> SubmissionOrchestrator<'a> {
    pub fn new(gateway: &'a dyn LedgerGateway) -> Self {
        Self { gateway }
    }

    /// Submit and wait for commit. Every failure is returned as-is.
    pub async fn submit(&self, invocation: &PendingInvocation) -> Result<CommitReceipt> {
        let started = Instant::now();
        info!(
            function = %invocation.function(),
            endorsers = %invocation.endorsing_organizations(),
            args = invocation.args().len(),
            transient_keys = ?invocation.transient().keys().collect::<Vec<_>>(),
            transport = self.gateway.transport_name(),
            "Submitting invocation"
        );

        let receipt = match self.gateway.submit(invocation).await {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!(
                    function = %invocation.function(),
                    conflict = err.is_conflict(),
                    error = %err,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Submission failed"
                );
                return Err(err);
            }
        };

        if receipt.transaction_id.trim().is_empty() {
            return Err(GepxError::malformed(
                format!("{} commit", invocation.function()),
                "receipt has no transaction id",
            ));
        }

        info!(
            function = %invocation.function(),
            transaction_id = %receipt.transaction_id,
            block_number = ?receipt.block_number,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Committed"
        );
        Ok(receipt)
    }
}
