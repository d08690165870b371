//! Confirmation Reporter: fresh read after commit.

use super::reader::RecordReader;
use crate::error::Result;
use crate::ledger::CommitReceipt;
use crate::models::Record;
use serde::Serialize;
use tracing::info;

/// Post-commit view of a record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub record: Record,
    /// Ledger fields that differ from the pre-submission read
    pub changed_fields: Vec<&'static str>,
}

pub struct ConfirmationReporter<'a> {
    reader: RecordReader<'a>,
}

impl<'a> ConfirmationReporter<'a> {
    pub fn new(reader: RecordReader<'a>) -> Self {
        Self { reader }
    }

    /// Re-read the record. Taking the receipt ties the call to a commit.
    pub async fn confirm(
        &self,
        record_id: &str,
        receipt: &CommitReceipt,
        before: Option<&Record>,
    ) -> Result<Confirmation> {
        let record = self.reader.read(record_id).await?;
        let changed_fields = match before {
            Some(before) => before.changed_fields(&record),
            None => vec!["created"],
        };

        info!(
            record_id = %record_id,
            transaction_id = %receipt.transaction_id,
            status = %record.status,
            changed = ?changed_fields,
            "Confirmed committed state"
        );
        Ok(Confirmation {
            record,
            changed_fields,
        })
    }
}
