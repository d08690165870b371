//! Record Reader: side-effect-free reads through the gateway.

use crate::constants::functions;
use crate::error::{GepxError, Result};
use crate::ledger::LedgerGateway;
use crate::models::{Bid, Record, RecordKind};
use serde::de::DeserializeOwned;
use tracing::debug;

pub struct RecordReader<'a> {
    gateway: &'a dyn LedgerGateway,
    kind: RecordKind,
}

impl<'a> RecordReader<'a> {
    pub fn new(gateway: &'a dyn LedgerGateway, kind: RecordKind) -> Self {
        Self { gateway, kind }
    }

    /// Read and parse a record. Never returns a partial or default record.
    pub async fn read(&self, record_id: &str) -> Result<Record> {
        let function = self.kind.query_function();
        let raw = self
            .gateway
            .evaluate(&function, &[record_id.to_string()])
            .await?;

        let mut record: Record = parse_ledger_json(&raw, &function, record_id)?;
        record.id = record_id.to_string();
        record.kind = self.kind;
        debug!(
            record_id = %record_id,
            status = %record.status,
            organizations = ?record.organizations,
            "Record read"
        );
        Ok(record)
    }

    /// Read the caller's own private bid
    pub async fn read_bid(&self, record_id: &str, bid_id: &str) -> Result<Bid> {
        let raw = self
            .gateway
            .evaluate(
                functions::QUERY_BID,
                &[record_id.to_string(), bid_id.to_string()],
            )
            .await?;
        parse_ledger_json(&raw, functions::QUERY_BID, bid_id)
    }

    /// The identity string the contract sees for the caller
    pub async fn client_identity(&self) -> Result<String> {
        let raw = self.gateway.evaluate(functions::GET_ID, &[]).await?;
        let id = String::from_utf8(raw)
            .map_err(|e| GepxError::malformed(functions::GET_ID, e.to_string()))?;
        let id = id.trim().trim_matches('"').to_string();
        if id.is_empty() {
            return Err(GepxError::malformed(functions::GET_ID, "empty client identity"));
        }
        Ok(id)
    }
}

/// Parse an evaluate result; empty bodies and `null` mean the key is absent
fn parse_ledger_json<T: DeserializeOwned>(raw: &[u8], function: &str, key: &str) -> Result<T> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| GepxError::malformed(function, e.to_string()))?
        .trim();
    if text.is_empty() || text == "null" {
        return Err(GepxError::not_found(key));
    }
    serde_json::from_str(text).map_err(|e| GepxError::malformed(function, e.to_string()))
}
