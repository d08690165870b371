//! Mock Ledger Implementation for Testing
//!
//! A scripted, in-memory [`LedgerGateway`] that records every evaluate and
//! submit call so tests can assert on exactly what reached the network.
#![allow(dead_code)]

use async_trait::async_trait;
use gepx_client::ledger::{CommitReceipt, LedgerGateway, PendingInvocation};
use gepx_client::models::Bid;
use gepx_client::{GepxError, Result};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One call as seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCall {
    Evaluate { function: String, args: Vec<String> },
    Submit(PendingInvocation),
}

/// Mock ledger state for tracking calls and simulating behavior
#[derive(Debug, Default, Clone)]
pub struct MockLedgerState {
    /// Stored record JSON by record id
    pub records: HashMap<String, Value>,
    /// Private bids by (record id, bid id)
    pub bids: HashMap<(String, String), Value>,
    /// Identity string returned by `GetID`
    pub client_id: String,
    /// Every call in order
    pub calls: Vec<LedgerCall>,
    /// Record JSON written at `args[0]` when a function commits
    pub commit_effects: HashMap<String, Value>,
    /// Errors returned by evaluate, keyed by function
    pub evaluate_failures: HashMap<String, GepxError>,
    /// Error returned by every read once something has committed
    pub post_commit_read_failure: Option<GepxError>,
    pub submit_failure: Option<GepxError>,
    /// Receipt without a transaction id
    pub blank_receipts: bool,
    pub commits: u64,
}

/// Mock ledger gateway for testing
#[derive(Clone)]
pub struct MockLedger {
    state: Arc<Mutex<MockLedgerState>>,
}

impl MockLedger {
    pub fn new() -> Self {
        let state = MockLedgerState {
            client_id: "x509::/CN=u1::/CN=ca.org1.example.com".to_string(),
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn with_record(self, record_id: &str, record: Value) -> Self {
        self.state
            .lock()
            .unwrap()
            .records
            .insert(record_id.to_string(), record);
        self
    }

    pub fn with_bid(self, record_id: &str, bid_id: &str, bid: Value) -> Self {
        self.state
            .lock()
            .unwrap()
            .bids
            .insert((record_id.to_string(), bid_id.to_string()), bid);
        self
    }

    pub fn with_client_id(self, client_id: &str) -> Self {
        self.state.lock().unwrap().client_id = client_id.to_string();
        self
    }

    /// Replace the record at `args[0]` when `function` commits
    pub fn on_commit(self, function: &str, record: Value) -> Self {
        self.state
            .lock()
            .unwrap()
            .commit_effects
            .insert(function.to_string(), record);
        self
    }

    pub fn fail_evaluate(self, function: &str, error: GepxError) -> Self {
        self.state
            .lock()
            .unwrap()
            .evaluate_failures
            .insert(function.to_string(), error);
        self
    }

    pub fn fail_reads_after_commit(self, error: GepxError) -> Self {
        self.state.lock().unwrap().post_commit_read_failure = Some(error);
        self
    }

    pub fn fail_submit(self, error: GepxError) -> Self {
        self.state.lock().unwrap().submit_failure = Some(error);
        self
    }

    pub fn with_blank_receipts(self) -> Self {
        self.state.lock().unwrap().blank_receipts = true;
        self
    }

    pub fn gateway(&self) -> Arc<dyn LedgerGateway> {
        Arc::new(self.clone())
    }

    /// Get the current state for assertions
    pub fn get_state(&self) -> MockLedgerState {
        self.state.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<PendingInvocation> {
        self.get_state()
            .calls
            .into_iter()
            .filter_map(|call| match call {
                LedgerCall::Submit(invocation) => Some(invocation),
                LedgerCall::Evaluate { .. } => None,
            })
            .collect()
    }

    pub fn evaluated_functions(&self) -> Vec<String> {
        self.get_state()
            .calls
            .into_iter()
            .filter_map(|call| match call {
                LedgerCall::Evaluate { function, .. } => Some(function),
                LedgerCall::Submit(_) => None,
            })
            .collect()
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerGateway for MockLedger {
    fn transport_name(&self) -> &'static str {
        "mock"
    }

    async fn evaluate(&self, function: &str, args: &[String]) -> Result<Vec<u8>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(LedgerCall::Evaluate {
            function: function.to_string(),
            args: args.to_vec(),
        });

        if let Some(error) = state.evaluate_failures.get(function) {
            return Err(error.clone());
        }
        if state.commits > 0 {
            if let Some(error) = &state.post_commit_read_failure {
                return Err(error.clone());
            }
        }

        let record_id = args.first().cloned().unwrap_or_default();
        let value = match function {
            "GetID" => return Ok(state.client_id.clone().into_bytes()),
            "QueryBid" => {
                let bid_id = args.get(1).cloned().unwrap_or_default();
                state.bids.get(&(record_id.clone(), bid_id.clone())).cloned()
            }
            _ if function.starts_with("Query") => state.records.get(&record_id).cloned(),
            _ => {
                return Err(GepxError::Connectivity(format!(
                    "mock ledger cannot evaluate {function}"
                )))
            }
        };

        match value {
            Some(value) => Ok(serde_json::to_vec(&value).unwrap()),
            None => Err(GepxError::not_found(record_id)),
        }
    }

    async fn submit(&self, invocation: &PendingInvocation) -> Result<CommitReceipt> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(LedgerCall::Submit(invocation.clone()));

        if let Some(error) = &state.submit_failure {
            return Err(error.clone());
        }

        state.commits += 1;
        let transaction_id = if state.blank_receipts {
            String::new()
        } else {
            format!("tx{}", state.commits)
        };

        if let Some(record) = state.commit_effects.get(invocation.function()).cloned() {
            if let Some(record_id) = invocation.args().first() {
                state.records.insert(record_id.clone(), record);
            }
        }

        // Bid returns the transaction id, which is the bid id
        let result = if invocation.function() == "Bid" {
            transaction_id.clone().into_bytes()
        } else {
            Vec::new()
        };
        Ok(CommitReceipt::new(transaction_id, result))
    }
}

/// Record JSON in the chaincode's layout
pub fn record_json(organizations: &[&str], status: &str) -> Value {
    json!({
        "admin": "x509::/CN=admin::/CN=ca.org1.example.com",
        "organizations": organizations,
        "privateBids": {},
        "finalizedBids": null,
        "status": status,
    })
}

/// Stored private bid JSON
pub fn bid_json(bid_type: &str, volume: u64, org: &str, bidder: &str) -> Value {
    stored_bid_json(bid_type, volume, org, bidder, "submitted")
}

/// Stored private bid JSON with an explicit status spelling
pub fn stored_bid_json(bid_type: &str, volume: u64, org: &str, bidder: &str, status: &str) -> Value {
    json!({
        "bidType": bid_type,
        "volume": volume,
        "org": org,
        "bidder": bidder,
        "status": status,
    })
}

pub fn parse_transient_bid(invocation: &PendingInvocation) -> Bid {
    let bytes = invocation
        .transient()
        .get("bid")
        .expect("invocation carries a bid");
    serde_json::from_slice(bytes).unwrap()
}
