//! Invocation types exchanged with the ledger gateway.

use crate::error::{GepxError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Organizations that must execute and sign an invocation.
///
/// Holds one or two MSP ids in the order they were listed on the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrgSet(Vec<String>);

impl OrgSet {
    pub fn single(org: impl Into<String>) -> Self {
        Self(vec![org.into()])
    }

    pub fn pair(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self(vec![first.into(), second.into()])
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, org: &str) -> bool {
        self.0.iter().any(|o| o == org)
    }
}

impl fmt::Display for OrgSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

/// Private data handed to endorsers only. Never committed verbatim.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TransientMap(BTreeMap<String, Vec<u8>>);

impl TransientMap {
    pub fn insert(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<u8>)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

// Values stay out of logs and panics; only sizes are shown.
impl fmt::Debug for TransientMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.0
                    .iter()
                    .map(|(k, v)| (k, format!("<{} bytes redacted>", v.len()))),
            )
            .finish()
    }
}

/// A state-changing call ready for submission.
///
/// Only [`TransactionBuilder`](crate::pipeline::TransactionBuilder) creates
/// these, which is where the public/private separation is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInvocation {
    pub(crate) function: String,
    pub(crate) args: Vec<String>,
    pub(crate) endorsing_organizations: OrgSet,
    pub(crate) transient: TransientMap,
}

impl PendingInvocation {
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Positional arguments recorded on the ledger
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn endorsing_organizations(&self) -> &OrgSet {
        &self.endorsing_organizations
    }

    pub fn transient(&self) -> &TransientMap {
        &self.transient
    }
}

/// Outcome of a successful ordering and commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    pub transaction_id: String,
    /// Value returned by the contract function, often empty
    #[serde(default)]
    pub result: Vec<u8>,
    #[serde(default)]
    pub block_number: Option<u64>,
    pub committed_at: DateTime<Utc>,
}

impl CommitReceipt {
    pub fn new(transaction_id: impl Into<String>, result: Vec<u8>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            result,
            block_number: None,
            committed_at: Utc::now(),
        }
    }

    /// Contract return value as text, if any
    pub fn result_text(&self) -> Result<Option<String>> {
        if self.result.is_empty() {
            return Ok(None);
        }
        String::from_utf8(self.result.clone())
            .map(Some)
            .map_err(|e| GepxError::malformed("commit result", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_set_preserves_order() {
        let set = OrgSet::pair("Org2MSP", "Org1MSP");
        assert_eq!(set.as_slice(), ["Org2MSP", "Org1MSP"]);
        assert_eq!(set.to_string(), "Org2MSP,Org1MSP");
        assert!(set.contains("Org1MSP"));
        assert!(!set.contains("Org3MSP"));
    }

    #[test]
    fn test_transient_debug_redacts_values() {
        let mut transient = TransientMap::default();
        transient.insert("bid", br#"{"volume":10}"#.to_vec());
        let rendered = format!("{transient:?}");
        assert!(rendered.contains("bid"));
        assert!(rendered.contains("13 bytes redacted"));
        assert!(!rendered.contains("volume"));
    }

    #[test]
    fn test_receipt_result_text() {
        let receipt = CommitReceipt::new("tx1", b"tx1".to_vec());
        assert_eq!(receipt.result_text().unwrap().as_deref(), Some("tx1"));
        assert_eq!(CommitReceipt::new("tx2", vec![]).result_text().unwrap(), None);
        assert!(CommitReceipt::new("tx3", vec![0xff, 0xfe]).result_text().is_err());
    }
}
