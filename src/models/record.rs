//! Shared ledger records (sessions and transactions) and their flavours.

use super::bid::{Bid, BidHash};
use crate::error::GepxError;
use crate::utils::serde::deserialize_null_as_default;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Which record flavour the contract is addressed as.
///
/// Both flavours share one layout; they differ in function names and in the
/// JSON key holding revealed bids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    #[default]
    Session,
    Transaction,
}

impl RecordKind {
    fn noun(&self) -> &'static str {
        match self {
            Self::Session => "Session",
            Self::Transaction => "Transaction",
        }
    }

    pub fn query_function(&self) -> String {
        format!("Query{}", self.noun())
    }

    pub fn create_function(&self) -> String {
        format!("Create{}", self.noun())
    }

    pub fn close_function(&self) -> String {
        format!("Close{}", self.noun())
    }

    pub fn end_function(&self) -> String {
        format!("End{}", self.noun())
    }

    /// Sessions finalize bids; transactions reveal them
    pub fn finalize_function(&self) -> &'static str {
        match self {
            Self::Session => "FinalizeBid",
            Self::Transaction => "RevealBid",
        }
    }

    /// JSON key under which the contract keeps revealed bids
    pub fn bids_key(&self) -> &'static str {
        match self {
            Self::Session => "finalizedBids",
            Self::Transaction => "revealedBids",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session => write!(f, "session"),
            Self::Transaction => write!(f, "transaction"),
        }
    }
}

impl std::str::FromStr for RecordKind {
    type Err = GepxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "session" => Ok(Self::Session),
            "transaction" => Ok(Self::Transaction),
            _ => Err(GepxError::InvalidInput(format!(
                "Invalid record kind: {s} (expected session or transaction)"
            ))),
        }
    }
}

/// Record lifecycle, as written by the chaincode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordStatus {
    #[serde(rename = "Open", alias = "open")]
    Open,
    #[serde(rename = "Close", alias = "close", alias = "Closed", alias = "closed")]
    Closed,
    #[serde(rename = "ended", alias = "Ended")]
    Ended,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

/// A session or transaction as held on the ledger.
///
/// `organizations` has no default: a record whose participant list is
/// missing or `null` fails to parse instead of being endorsed by nobody.
/// Revealed bids are read from either key and written back under the key
/// of the record's kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Ledger key. Not part of the stored value; filled in by the reader.
    #[serde(default)]
    pub id: String,
    /// Flavour the record was read as. Filled in by the reader.
    #[serde(skip)]
    pub kind: RecordKind,
    pub admin: String,
    pub organizations: Vec<String>,
    pub status: RecordStatus,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub private_bids: BTreeMap<String, BidHash>,
    #[serde(
        rename = "finalizedBids",
        alias = "revealedBids",
        default,
        deserialize_with = "deserialize_null_as_default"
    )]
    pub bids: BTreeMap<String, Bid>,
}

impl Record {
    /// Names of the ledger fields that differ between two views of a record
    pub fn changed_fields(&self, other: &Record) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.admin != other.admin {
            changed.push("admin");
        }
        if self.organizations != other.organizations {
            changed.push("organizations");
        }
        if self.status != other.status {
            changed.push("status");
        }
        if self.private_bids != other.private_bids {
            changed.push("privateBids");
        }
        if self.bids != other.bids {
            changed.push("bids");
        }
        changed
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Record", 6)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("admin", &self.admin)?;
        state.serialize_field("organizations", &self.organizations)?;
        state.serialize_field("privateBids", &self.private_bids)?;
        state.serialize_field(self.kind.bids_key(), &self.bids)?;
        state.serialize_field("status", &self.status)?;
        state.end()
    }
}
