//! Per-operation descriptors.
//!
//! Each state-changing entry point differs from the others only in its
//! contract function, its public args, where its private payload comes from,
//! and who endorses it.

use crate::constants::functions;
use crate::models::{BidType, RecordKind};
use std::fmt;

/// Who must sign an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndorsementSource {
    /// Every organization listed on the record
    RecordParticipants,
    /// Only the caller's organization; used when no record scopes the call
    ClientOrganization,
}

/// Where the private payload of an operation comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    None,
    /// Re-read the caller's stored bid with `QueryBid`
    StoredBid { bid_id: String },
    /// A new bid; the bidder identity is fetched from the contract
    NewBid { bid_type: BidType, volume: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Create a record with the caller as admin
    Create,
    /// Store a private bid in the caller's organization collection
    PlaceBid { bid_type: BidType, volume: u64 },
    /// Publish the hash of a placed bid on the record
    SubmitBid { bid_id: String },
    /// Reveal a placed bid once the record is closed
    FinalizeBid { bid_id: String },
    /// Stop accepting bids
    Close,
    /// Settle revealed bids and end the record
    End,
}

impl Operation {
    pub fn function_name(&self, kind: RecordKind) -> String {
        match self {
            Self::Create => kind.create_function(),
            Self::PlaceBid { .. } => functions::BID.to_string(),
            Self::SubmitBid { .. } => functions::SUBMIT_BID.to_string(),
            Self::FinalizeBid { .. } => kind.finalize_function().to_string(),
            Self::Close => kind.close_function(),
            Self::End => kind.end_function(),
        }
    }

    /// Arguments recorded on the ledger
    pub fn public_args(&self, record_id: &str) -> Vec<String> {
        match self {
            Self::SubmitBid { bid_id } | Self::FinalizeBid { bid_id } => {
                vec![record_id.to_string(), bid_id.clone()]
            }
            Self::Create | Self::PlaceBid { .. } | Self::Close | Self::End => {
                vec![record_id.to_string()]
            }
        }
    }

    pub fn payload_source(&self) -> PayloadSource {
        match self {
            Self::FinalizeBid { bid_id } => PayloadSource::StoredBid {
                bid_id: bid_id.clone(),
            },
            Self::PlaceBid { bid_type, volume } => PayloadSource::NewBid {
                bid_type: *bid_type,
                volume: *volume,
            },
            Self::Create | Self::SubmitBid { .. } | Self::Close | Self::End => PayloadSource::None,
        }
    }

    pub fn endorsement(&self) -> EndorsementSource {
        match self {
            Self::Create | Self::PlaceBid { .. } => EndorsementSource::ClientOrganization,
            Self::SubmitBid { .. } | Self::FinalizeBid { .. } | Self::Close | Self::End => {
                EndorsementSource::RecordParticipants
            }
        }
    }

    /// Whether the record must exist before submitting
    pub fn requires_existing_record(&self) -> bool {
        !matches!(self, Self::Create)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::PlaceBid { .. } => write!(f, "bid"),
            Self::SubmitBid { .. } => write!(f, "submit-bid"),
            Self::FinalizeBid { .. } => write!(f, "finalize-bid"),
            Self::Close => write!(f, "close"),
            Self::End => write!(f, "end"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_names_follow_record_kind() {
        assert_eq!(Operation::Close.function_name(RecordKind::Session), "CloseSession");
        assert_eq!(Operation::End.function_name(RecordKind::Transaction), "EndTransaction");
        assert_eq!(
            Operation::Create.function_name(RecordKind::Transaction),
            "CreateTransaction"
        );
        let finalize = Operation::FinalizeBid { bid_id: "b".into() };
        assert_eq!(finalize.function_name(RecordKind::Session), "FinalizeBid");
        assert_eq!(finalize.function_name(RecordKind::Transaction), "RevealBid");
    }

    #[test]
    fn test_public_args_never_carry_bid_fields() {
        let place = Operation::PlaceBid {
            bid_type: BidType::Sell,
            volume: 10,
        };
        assert_eq!(place.public_args("R1"), ["R1"]);

        let finalize = Operation::FinalizeBid { bid_id: "tx9".into() };
        assert_eq!(finalize.public_args("R2"), ["R2", "tx9"]);
        assert_eq!(
            finalize.payload_source(),
            PayloadSource::StoredBid { bid_id: "tx9".into() }
        );
    }

    #[test]
    fn test_endorsement_sources() {
        assert_eq!(Operation::Create.endorsement(), EndorsementSource::ClientOrganization);
        assert_eq!(Operation::Close.endorsement(), EndorsementSource::RecordParticipants);
        assert!(!Operation::Create.requires_existing_record());
        assert!(Operation::End.requires_existing_record());
    }
}
