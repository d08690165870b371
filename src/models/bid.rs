//! Bids proposed by participants against a session or transaction.
//!
//! The contract stores a bid as whatever JSON the bidder sent and later
//! checks revealed bids against a hash of those bytes. Stored bids therefore
//! keep the ledger's own strings for `bidType` and `status`; only new bids
//! are built from the typed [`BidType`].

use crate::error::{GepxError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status the contract expects on a freshly placed bid
pub const NEW_BID_STATUS: &str = "submitted";

/// Side of the market for a new bid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BidType {
    Buy,
    Sell,
}

impl fmt::Display for BidType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

impl std::str::FromStr for BidType {
    type Err = GepxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            _ => Err(GepxError::InvalidInput(format!(
                "Invalid bid type: {s} (expected buy or sell)"
            ))),
        }
    }
}

/// A bid as stored on the ledger. Its identifier is the key it is stored
/// under, not a field of the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub bid_type: String,
    pub volume: i64,
    pub org: String,
    pub bidder: String,
    pub status: String,
}

/// Hash commitment to a private bid, published on the record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidHash {
    pub org: String,
    pub hash: String,
}

/// The private form of a bid handed to endorsers through the transient map.
///
/// Field order matters: endorsers hash the exact bytes and compare them with
/// the commitment recorded when the bid was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidPayload {
    pub bid_type: String,
    pub volume: i64,
    pub org: String,
    pub bidder: String,
    pub status: String,
}

impl BidPayload {
    /// A new bid for the `Bid` chaincode function
    pub fn new(
        bid_type: BidType,
        volume: u64,
        org: impl Into<String>,
        bidder: impl Into<String>,
    ) -> Result<Self> {
        let volume = i64::try_from(volume)
            .map_err(|_| GepxError::InvalidInput(format!("Bid volume {volume} is too large")))?;
        Ok(Self {
            bid_type: bid_type.to_string(),
            volume,
            org: org.into(),
            bidder: bidder.into(),
            status: NEW_BID_STATUS.to_string(),
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| GepxError::InvalidInput(format!("Cannot serialize bid payload: {e}")))
    }
}

/// Forwards a stored bid with its spellings untouched
impl From<&Bid> for BidPayload {
    fn from(bid: &Bid) -> Self {
        Self {
            bid_type: bid.bid_type.clone(),
            volume: bid.volume,
            org: bid.org.clone(),
            bidder: bid.bidder.clone(),
            status: bid.status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bid_parses_chaincode_json() {
        let json = r#"{"bidType":"Sell","volume":10,"org":"Org2MSP","bidder":"u1","status":"submitted"}"#;
        let bid: Bid = serde_json::from_str(json).unwrap();
        assert_eq!(bid.bid_type, "Sell");
        assert_eq!(bid.volume, 10);
        assert_eq!(bid.status, "submitted");
    }

    #[test]
    fn test_stored_bid_is_forwarded_byte_for_byte() {
        let json = r#"{"bidType":"BUY","volume":-3,"org":"Org1MSP","bidder":"u1","status":"Submitted"}"#;
        let bid: Bid = serde_json::from_str(json).unwrap();
        let bytes = BidPayload::from(&bid).to_bytes().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), json);
    }

    #[test]
    fn test_new_payload_field_order() {
        let payload = BidPayload::new(BidType::Buy, 10, "Org2MSP", "u1").unwrap();
        let text = String::from_utf8(payload.to_bytes().unwrap()).unwrap();
        assert_eq!(
            text,
            r#"{"bidType":"buy","volume":10,"org":"Org2MSP","bidder":"u1","status":"submitted"}"#
        );
    }

    #[test]
    fn test_new_payload_rejects_oversized_volume() {
        assert!(BidPayload::new(BidType::Sell, u64::MAX, "Org1MSP", "u1").is_err());
    }

    #[test]
    fn test_bid_type_from_str() {
        assert_eq!("SELL".parse::<BidType>().unwrap(), BidType::Sell);
        assert!("hold".parse::<BidType>().is_err());
    }
}
