//! # Contract Constants
//!
//! Names shared with the GEPx chaincode: function names and transient keys.

/// Transient map key under which a private bid travels to endorsers
pub const TRANSIENT_BID_KEY: &str = "bid";

pub const DEFAULT_CHANNEL: &str = "mychannel";
pub const DEFAULT_CONTRACT: &str = "gepx";

/// Chaincode functions that are not specific to a record flavour
pub mod functions {
    pub const BID: &str = "Bid";
    pub const SUBMIT_BID: &str = "SubmitBid";
    pub const QUERY_BID: &str = "QueryBid";
    pub const GET_ID: &str = "GetID";
}

/// Commit validation codes that indicate a concurrent write won the race
pub const CONFLICT_VALIDATION_CODES: &[&str] = &[
    "MVCC_READ_CONFLICT",
    "PHANTOM_READ_CONFLICT",
    "ENDORSEMENT_POLICY_FAILURE_CONFLICT",
];
