pub mod bid;
pub mod record;

// Re-export core models for easy access
pub use bid::{Bid, BidHash, BidPayload, BidType, NEW_BID_STATUS};
pub use record::{Record, RecordKind, RecordStatus};
