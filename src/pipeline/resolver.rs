//! Endorsement Resolver.
//!
//! Every organization listed on a record co-signs every change to it. The
//! participant list is authoritative, so the resolver never adds, drops or
//! reorders organizations.

use crate::error::{GepxError, Result};
use crate::ledger::OrgSet;
use crate::models::Record;

#[derive(Debug, Clone, Copy, Default)]
pub struct EndorsementResolver;

impl EndorsementResolver {
    pub fn resolve(&self, record: &Record) -> Result<OrgSet> {
        match record.organizations.as_slice() {
            [only] => Ok(OrgSet::single(only.clone())),
            [first, second] => Ok(OrgSet::pair(first.clone(), second.clone())),
            other => Err(GepxError::UnsupportedOrganizationCount {
                record_id: record.id.clone(),
                count: other.len(),
            }),
        }
    }

    /// Endorsement for calls that only touch the caller's own organization
    pub fn for_client(&self, msp_id: &str) -> Result<OrgSet> {
        if msp_id.is_empty() {
            return Err(GepxError::Configuration(
                "client organization MSP id is empty".into(),
            ));
        }
        Ok(OrgSet::single(msp_id))
    }
}
