//! Transaction Builder.
//!
//! Keeps three things apart: the positional args that end up on the ledger,
//! the endorsing organizations (routing only), and private payloads that
//! travel in the transient map.

use crate::constants::TRANSIENT_BID_KEY;
use crate::error::{GepxError, Result};
use crate::ledger::{OrgSet, PendingInvocation, TransientMap};

#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    function: String,
    args: Vec<String>,
    endorsing_organizations: Option<OrgSet>,
    transient: TransientMap,
}

impl TransactionBuilder {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            args: Vec::new(),
            endorsing_organizations: None,
            transient: TransientMap::default(),
        }
    }

    /// One-shot form: operation name, endorsers, public args and an
    /// optional private bid payload
    pub fn build_invocation(
        function: impl Into<String>,
        endorsing_organizations: OrgSet,
        args: Vec<String>,
        private_payload: Option<Vec<u8>>,
    ) -> Result<PendingInvocation> {
        let mut builder = Self::new(function)
            .args(args)
            .endorsing_organizations(endorsing_organizations);
        if let Some(payload) = private_payload {
            builder = builder.private_payload(TRANSIENT_BID_KEY, payload);
        }
        builder.build()
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn endorsing_organizations(mut self, organizations: OrgSet) -> Self {
        self.endorsing_organizations = Some(organizations);
        self
    }

    pub fn private_payload(mut self, key: impl Into<String>, payload: Vec<u8>) -> Self {
        self.transient.insert(key, payload);
        self
    }

    pub fn build(self) -> Result<PendingInvocation> {
        if self.function.trim().is_empty() {
            return Err(GepxError::InvalidInput("operation name is empty".into()));
        }

        let endorsing_organizations = self.endorsing_organizations.ok_or_else(|| {
            GepxError::InvalidInput(format!("{} has no endorsing organizations", self.function))
        })?;
        if endorsing_organizations.is_empty() {
            return Err(GepxError::InvalidInput(format!(
                "{} has an empty endorsing set",
                self.function
            )));
        }

        for (key, value) in self.transient.iter() {
            if leaks_into(&self.args, value) {
                return Err(GepxError::InvalidInput(format!(
                    "private payload {key:?} of {} appears in its public arguments",
                    self.function
                )));
            }
        }

        Ok(PendingInvocation {
            function: self.function,
            args: self.args,
            endorsing_organizations,
            transient: self.transient,
        })
    }
}

fn leaks_into(args: &[String], payload: &[u8]) -> bool {
    if payload.is_empty() {
        return false;
    }
    args.iter().any(|arg| {
        arg.as_bytes()
            .windows(payload.len())
            .any(|window| window == payload)
    })
}
