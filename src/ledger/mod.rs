//! # Ledger Access
//!
//! The boundary between the submission pipeline and the network. The
//! pipeline only ever talks to a [`LedgerGateway`]; how a gateway is reached
//! and authenticated is the job of a [`GatewayConnector`].
//!
//! - [`invocation`]: invocation, endorsement set and receipt types
//! - [`wallet`]: file-system wallet identities (`wallet/<org>/<user>.id`)
//! - [`http`]: REST gateway adapter built on `reqwest`

pub mod http;
pub mod invocation;
pub mod wallet;

use crate::config::OrganizationProfile;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub use http::{HttpConnector, HttpGateway};
pub use invocation::{CommitReceipt, OrgSet, PendingInvocation, TransientMap};
pub use wallet::{Identity, Wallet};

/// Authenticated access to one channel/contract pair.
///
/// Calls block the caller until the round trip completes; timeouts are the
/// implementation's concern.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Transport name for logging
    fn transport_name(&self) -> &'static str;

    /// Run a read-only contract function and return its raw result
    async fn evaluate(&self, function: &str, args: &[String]) -> Result<Vec<u8>>;

    /// Endorse with exactly the invocation's organizations, order and commit
    async fn submit(&self, invocation: &PendingInvocation) -> Result<CommitReceipt>;

    /// Release the session. Default is a no-op for stateless transports.
    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }
}

/// Produces authenticated gateways for an organization and identity
#[async_trait]
pub trait GatewayConnector: Send + Sync {
    async fn connect(
        &self,
        organization: &OrganizationProfile,
        identity: &Identity,
    ) -> Result<Arc<dyn LedgerGateway>>;
}
