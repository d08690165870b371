//! # Client Entry Points
//!
//! [`GepxClient`] is the connection-level handle: it resolves the caller's
//! organization and wallet identity, opens a gateway through a
//! [`GatewayConnector`], and exposes one method per entry point. Each
//! state-changing method runs an independent [`Pipeline`] instance.

use crate::config::{ClientConfig, OrganizationProfile};
use crate::error::Result;
use crate::ledger::{GatewayConnector, Identity, LedgerGateway, Wallet};
use crate::models::{BidType, Record};
use crate::pipeline::{Operation, Pipeline, PipelineFailure, PipelineOutcome, PipelineSettings};
use std::sync::Arc;
use tracing::info;

pub struct GepxClient {
    organization: OrganizationProfile,
    identity: Identity,
    gateway: Arc<dyn LedgerGateway>,
    pipeline: Pipeline,
}

impl std::fmt::Debug for GepxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GepxClient")
            .field("organization", &self.organization.name)
            .field("identity", &self.identity.label)
            .field("transport", &self.gateway.transport_name())
            .finish()
    }
}

impl GepxClient {
    /// Connect as `user` of organization `org_name` ("Org1" or "Org2").
    ///
    /// Fails with `InvalidInput` for an unknown organization and with
    /// `Identity` when the wallet has no usable identity for the user.
    pub async fn connect(
        config: &ClientConfig,
        connector: &dyn GatewayConnector,
        org_name: &str,
        user: &str,
    ) -> Result<Self> {
        let organization = config.find_organization(org_name)?.clone();
        let wallet = Wallet::for_organization(&organization)?;
        let identity = wallet.identity_for(&organization, user)?;
        let gateway = connector.connect(&organization, &identity).await?;

        info!(
            organization = %organization.name,
            msp_id = %organization.msp_id,
            user = %identity.label,
            transport = gateway.transport_name(),
            channel = %config.channel,
            contract = %config.contract,
            "Connected to ledger gateway"
        );

        let pipeline = Pipeline::new(
            gateway.clone(),
            PipelineSettings::from_config(config, &organization),
        );
        Ok(Self {
            organization,
            identity,
            gateway,
            pipeline,
        })
    }

    pub fn organization(&self) -> &OrganizationProfile {
        &self.organization
    }

    pub async fn query(&self, record_id: &str) -> Result<Record> {
        self.pipeline.query(record_id).await
    }

    pub async fn run(
        &self,
        record_id: &str,
        operation: &Operation,
    ) -> std::result::Result<PipelineOutcome, PipelineFailure> {
        self.pipeline.run(record_id, operation).await
    }

    pub async fn create(&self, record_id: &str) -> std::result::Result<PipelineOutcome, PipelineFailure> {
        self.run(record_id, &Operation::Create).await
    }

    pub async fn place_bid(
        &self,
        record_id: &str,
        bid_type: BidType,
        volume: u64,
    ) -> std::result::Result<PipelineOutcome, PipelineFailure> {
        self.run(record_id, &Operation::PlaceBid { bid_type, volume })
            .await
    }

    pub async fn submit_bid(
        &self,
        record_id: &str,
        bid_id: &str,
    ) -> std::result::Result<PipelineOutcome, PipelineFailure> {
        let operation = Operation::SubmitBid {
            bid_id: bid_id.to_string(),
        };
        self.run(record_id, &operation).await
    }

    pub async fn finalize_bid(
        &self,
        record_id: &str,
        bid_id: &str,
    ) -> std::result::Result<PipelineOutcome, PipelineFailure> {
        let operation = Operation::FinalizeBid {
            bid_id: bid_id.to_string(),
        };
        self.run(record_id, &operation).await
    }

    pub async fn close(&self, record_id: &str) -> std::result::Result<PipelineOutcome, PipelineFailure> {
        self.run(record_id, &Operation::Close).await
    }

    pub async fn end(&self, record_id: &str) -> std::result::Result<PipelineOutcome, PipelineFailure> {
        self.run(record_id, &Operation::End).await
    }

    /// Release the gateway session
    pub async fn disconnect(self) -> Result<()> {
        info!(organization = %self.organization.name, "Disconnecting from ledger gateway");
        self.gateway.disconnect().await
    }
}
