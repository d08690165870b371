//! # Client Configuration
//!
//! Network-wide settings for the submission pipeline: which channel and
//! contract to address, which record flavour the contract exposes, and the
//! organizations a user may act for.
//!
//! Configuration is an explicit value handed to the pipeline, so several
//! configurations can coexist in one process.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gepx_client::config::ClientConfig;
//!
//! # fn main() -> gepx_client::Result<()> {
//! let config = ClientConfig::load(None)?;
//! let org = config.find_organization("org1")?;
//! println!("{} uses wallet {}", org.msp_id, org.wallet_path.display());
//! # Ok(())
//! # }
//! ```

pub mod loader;

use crate::constants::{DEFAULT_CHANNEL, DEFAULT_CONTRACT};
use crate::error::{GepxError, Result};
use crate::models::RecordKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use loader::ConfigLoader;

/// Number of organizations the CLI surface is defined for
pub const REQUIRED_ORGANIZATIONS: usize = 2;

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Channel the contract is deployed on
    pub channel: String,

    /// Contract (chaincode) name
    pub contract: String,

    /// Record flavour the contract is addressed as
    #[serde(default)]
    pub record_kind: RecordKind,

    /// Gateway transport settings
    pub gateway: GatewayConfig,

    /// Organizations a user may act for
    pub organizations: Vec<OrganizationProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Per-request timeout applied by the gateway adapter
    pub request_timeout_ms: u64,
}

impl GatewayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// One participant organization and where its credentials live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationProfile {
    /// Short name accepted on the command line, e.g. `Org1`
    pub name: String,
    /// Membership service provider id, e.g. `Org1MSP`
    pub msp_id: String,
    /// File-system wallet holding this organization's identities
    pub wallet_path: PathBuf,
    /// Base URL of the gateway serving this organization's peers
    pub gateway_endpoint: String,
}

impl OrganizationProfile {
    fn new(index: u8, port: u16) -> Self {
        Self {
            name: format!("Org{index}"),
            msp_id: format!("Org{index}MSP"),
            wallet_path: Path::new("wallet").join(format!("org{index}")),
            gateway_endpoint: format!("http://localhost:{port}"),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            contract: DEFAULT_CONTRACT.to_string(),
            record_kind: RecordKind::Session,
            gateway: GatewayConfig {
                request_timeout_ms: 30_000,
            },
            organizations: vec![
                OrganizationProfile::new(1, 7080),
                OrganizationProfile::new(2, 9080),
            ],
        }
    }
}

impl ClientConfig {
    /// Load defaults, then the optional config file, then `GEPX_*` overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        ConfigLoader::new()
            .with_file(config_file.map(Path::to_path_buf))
            .load()
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.channel.trim().is_empty() {
            return Err(GepxError::Configuration("channel must not be empty".into()));
        }
        if self.contract.trim().is_empty() {
            return Err(GepxError::Configuration(
                "contract must not be empty".into(),
            ));
        }
        if self.gateway.request_timeout_ms == 0 {
            return Err(GepxError::Configuration(
                "gateway.request_timeout_ms must be positive".into(),
            ));
        }
        if self.organizations.len() != REQUIRED_ORGANIZATIONS {
            return Err(GepxError::Configuration(format!(
                "exactly {REQUIRED_ORGANIZATIONS} organizations must be configured, found {}",
                self.organizations.len()
            )));
        }

        let mut seen = HashSet::new();
        for org in &self.organizations {
            if org.name.is_empty() || org.msp_id.is_empty() {
                return Err(GepxError::Configuration(
                    "organization name and msp_id must not be empty".into(),
                ));
            }
            if !seen.insert(org.name.to_ascii_lowercase()) {
                return Err(GepxError::Configuration(format!(
                    "duplicate organization: {}",
                    org.name
                )));
            }
        }
        Ok(())
    }

    /// Case-insensitive lookup by short name. MSP ids are not accepted.
    pub fn find_organization(&self, name: &str) -> Result<&OrganizationProfile> {
        self.organizations
            .iter()
            .find(|org| org.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                GepxError::InvalidInput(format!(
                    "Org must be {}",
                    self.organization_names().join(" or ")
                ))
            })
    }

    pub fn organization_names(&self) -> Vec<&str> {
        self.organizations.iter().map(|org| org.name.as_str()).collect()
    }
}
