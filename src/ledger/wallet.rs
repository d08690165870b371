//! File-system wallet identities.
//!
//! A wallet directory holds one `<label>.id` JSON file per enrolled user.
//! Only the public parts are loaded; the private key stays on disk for the
//! gateway process that signs on the user's behalf.

use crate::config::OrganizationProfile;
use crate::error::{GepxError, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

const IDENTITY_EXTENSION: &str = "id";
const X509_TYPE: &str = "X.509";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityFile {
    credentials: Credentials,
    msp_id: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct Credentials {
    certificate: String,
}

/// An enrolled user as seen by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub label: String,
    pub msp_id: String,
    pub certificate: String,
}

#[derive(Debug, Clone)]
pub struct Wallet {
    path: PathBuf,
}

impl Wallet {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(GepxError::Identity(format!(
                "Wallet directory {} does not exist",
                path.display()
            )));
        }
        Ok(Self { path })
    }

    /// Open the wallet configured for an organization
    pub fn for_organization(organization: &OrganizationProfile) -> Result<Self> {
        Self::open(&organization.wallet_path)
    }

    pub fn identity(&self, label: &str) -> Result<Identity> {
        if label.is_empty() || label.contains(['/', '\\']) {
            return Err(GepxError::InvalidInput(format!(
                "Invalid identity label: {label:?}"
            )));
        }

        let file = self.path.join(format!("{label}.{IDENTITY_EXTENSION}"));
        let content = std::fs::read_to_string(&file).map_err(|_| {
            GepxError::Identity(format!(
                "An identity for the user {label} does not exist in the wallet {}",
                self.path.display()
            ))
        })?;

        let parsed: IdentityFile = serde_json::from_str(&content).map_err(|e| {
            GepxError::Identity(format!("Identity file {} is invalid: {e}", file.display()))
        })?;

        if parsed.kind != X509_TYPE {
            return Err(GepxError::Identity(format!(
                "Unsupported identity type {} for {label}",
                parsed.kind
            )));
        }

        debug!(label = %label, msp_id = %parsed.msp_id, "Loaded wallet identity");
        Ok(Identity {
            label: label.to_string(),
            msp_id: parsed.msp_id,
            certificate: parsed.credentials.certificate,
        })
    }

    /// Load an identity and check it belongs to the organization
    pub fn identity_for(&self, organization: &OrganizationProfile, label: &str) -> Result<Identity> {
        let identity = self.identity(label)?;
        if identity.msp_id != organization.msp_id {
            return Err(GepxError::Identity(format!(
                "Identity {label} belongs to {} not {}",
                identity.msp_id, organization.msp_id
            )));
        }
        Ok(identity)
    }
}
