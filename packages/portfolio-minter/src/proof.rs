//! Capability interface for the external proof-of-account-ownership service.
//!
//! The service's wire protocol is not modelled here. An implementation wraps
//! whatever SDK talks to it and reports failures as
//! [`Error::ExternalService`](crate::Error::ExternalService).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Application credentials issued by the proof service.
#[derive(Clone, PartialEq, Eq)]
pub struct AppCredentials {
    pub app_id: String,
    pub app_secret: String,
}

impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .finish()
    }
}

/// Proof payload delivered on success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    #[serde(default)]
    pub identifier: String,
    pub claim_data: ClaimData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimData {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub parameters: String,
    /// JSON-encoded string holding `extractedParameters`.
    #[serde(default)]
    pub context: String,
}

#[async_trait]
pub trait ProofService: Send + Sync {
    type Session: ProofSession;

    /// Open a proof request for the template selected by `provider_id`.
    async fn init(
        &self,
        credentials: &AppCredentials,
        provider_id: &str,
    ) -> Result<Self::Session, crate::Error>;
}

#[async_trait]
pub trait ProofSession: Send {
    /// Shareable link (usually rendered as a QR code) the user opens to prove
    /// account ownership.
    async fn request_url(&mut self) -> Result<String, crate::Error>;

    /// Wait until the service reports a proof or an error.
    async fn wait_for_proof(&mut self) -> Result<Proof, crate::Error>;

    /// Tear the session down. Called once the session is finished, failed or
    /// abandoned; must be idempotent.
    async fn close(&mut self) {}
}
