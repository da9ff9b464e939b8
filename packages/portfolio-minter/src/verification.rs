//! Per-platform verification state machine and the client that drives it.
//!
//! ```text
//! Idle ──start──▶ Requested ──request url──▶ AwaitingProof ──proof──▶ Verified
//!  ▲                  │                            │
//!  │                  └──────────error─────────────┴──error──▶ Failed ──start──▶ Requested
//!  └────────────────────────────cancel─────────────┘
//! ```
//!
//! `Verified` is terminal until [`VerificationSet::reset`]. The state set is a
//! plain value owned by the form controller and lent to the client for each
//! step.

use crate::config::Config;
use crate::proof::{AppCredentials, Proof, ProofService, ProofSession};
use crate::Error;
use portfolio_types::{extract_verified_value, Platform};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationStatus {
    Idle,
    Requested,
    AwaitingProof { request_url: String },
    /// `value` is `None` when the proof carried no usable handle.
    Verified { value: Option<String> },
    Failed { message: String },
}

impl VerificationStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requested => "requested",
            Self::AwaitingProof { .. } => "awaiting_proof",
            Self::Verified { .. } => "verified",
            Self::Failed { .. } => "failed",
        }
    }
}

static IDLE: VerificationStatus = VerificationStatus::Idle;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationSet {
    states: BTreeMap<Platform, VerificationStatus>,
}

impl VerificationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, platform: Platform) -> &VerificationStatus {
        self.states.get(&platform).unwrap_or(&IDLE)
    }

    pub fn is_verified(&self, platform: Platform) -> bool {
        matches!(self.status(platform), VerificationStatus::Verified { .. })
    }

    pub fn verified_value(&self, platform: Platform) -> Option<&str> {
        match self.status(platform) {
            VerificationStatus::Verified { value } => value.as_deref(),
            _ => None,
        }
    }

    pub fn verified_platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        Platform::ALL.into_iter().filter(|p| self.is_verified(*p))
    }

    pub fn all_idle(&self) -> bool {
        Platform::ALL
            .into_iter()
            .all(|p| *self.status(p) == VerificationStatus::Idle)
    }

    /// Back to `Idle` for every platform.
    pub fn reset(&mut self) {
        self.states.clear();
    }

    /// Any state except `Verified` may (re)start; an in-flight session's state
    /// is overwritten.
    pub(crate) fn request(&mut self, platform: Platform) -> Result<(), Error> {
        self.transition(platform, VerificationStatus::Requested, |from| {
            !matches!(from, VerificationStatus::Verified { .. })
        })
    }

    pub(crate) fn await_proof(
        &mut self,
        platform: Platform,
        request_url: String,
    ) -> Result<(), Error> {
        self.transition(
            platform,
            VerificationStatus::AwaitingProof { request_url },
            |from| matches!(from, VerificationStatus::Requested),
        )
    }

    pub(crate) fn verify(
        &mut self,
        platform: Platform,
        value: Option<String>,
    ) -> Result<(), Error> {
        self.transition(platform, VerificationStatus::Verified { value }, |from| {
            matches!(from, VerificationStatus::AwaitingProof { .. })
        })
    }

    pub(crate) fn fail(&mut self, platform: Platform, message: String) -> Result<(), Error> {
        self.transition(platform, VerificationStatus::Failed { message }, |from| {
            matches!(
                from,
                VerificationStatus::Requested | VerificationStatus::AwaitingProof { .. }
            )
        })
    }

    /// Drop an unfinished session. Verified platforms are left alone.
    pub(crate) fn abandon(&mut self, platform: Platform) {
        if !self.is_verified(platform) {
            self.states.remove(&platform);
        }
    }

    fn transition(
        &mut self,
        platform: Platform,
        to: VerificationStatus,
        allowed: impl FnOnce(&VerificationStatus) -> bool,
    ) -> Result<(), Error> {
        let from = self.status(platform);
        if !allowed(from) {
            return Err(Error::InvalidTransition {
                platform,
                from: from.name(),
                to: to.name(),
            });
        }
        self.states.insert(platform, to);
        Ok(())
    }
}

/// A session whose request URL is ready to be shown to the user.
///
/// The session itself stays with the client; this handle names it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVerification {
    platform: Platform,
    request_url: String,
    session_id: u64,
}

impl PendingVerification {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn request_url(&self) -> &str {
        &self.request_url
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified {
        platform: Platform,
        value: Option<String>,
    },
    /// The user dismissed the request before a proof arrived.
    Cancelled { platform: Platform },
}

pub struct VerificationClient<S: ProofService> {
    service: S,
    credentials: Option<AppCredentials>,
    providers: BTreeMap<Platform, String>,
    proof_timeout: Option<Duration>,
    /// At most one open session per platform, tagged with its id.
    in_flight: Mutex<BTreeMap<Platform, (u64, S::Session)>>,
    next_session_id: AtomicU64,
}

impl<S: ProofService> VerificationClient<S> {
    pub fn new(service: S, config: &Config) -> Self {
        let providers: Vec<_> = Platform::ALL
            .into_iter()
            .filter_map(|p| config.provider_id(p).map(|id| (p, id.to_string())))
            .collect();
        Self::with_providers(service, config.credentials(), providers)
            .with_timeout(config.proof_timeout())
    }

    pub fn with_providers(
        service: S,
        credentials: Option<AppCredentials>,
        providers: impl IntoIterator<Item = (Platform, String)>,
    ) -> Self {
        Self {
            service,
            credentials,
            providers: providers
                .into_iter()
                .filter(|(_, id)| !id.trim().is_empty())
                .collect(),
            proof_timeout: None,
            in_flight: Mutex::new(BTreeMap::new()),
            next_session_id: AtomicU64::new(1),
        }
    }

    pub fn with_timeout(mut self, proof_timeout: Option<Duration>) -> Self {
        self.proof_timeout = proof_timeout;
        self
    }

    /// Whether `platform` can be verified at all with this configuration.
    pub fn is_available(&self, platform: Platform) -> bool {
        self.credentials.is_some() && self.providers.contains_key(&platform)
    }

    /// Open a proof session for `platform` and obtain its request URL.
    ///
    /// Configuration problems leave the state untouched; service failures
    /// move it to `Failed`. A session still open for the platform is closed
    /// first and can no longer be finished.
    pub async fn start(
        &self,
        platform: Platform,
        states: &mut VerificationSet,
    ) -> Result<PendingVerification, Error> {
        let provider_id = self
            .providers
            .get(&platform)
            .ok_or_else(|| Error::Config(format!("No provider ID found for {platform}")))?;
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| Error::Config("proof service app credentials are not set".into()))?;

        states.request(platform)?;
        if let Some((session_id, mut superseded)) = self.take_session(platform, None) {
            info!(%platform, session_id, "Closing superseded verification session");
            superseded.close().await;
        }
        info!(%platform, "Requesting verification session");

        let mut session = match self.service.init(credentials, provider_id).await {
            Ok(session) => session,
            Err(e) => {
                warn!(%platform, error = %e, "Failed to open verification session");
                states.fail(platform, failure_message(&e))?;
                return Err(e);
            }
        };

        let request_url = match session.request_url().await {
            Ok(url) => url,
            Err(e) => {
                warn!(%platform, error = %e, "Failed to obtain verification request URL");
                session.close().await;
                states.fail(platform, failure_message(&e))?;
                return Err(e);
            }
        };

        states.await_proof(platform, request_url.clone())?;
        let session_id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        self.sessions().insert(platform, (session_id, session));
        info!(%platform, session_id, "Waiting for proof");

        Ok(PendingVerification {
            platform,
            request_url,
            session_id,
        })
    }

    /// Wait for the proof of a pending session.
    ///
    /// Cancelling `cancel` closes the session and returns the platform to
    /// `Idle`. The session is closed on every exit path. A pending handle
    /// superseded by a later `start` is rejected without touching the state.
    pub async fn finish(
        &self,
        pending: PendingVerification,
        states: &mut VerificationSet,
        cancel: &CancellationToken,
    ) -> Result<VerificationOutcome, Error> {
        let PendingVerification {
            platform,
            session_id,
            ..
        } = pending;

        let Some((_, mut session)) = self.take_session(platform, Some(session_id)) else {
            warn!(%platform, session_id, "Verification session was superseded");
            return Err(Error::InvalidTransition {
                platform,
                from: "superseded",
                to: "verified",
            });
        };

        let waited = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = wait_for_proof(&mut session, self.proof_timeout) => Some(result),
        };
        session.close().await;

        match waited {
            None => {
                info!(%platform, "Verification dismissed, session closed");
                states.abandon(platform);
                Ok(VerificationOutcome::Cancelled { platform })
            }
            Some(Ok(proof)) => {
                let value = extract_verified_value(platform, &proof.claim_data.context);
                if value.is_none() {
                    warn!(%platform, "Proof carried no extractable handle");
                }
                states.verify(platform, value.clone())?;
                info!(%platform, "Account verified");
                Ok(VerificationOutcome::Verified { platform, value })
            }
            Some(Err(e)) => {
                warn!(%platform, error = %e, "Verification failed");
                states.fail(platform, failure_message(&e))?;
                Err(e)
            }
        }
    }

    /// Remove the open session for `platform`; with `Some(id)` only if it
    /// is that session.
    fn take_session(
        &self,
        platform: Platform,
        session_id: Option<u64>,
    ) -> Option<(u64, S::Session)> {
        let mut sessions = self.sessions();
        match (sessions.get(&platform), session_id) {
            (Some((current, _)), Some(wanted)) if *current != wanted => None,
            _ => sessions.remove(&platform),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, BTreeMap<Platform, (u64, S::Session)>> {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }
}

async fn wait_for_proof<T: ProofSession>(
    session: &mut T,
    limit: Option<Duration>,
) -> Result<Proof, Error> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, session.wait_for_proof())
            .await
            .unwrap_or_else(|_| {
                Err(Error::ExternalService(format!(
                    "no proof received within {}s",
                    limit.as_secs()
                )))
            }),
        None => session.wait_for_proof().await,
    }
}

fn failure_message(error: &Error) -> String {
    match error {
        Error::ExternalService(message) => message.clone(),
        other => other.to_string(),
    }
}
