//! Portfolio form: field values, verification states and the mint action.

use crate::error::ValidationError;
use crate::proof::ProofService;
use crate::store::PortfolioStore;
use crate::verification::{
    PendingVerification, VerificationClient, VerificationOutcome, VerificationSet,
};
use crate::Error;
use portfolio_types::{MintArgs, Platform};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortfolioForm {
    pub name: String,
    pub email: String,
    handles: BTreeMap<Platform, String>,
}

impl PortfolioForm {
    /// Handle typed or verified for `platform`; empty when unset.
    pub fn handle(&self, platform: Platform) -> &str {
        self.handles.get(&platform).map(String::as_str).unwrap_or("")
    }

    pub fn to_mint_args(&self, receiver_id: &str) -> MintArgs {
        MintArgs {
            receiver_id: receiver_id.to_string(),
            name: self.name.clone(),
            email: self.email.clone(),
            github_username: self.handle(Platform::Github).to_string(),
            code_chef_username: self.handle(Platform::CodeChef).to_string(),
            linked_in_profile: self.handle(Platform::LinkedIn).to_string(),
        }
    }
}

pub struct FormController<S> {
    store: S,
    wallet: Option<String>,
    form: PortfolioForm,
    verifications: VerificationSet,
}

impl<S: PortfolioStore> FormController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            wallet: None,
            form: PortfolioForm::default(),
            verifications: VerificationSet::new(),
        }
    }

    pub fn connect_wallet(&mut self, account_id: impl Into<String>) {
        let account_id = account_id.into();
        info!(account = %account_id, "Wallet connected");
        self.wallet = Some(account_id);
    }

    pub fn disconnect_wallet(&mut self) {
        self.wallet = None;
    }

    pub fn wallet(&self) -> Option<&str> {
        self.wallet.as_deref()
    }

    pub fn form(&self) -> &PortfolioForm {
        &self.form
    }

    pub fn verifications(&self) -> &VerificationSet {
        &self.verifications
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.form.email = email.into();
    }

    /// Edit a handle by hand. Verified handles are read-only.
    pub fn set_handle(
        &mut self,
        platform: Platform,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        if self.verifications.is_verified(platform) {
            return Err(ValidationError::FieldLocked(platform));
        }
        self.form.handles.insert(platform, value.into());
        Ok(())
    }

    pub async fn start_verification<P: ProofService>(
        &mut self,
        client: &VerificationClient<P>,
        platform: Platform,
    ) -> Result<PendingVerification, Error> {
        client.start(platform, &mut self.verifications).await
    }

    /// Wait for the proof and copy the verified value into the form.
    ///
    /// The field always mirrors the proof: a verified value replaces whatever
    /// was typed, and a proof without a usable value clears it.
    pub async fn finish_verification<P: ProofService>(
        &mut self,
        client: &VerificationClient<P>,
        pending: PendingVerification,
        cancel: &CancellationToken,
    ) -> Result<VerificationOutcome, Error> {
        let outcome = client.finish(pending, &mut self.verifications, cancel).await?;
        if let VerificationOutcome::Verified { platform, value } = &outcome {
            if value.is_none() {
                warn!(%platform, "Clearing handle, proof carried no value");
            }
            self.form
                .handles
                .insert(*platform, value.clone().unwrap_or_default());
        }
        Ok(outcome)
    }

    pub fn can_mint(&self) -> bool {
        self.validate().is_ok()
    }

    /// Mint the current form to the connected wallet.
    ///
    /// On success every field and verification state is reset. On failure
    /// nothing changes.
    pub async fn mint(&mut self) -> Result<u64, Error> {
        let receiver = self.validate()?;
        let args = self.form.to_mint_args(receiver);

        match self.store.mint_portfolio(&args).await {
            Ok(token_id) => {
                info!(
                    token_id,
                    receiver = %args.receiver_id,
                    verified = ?self.verifications.verified_platforms().collect::<Vec<_>>(),
                    "Portfolio minted"
                );
                self.reset();
                Ok(token_id)
            }
            Err(e) => {
                warn!(error = %e, "Mint failed");
                Err(e)
            }
        }
    }

    /// Clear every field and return all platforms to `Idle`.
    pub fn reset(&mut self) {
        self.form = PortfolioForm::default();
        self.verifications.reset();
    }

    fn validate(&self) -> Result<&str, ValidationError> {
        let receiver = self
            .wallet
            .as_deref()
            .ok_or(ValidationError::WalletNotConnected)?;
        if self.form.name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.form.email.is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        Ok(receiver)
    }
}
