//! Access to the on-chain portfolio store.
//!
//! [`PortfolioStore`] is the seam the form controller and viewer depend on;
//! [`ContractStore`] implements it over JSON-RPC.

use crate::config::Config;
use crate::error::ContractError;
use crate::rpc::RpcClient;
use crate::signer::{load_signer, sign_transaction};
use async_trait::async_trait;
use near_crypto::Signer;
use near_gas::NearGas;
use near_primitives::transaction::{Action, DeployContractAction, FunctionCallAction};
use near_primitives::types::AccountId;
use near_primitives::views::{FinalExecutionOutcomeView, FinalExecutionStatus};
use portfolio_types::{methods, parse_u64_json, MintArgs, PortfolioRecord};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

#[async_trait]
pub trait PortfolioStore: Send + Sync {
    /// Mint a portfolio and return its token id.
    async fn mint_portfolio(&self, args: &MintArgs) -> Result<u64, crate::Error>;

    async fn get_portfolio(&self, token_id: u64) -> Result<PortfolioRecord, crate::Error>;

    async fn total_portfolios(&self) -> Result<u64, crate::Error>;
}

pub struct ContractStore {
    rpc: RpcClient,
    /// `None` for a view-only store.
    signer: Option<Signer>,
    contract_id: AccountId,
    gas: NearGas,
    /// Last nonce this store signed with; final views may lag behind it.
    last_nonce: AtomicU64,
}

impl ContractStore {
    pub fn new(rpc: RpcClient, signer: Signer, contract_id: AccountId, gas: NearGas) -> Self {
        Self {
            rpc,
            signer: Some(signer),
            contract_id,
            gas,
            last_nonce: AtomicU64::new(0),
        }
    }

    /// Store that can mint, signing with the configured key.
    pub fn from_config(config: &Config) -> Result<Self, crate::Error> {
        let mut store = Self::read_only(config)?;
        store.signer = Some(load_signer(config)?);
        Ok(store)
    }

    /// Store for views only; no key is loaded and minting is refused.
    pub fn read_only(config: &Config) -> Result<Self, crate::Error> {
        let contract_id = config
            .contract_id
            .parse()
            .map_err(|e| crate::Error::Config(format!("Invalid contract_id: {e}")))?;
        Ok(Self {
            rpc: RpcClient::new(&config.rpc_url, &config.fallback_rpc_url),
            signer: None,
            contract_id,
            gas: NearGas::from_tgas(config.gas_tgas),
            last_nonce: AtomicU64::new(0),
        })
    }

    pub fn contract_id(&self) -> &AccountId {
        &self.contract_id
    }

    /// Account that signs mint transactions, if a key is loaded.
    pub fn signer_account(&self) -> Option<AccountId> {
        self.signer.as_ref().map(|s| s.get_account_id().clone())
    }

    /// The account allowed to mint.
    pub async fn owner(&self) -> Result<String, crate::Error> {
        let bytes = self.view(methods::GET_OWNER, json!({})).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| crate::Error::Rpc(format!("Invalid get_owner result: {e}")))
    }

    async fn next_nonce(&self, signer: &Signer) -> Result<u64, crate::Error> {
        let chain_nonce = access_key_nonce(&self.rpc, signer).await?;
        let nonce = (chain_nonce + 1).max(self.last_nonce.load(Ordering::Relaxed) + 1);
        self.last_nonce.store(nonce, Ordering::Relaxed);
        Ok(nonce)
    }

    async fn view(&self, method: &str, args: serde_json::Value) -> Result<Vec<u8>, crate::Error> {
        let args = serde_json::to_vec(&args).unwrap_or_default();
        self.rpc.view_function(&self.contract_id, method, args).await
    }
}

#[async_trait]
impl PortfolioStore for ContractStore {
    async fn mint_portfolio(&self, args: &MintArgs) -> Result<u64, crate::Error> {
        let signer = self
            .signer
            .as_ref()
            .ok_or_else(|| crate::Error::Config("no signing key loaded".into()))?;
        let action = function_call(methods::MINT_PORTFOLIO, json!(args), self.gas);
        let nonce = self.next_nonce(signer).await?;
        let outcome =
            submit(&self.rpc, signer, nonce, &self.contract_id, vec![action]).await?;
        let bytes = success_value(outcome)?;
        let token_id = parse_u64_json(&bytes).ok_or_else(|| {
            crate::Error::Rpc(format!(
                "Invalid mint_portfolio result: {}",
                String::from_utf8_lossy(&bytes)
            ))
        })?;
        info!(token_id, receiver = %args.receiver_id, "Portfolio minted");
        Ok(token_id)
    }

    async fn get_portfolio(&self, token_id: u64) -> Result<PortfolioRecord, crate::Error> {
        let bytes = self
            .view(
                methods::GET_PORTFOLIO,
                json!({ "token_id": token_id.to_string() }),
            )
            .await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| crate::Error::Rpc(format!("Invalid get_portfolio result: {e}")))
    }

    async fn total_portfolios(&self) -> Result<u64, crate::Error> {
        let bytes = self.view(methods::TOTAL_PORTFOLIOS, json!({})).await?;
        parse_u64_json(&bytes).ok_or_else(|| {
            crate::Error::Rpc(format!(
                "Invalid total_portfolios result: {}",
                String::from_utf8_lossy(&bytes)
            ))
        })
    }
}

/// Deploy `code` to the signer's own account and initialize it with the
/// signer as owner.
pub async fn deploy_contract(
    rpc: &RpcClient,
    signer: &Signer,
    code: Vec<u8>,
    gas: NearGas,
) -> Result<AccountId, crate::Error> {
    let contract_id = signer.get_account_id().clone();
    let actions = vec![
        Action::DeployContract(DeployContractAction { code }),
        function_call(methods::NEW, json!({ "owner_id": contract_id }), gas),
    ];
    let nonce = access_key_nonce(rpc, signer).await? + 1;
    let outcome = submit(rpc, signer, nonce, &contract_id, actions).await?;
    success_value(outcome)?;
    info!(contract = %contract_id, "Portfolio contract deployed");
    Ok(contract_id)
}

fn function_call(method_name: &str, args: serde_json::Value, gas: NearGas) -> Action {
    Action::FunctionCall(Box::new(FunctionCallAction {
        method_name: method_name.to_string(),
        args: serde_json::to_vec(&args).unwrap_or_default(),
        gas: gas.as_gas(),
        deposit: 0,
    }))
}

async fn access_key_nonce(rpc: &RpcClient, signer: &Signer) -> Result<u64, crate::Error> {
    let access_key = rpc
        .query_access_key(&signer.get_account_id().clone(), &signer.public_key())
        .await?;
    Ok(access_key.nonce)
}

async fn submit(
    rpc: &RpcClient,
    signer: &Signer,
    nonce: u64,
    receiver_id: &AccountId,
    actions: Vec<Action>,
) -> Result<FinalExecutionOutcomeView, crate::Error> {
    let block_hash = rpc.latest_block_hash().await?;
    let signed_tx = sign_transaction(signer, nonce, receiver_id, block_hash, actions);
    debug!(
        signer = %signer.get_account_id(),
        nonce,
        receiver = %receiver_id,
        rpc = rpc.active_url(),
        "Submitting transaction"
    );
    rpc.send_signed_tx(signed_tx).await
}

fn success_value(outcome: FinalExecutionOutcomeView) -> Result<Vec<u8>, crate::Error> {
    let tx_hash = outcome.transaction_outcome.id;
    match outcome.status {
        FinalExecutionStatus::SuccessValue(bytes) => Ok(bytes),
        FinalExecutionStatus::Failure(e) => {
            let err = ContractError::classify(&format!("{e:?}"));
            warn!(tx_hash = %tx_hash, error = %err, "Transaction failed");
            Err(err.into())
        }
        FinalExecutionStatus::Started | FinalExecutionStatus::NotStarted => Err(
            crate::Error::Rpc(format!("transaction {tx_hash} did not finish")),
        ),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// In-memory stand-in with the contract's rules: only `owner` may mint,
    /// ids are dense from 1.
    pub struct InMemoryStore {
        owner: String,
        caller: String,
        records: Mutex<Vec<PortfolioRecord>>,
        fail_next: Mutex<Option<String>>,
    }

    impl InMemoryStore {
        pub fn new(owner: &str) -> Self {
            Self::with_caller(owner, owner)
        }

        pub fn with_caller(owner: &str, caller: &str) -> Self {
            Self {
                owner: owner.to_string(),
                caller: caller.to_string(),
                records: Mutex::new(Vec::new()),
                fail_next: Mutex::new(None),
            }
        }

        /// Make the next call fail as an unreachable RPC would.
        pub fn fail_next(&self, message: &str) {
            *self.fail_next.lock().unwrap() = Some(message.to_string());
        }

        pub fn records(&self) -> Vec<PortfolioRecord> {
            self.records.lock().unwrap().clone()
        }

        fn take_failure(&self) -> Result<(), crate::Error> {
            match self.fail_next.lock().unwrap().take() {
                Some(message) => Err(crate::Error::Rpc(message)),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl PortfolioStore for InMemoryStore {
        async fn mint_portfolio(&self, args: &MintArgs) -> Result<u64, crate::Error> {
            self.take_failure()?;
            if self.caller != self.owner {
                return Err(ContractError::Unauthorized.into());
            }
            let mut records = self.records.lock().unwrap();
            let token_id = records.len() as u64 + 1;
            records.push(PortfolioRecord {
                token_id,
                owner_id: args.receiver_id.clone(),
                name: args.name.clone(),
                email: args.email.clone(),
                github_username: args.github_username.clone(),
                code_chef_username: args.code_chef_username.clone(),
                linked_in_profile: args.linked_in_profile.clone(),
            });
            Ok(token_id)
        }

        async fn get_portfolio(&self, token_id: u64) -> Result<PortfolioRecord, crate::Error> {
            self.take_failure()?;
            let records = self.records.lock().unwrap();
            token_id
                .checked_sub(1)
                .and_then(|i| records.get(i as usize))
                .cloned()
                .ok_or_else(|| ContractError::NotFound.into())
        }

        async fn total_portfolios(&self) -> Result<u64, crate::Error> {
            self.take_failure()?;
            Ok(self.records.lock().unwrap().len() as u64)
        }
    }
}
