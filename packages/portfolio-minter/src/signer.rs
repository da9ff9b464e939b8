//! Local signing key for the minting account.

use crate::config::Config;
use near_crypto::{InMemorySigner, SecretKey, Signer};
use near_primitives::hash::CryptoHash;
use near_primitives::transaction::{Action, SignedTransaction, Transaction, TransactionV0};
use near_primitives::types::{AccountId, Nonce};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Load the signer from `PORTFOLIO_KEYS_JSON`, falling back to `keys_path`.
pub fn load_signer(config: &Config) -> Result<Signer, crate::Error> {
    let signer = if let Ok(keys_json) = std::env::var("PORTFOLIO_KEYS_JSON") {
        parse_keys_json(&keys_json)?
    } else {
        InMemorySigner::from_file(Path::new(&config.keys_path))
            .map_err(|e| crate::Error::Config(format!("Failed to load key: {e}")))?
    };
    info!(account = %signer.get_account_id(), "Loaded signing key");
    Ok(signer)
}

/// Parse keys JSON in the near-cli format: `[{"account_id": "...", "public_key": "...", "secret_key": "..."}]`.
/// A single object is accepted too.
pub fn parse_keys_json(json: &str) -> Result<Signer, crate::Error> {
    #[derive(serde::Deserialize)]
    struct KeyFile {
        account_id: String,
        #[serde(alias = "private_key")]
        secret_key: String,
    }

    let key: KeyFile = if json.trim().starts_with('[') {
        let keys: Vec<KeyFile> = serde_json::from_str(json)
            .map_err(|e| crate::Error::Config(format!("Invalid key JSON: {e}")))?;
        keys.into_iter()
            .next()
            .ok_or_else(|| crate::Error::Config("Empty key array".to_string()))?
    } else {
        serde_json::from_str(json)
            .map_err(|e| crate::Error::Config(format!("Invalid key JSON: {e}")))?
    };

    signer_from_secret(&key.account_id, &key.secret_key)
}

pub fn signer_from_secret(account_id: &str, secret_key: &str) -> Result<Signer, crate::Error> {
    let secret_key = SecretKey::from_str(secret_key)
        .map_err(|e| crate::Error::Config(format!("Invalid secret key: {e}")))?;
    let account_id: AccountId = account_id
        .parse()
        .map_err(|e| crate::Error::Config(format!("Invalid account: {e}")))?;
    Ok(InMemorySigner::from_secret_key(account_id, secret_key))
}

/// Build and sign a transaction from `signer` to `receiver_id`.
pub fn sign_transaction(
    signer: &Signer,
    nonce: Nonce,
    receiver_id: &AccountId,
    block_hash: CryptoHash,
    actions: Vec<Action>,
) -> SignedTransaction {
    Transaction::V0(TransactionV0 {
        signer_id: signer.get_account_id().clone(),
        public_key: signer.public_key(),
        nonce,
        receiver_id: receiver_id.clone(),
        block_hash,
        actions,
    })
    .sign(signer)
}
