//! Minter configuration.
//!
//! Values come from an optional `portfolio.toml` followed by `PORTFOLIO_*`
//! environment variables. Every field has a default, so an empty environment
//! still yields a usable (if inert) configuration: platforms without a
//! provider id simply cannot be verified.

use crate::proof::AppCredentials;
use portfolio_types::Platform;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "defaults::rpc_url")]
    pub rpc_url: String,

    #[serde(default = "defaults::fallback_rpc_url")]
    pub fallback_rpc_url: String,

    #[serde(default = "defaults::contract_id")]
    pub contract_id: String,

    #[serde(default = "defaults::keys_path")]
    pub keys_path: String,

    #[serde(default = "defaults::gas_tgas")]
    pub gas_tgas: u64,

    #[serde(default)]
    pub reclaim_app_id: String,

    #[serde(default)]
    pub reclaim_app_secret: String,

    #[serde(default)]
    pub github_provider_id: String,

    #[serde(default)]
    pub codechef_provider_id: String,

    #[serde(default)]
    pub linkedin_provider_id: String,

    /// Give up on a proof session after this many seconds. Unset waits forever.
    #[serde(default)]
    pub proof_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: defaults::rpc_url(),
            fallback_rpc_url: defaults::fallback_rpc_url(),
            contract_id: defaults::contract_id(),
            keys_path: defaults::keys_path(),
            gas_tgas: defaults::gas_tgas(),
            reclaim_app_id: String::new(),
            reclaim_app_secret: String::new(),
            github_provider_id: String::new(),
            codechef_provider_id: String::new(),
            linkedin_provider_id: String::new(),
            proof_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load from `<file_stem>.toml` (optional) and `PORTFOLIO_*` variables.
    pub fn load(file_stem: &str) -> Result<Self, crate::Error> {
        config::Config::builder()
            .add_source(config::File::with_name(file_stem).required(false))
            .add_source(config::Environment::with_prefix("PORTFOLIO"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Provider identifier for `platform`, if one is configured.
    pub fn provider_id(&self, platform: Platform) -> Option<&str> {
        let id = match platform {
            Platform::Github => &self.github_provider_id,
            Platform::CodeChef => &self.codechef_provider_id,
            Platform::LinkedIn => &self.linkedin_provider_id,
        };
        Some(id.trim()).filter(|id| !id.is_empty())
    }

    /// App credentials for the proof service; `None` unless both are set.
    pub fn credentials(&self) -> Option<AppCredentials> {
        if self.reclaim_app_id.is_empty() || self.reclaim_app_secret.is_empty() {
            return None;
        }
        Some(AppCredentials {
            app_id: self.reclaim_app_id.clone(),
            app_secret: self.reclaim_app_secret.clone(),
        })
    }

    pub fn proof_timeout(&self) -> Option<Duration> {
        self.proof_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

mod defaults {
    fn network() -> String {
        std::env::var("PORTFOLIO_NETWORK")
            .or_else(|_| std::env::var("NEAR_NETWORK"))
            .unwrap_or_else(|_| "testnet".into())
    }

    pub fn rpc_url() -> String {
        if network().contains("mainnet") {
            "https://rpc.mainnet.near.org".into()
        } else {
            "https://rpc.testnet.near.org".into()
        }
    }

    pub fn fallback_rpc_url() -> String {
        if network().contains("mainnet") {
            "https://free.rpc.fastnear.com".into()
        } else {
            "https://test.rpc.fastnear.com".into()
        }
    }

    pub fn contract_id() -> String {
        "portfolio.testnet".into()
    }

    pub fn keys_path() -> String {
        "./account_keys/portfolio.testnet.json".into()
    }

    pub fn gas_tgas() -> u64 {
        30
    }
}
