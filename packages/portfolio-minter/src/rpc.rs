//! RPC client with primary → fallback failover and circuit breaker.

use crate::error::ContractError;
use near_crypto::PublicKey;
use near_jsonrpc_client::methods;
use near_jsonrpc_client::JsonRpcClient;
use near_jsonrpc_primitives::types::query::QueryResponseKind;
use near_primitives::hash::CryptoHash;
use near_primitives::transaction::SignedTransaction;
use near_primitives::types::{AccountId, BlockReference, Finality, FunctionArgs};
use near_primitives::views::{AccessKeyView, FinalExecutionOutcomeView, QueryRequest};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Cached block hash TTL.
const BLOCK_HASH_TTL_SECS: u64 = 30;

const CIRCUIT_BREAKER_THRESHOLD: u64 = 5;
const CIRCUIT_BREAKER_WINDOW_MS: u64 = 30_000;

struct CircuitState {
    failures: u64,
    last_failure_ms: u64,
    open: bool,
}

pub struct RpcClient {
    primary: JsonRpcClient,
    fallback: JsonRpcClient,
    primary_url: String,
    fallback_url: String,
    circuit: Mutex<CircuitState>,
    cached_block_hash: RwLock<Option<(CryptoHash, Instant)>>,
    block_hash_stale: AtomicBool,
}

impl RpcClient {
    pub fn new(primary_url: &str, fallback_url: &str) -> Self {
        info!(
            primary = primary_url,
            fallback = fallback_url,
            "RPC client initialized with failover"
        );
        Self {
            primary: JsonRpcClient::connect(primary_url),
            fallback: JsonRpcClient::connect(fallback_url),
            primary_url: primary_url.to_string(),
            fallback_url: fallback_url.to_string(),
            circuit: Mutex::new(CircuitState {
                failures: 0,
                last_failure_ms: 0,
                open: false,
            }),
            cached_block_hash: RwLock::new(None),
            block_hash_stale: AtomicBool::new(false),
        }
    }

    // --- Views ---

    /// Call a view method and return its raw JSON result.
    ///
    /// A contract panic is returned as [`crate::Error::Contract`] without
    /// touching the circuit breaker or retrying on the fallback.
    pub async fn view_function(
        &self,
        contract_id: &AccountId,
        method_name: &str,
        args: Vec<u8>,
    ) -> Result<Vec<u8>, crate::Error> {
        let make_request = || methods::query::RpcQueryRequest {
            block_reference: BlockReference::Finality(Finality::Final),
            request: QueryRequest::CallFunction {
                account_id: contract_id.clone(),
                method_name: method_name.to_string(),
                args: FunctionArgs::from(args.clone()),
            },
        };

        let resp = match self.active().call(make_request()).await {
            Ok(r) => {
                self.record_success();
                r
            }
            Err(e) => {
                if let Some(handler_error) = e.handler_error() {
                    debug!(method = method_name, error = ?handler_error, "View call rejected");
                    return Err(ContractError::classify(&format!("{handler_error:?}")).into());
                }
                self.record_failure();
                warn!(error = %e, method = method_name, "RPC view call failed, trying fallback");
                self.fallback.call(make_request()).await.map_err(|e2| match e2.handler_error() {
                    Some(handler_error) => {
                        ContractError::classify(&format!("{handler_error:?}")).into()
                    }
                    None => crate::Error::Rpc(format!(
                        "view call failed: primary={e}, fallback={e2}"
                    )),
                })?
            }
        };

        match resp.kind {
            QueryResponseKind::CallResult(result) => Ok(result.result),
            other => Err(crate::Error::Rpc(format!(
                "unexpected query response: {other:?}"
            ))),
        }
    }

    // --- TX construction & submission ---

    /// Get a recent block hash, using cache when fresh (<30s).
    pub async fn latest_block_hash(&self) -> Result<CryptoHash, crate::Error> {
        if !self.block_hash_stale.load(Ordering::Relaxed) {
            let cache = self.cached_block_hash.read().await;
            if let Some((hash, when)) = *cache {
                if when.elapsed().as_secs() < BLOCK_HASH_TTL_SECS {
                    return Ok(hash);
                }
            }
        }
        let make_request = || methods::block::RpcBlockRequest {
            block_reference: BlockReference::Finality(Finality::Final),
        };
        let block = match self.active().call(make_request()).await {
            Ok(b) => {
                self.record_success();
                b
            }
            Err(e) => {
                self.record_failure();
                warn!(error = %e, "RPC block query failed, trying fallback");
                self.fallback.call(make_request()).await.map_err(|e2| {
                    crate::Error::Rpc(format!(
                        "block query failed on both RPCs: primary={e}, fallback={e2}"
                    ))
                })?
            }
        };
        let hash = block.header.hash;
        {
            let mut cache = self.cached_block_hash.write().await;
            *cache = Some((hash, Instant::now()));
            self.block_hash_stale.store(false, Ordering::Relaxed);
        }
        Ok(hash)
    }

    /// Query an access key's on-chain nonce. Automatic failover.
    pub async fn query_access_key(
        &self,
        account_id: &AccountId,
        public_key: &PublicKey,
    ) -> Result<AccessKeyView, crate::Error> {
        let make_request = || methods::query::RpcQueryRequest {
            block_reference: BlockReference::Finality(Finality::Final),
            request: QueryRequest::ViewAccessKey {
                account_id: account_id.clone(),
                public_key: public_key.clone(),
            },
        };

        let resp = match self.active().call(make_request()).await {
            Ok(r) => {
                self.record_success();
                r
            }
            Err(e) => {
                self.record_failure();
                warn!(error = %e, "RPC access_key query failed, trying fallback");
                self.fallback.call(make_request()).await.map_err(|e2| {
                    crate::Error::Rpc(format!(
                        "access_key query failed: primary={e}, fallback={e2}"
                    ))
                })?
            }
        };

        match resp.kind {
            QueryResponseKind::AccessKey(ak) => Ok(ak),
            other => Err(crate::Error::Rpc(format!(
                "unexpected query response: {other:?}"
            ))),
        }
    }

    /// Send a signed transaction and wait for finality. Automatic failover.
    pub async fn send_signed_tx(
        &self,
        signed_tx: SignedTransaction,
    ) -> Result<FinalExecutionOutcomeView, crate::Error> {
        match self
            .active()
            .call(methods::broadcast_tx_commit::RpcBroadcastTxCommitRequest {
                signed_transaction: signed_tx.clone(),
            })
            .await
        {
            Ok(outcome) => {
                self.record_success();
                Ok(outcome)
            }
            Err(e) => {
                if e.handler_error().is_some() {
                    return Err(crate::Error::Rpc(format!("transaction rejected: {e}")));
                }
                self.record_failure();
                warn!(error = %e, "Primary broadcast_tx_commit failed, trying fallback");
                self.fallback
                    .call(methods::broadcast_tx_commit::RpcBroadcastTxCommitRequest {
                        signed_transaction: signed_tx,
                    })
                    .await
                    .map_err(|e2| {
                        crate::Error::Rpc(format!(
                            "broadcast_tx_commit failed: primary={e}, fallback={e2}"
                        ))
                    })
            }
        }
    }

    // --- Failover / circuit breaker ---

    /// Active client (primary unless circuit is open).
    fn active(&self) -> &JsonRpcClient {
        if self.is_circuit_open() {
            &self.fallback
        } else {
            &self.primary
        }
    }

    fn record_success(&self) {
        let mut circuit = self.circuit.lock().unwrap_or_else(|e| e.into_inner());
        if circuit.failures > 0 {
            info!(primary = %self.primary_url, "Primary RPC recovered");
            circuit.failures = 0;
            circuit.open = false;
        }
    }

    fn record_failure(&self) {
        let mut circuit = self.circuit.lock().unwrap_or_else(|e| e.into_inner());
        circuit.failures += 1;
        circuit.last_failure_ms = now_ms();
        if circuit.failures >= CIRCUIT_BREAKER_THRESHOLD && !circuit.open {
            circuit.open = true;
            // Fallback may have a different chain head.
            self.block_hash_stale.store(true, Ordering::Relaxed);
            warn!(
                failures = circuit.failures,
                fallback = %self.fallback_url,
                "Circuit breaker opened, routing to fallback"
            );
        }
    }

    pub fn is_circuit_open(&self) -> bool {
        let mut circuit = self.circuit.lock().unwrap_or_else(|e| e.into_inner());
        if !circuit.open {
            return false;
        }
        // Clock may step backwards between failure and check.
        if now_ms().saturating_sub(circuit.last_failure_ms) > CIRCUIT_BREAKER_WINDOW_MS {
            circuit.open = false;
            circuit.failures = 0;
            info!(primary = %self.primary_url, "Circuit breaker half-open, retrying primary");
            return false;
        }
        true
    }

    /// Currently active RPC URL.
    pub fn active_url(&self) -> &str {
        if self.is_circuit_open() {
            &self.fallback_url
        } else {
            &self.primary_url
        }
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
