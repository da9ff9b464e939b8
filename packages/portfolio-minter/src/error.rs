//! Error types for the minter.

use portfolio_types::{Platform, NOT_FOUND_MESSAGE, UNAUTHORIZED_MESSAGE};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Form input rejected before anything is submitted.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Missing or unusable configuration (provider ids, credentials, keys).
    #[error("config error: {0}")]
    Config(String),

    /// The proof service reported a failure. The platform may be retried.
    #[error("verification failed: {0}")]
    ExternalService(String),

    /// A verification step was attempted from a state that does not allow it.
    #[error("{platform} verification cannot move from {from} to {to}")]
    InvalidTransition {
        platform: Platform,
        from: &'static str,
        to: &'static str,
    },

    /// The contract rejected the call. Chain state is unchanged.
    #[error("contract error: {0}")]
    Contract(#[from] ContractError),

    /// RPC communication error.
    #[error("rpc error: {0}")]
    Rpc(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("wallet not connected")]
    WalletNotConnected,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} is verified and cannot be edited")]
    FieldLocked(Platform),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,

    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,

    #[error("{0}")]
    Rejected(String),
}

impl ContractError {
    /// Classify a failure reported by the chain by its panic message.
    pub fn classify(message: &str) -> Self {
        if message.contains(UNAUTHORIZED_MESSAGE) {
            Self::Unauthorized
        } else if message.contains(NOT_FOUND_MESSAGE) {
            Self::NotFound
        } else {
            Self::Rejected(message.to_string())
        }
    }
}
