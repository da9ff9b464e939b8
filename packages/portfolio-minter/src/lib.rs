//! # Portfolio Minter
//!
//! Off-chain side of the verified portfolio NFT: proves ownership of social
//! accounts through an external proof service, collects the portfolio form and
//! mints it on the owner-gated portfolio contract.
//!
//! ## Quick Start
//! ```bash
//! cargo run --bin portfolio-minter -- mint --name "John Doe" --email john@example.com
//! ```
//!
//! ## Flow
//! - `FormController::start_verification` opens a proof session and exposes its request URL
//! - `FormController::finish_verification` waits for the proof (cancellable)
//! - `FormController::mint` submits the form to the contract

pub mod config;
mod error;
pub mod form;
mod notice;
pub mod proof;
pub mod rpc;
pub mod signer;
pub mod store;
pub mod verification;
pub mod viewer;

pub use config::Config;
pub use error::{ContractError, Error, ValidationError};
pub use form::{FormController, PortfolioForm};
pub use notice::{Notice, NoticeVariant};
pub use store::{ContractStore, PortfolioStore};
pub use verification::{
    VerificationClient, VerificationOutcome, VerificationSet, VerificationStatus,
};
pub use viewer::PortfolioViewer;
