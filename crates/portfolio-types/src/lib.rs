//! Shared types and pure-logic utilities for the portfolio protocol.
//! Zero NEAR SDK dependency, usable on-chain and off-chain.

mod error;
mod platform;
mod proof;
mod record;

pub use error::{NOT_FOUND_MESSAGE, UNAUTHORIZED_MESSAGE};
pub use platform::{ParsePlatformError, Platform};
pub use proof::extract_verified_value;
pub use record::{MintArgs, PortfolioRecord, parse_u64_json};

/// Contract method names shared by the minter and the integration tests.
pub mod methods {
    pub const NEW: &str = "new";
    pub const MINT_PORTFOLIO: &str = "mint_portfolio";
    pub const GET_PORTFOLIO: &str = "get_portfolio";
    pub const TOTAL_PORTFOLIOS: &str = "total_portfolios";
    pub const GET_OWNER: &str = "get_owner";
}
