//! Panic strings raised by the contract. Off-chain callers match on these to
//! classify failed calls.

/// Raised when a mutating call does not come from the contract owner.
pub const UNAUTHORIZED_MESSAGE: &str = "Not the Owner";

/// Raised when a token id lies outside `[1, total_portfolios]`.
pub const NOT_FOUND_MESSAGE: &str = "Portfolio not found";
