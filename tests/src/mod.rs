#[cfg(test)]
pub mod minter_sandbox_tests;
#[cfg(test)]
pub mod portfolio_nft_tests;
#[cfg(test)]
pub mod utils;
