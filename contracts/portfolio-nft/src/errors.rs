use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::{FunctionError, env};
use near_sdk_macros::NearSchema;
use portfolio_types::{NOT_FOUND_MESSAGE, UNAUTHORIZED_MESSAGE};

#[derive(Debug, PartialEq, NearSchema, BorshSerialize, BorshDeserialize)]
#[borsh(crate = "near_sdk::borsh")]
#[abi(borsh)]
pub enum PortfolioError {
    Unauthorized,
    NotFound,
}

impl FunctionError for PortfolioError {
    fn panic(&self) -> ! {
        env::panic_str(match self {
            PortfolioError::Unauthorized => UNAUTHORIZED_MESSAGE,
            PortfolioError::NotFound => NOT_FOUND_MESSAGE,
        })
    }
}
