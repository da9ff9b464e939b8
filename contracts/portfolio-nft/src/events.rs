use near_sdk::json_types::U64;
use near_sdk::{AccountId, near};

#[near(event_json(standard = "portfolio"))]
pub enum PortfolioEvent {
    #[event_version("1.0.0")]
    ContractInitialized { owner_id: AccountId },
    #[event_version("1.0.0")]
    PortfolioMinted {
        token_id: U64,
        owner_id: AccountId,
        minted_by: AccountId,
    },
}
