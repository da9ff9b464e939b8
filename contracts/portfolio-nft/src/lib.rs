use crate::errors::PortfolioError;
use crate::state::PortfolioContractState;
use crate::types::{PortfolioMetadata, PortfolioView};
use near_sdk::json_types::U64;
use near_sdk::{AccountId, PanicOnDefault, env, near};

pub mod errors;
mod events;
pub mod state;
pub mod types;

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct PortfolioContract {
    state: PortfolioContractState,
}

#[near]
impl PortfolioContract {
    /// `owner_id` is the only account allowed to mint.
    #[init]
    pub fn new(owner_id: AccountId) -> Self {
        Self {
            state: PortfolioContractState::new(owner_id),
        }
    }

    /// Mint a portfolio to `receiver_id` and return its token id.
    /// Omitted handles are stored as empty strings.
    #[handle_result]
    pub fn mint_portfolio(
        &mut self,
        receiver_id: AccountId,
        name: String,
        email: String,
        github_username: Option<String>,
        code_chef_username: Option<String>,
        linked_in_profile: Option<String>,
    ) -> Result<U64, PortfolioError> {
        let metadata = PortfolioMetadata {
            name,
            email,
            github_username: github_username.unwrap_or_default(),
            code_chef_username: code_chef_username.unwrap_or_default(),
            linked_in_profile: linked_in_profile.unwrap_or_default(),
        };
        self.state
            .mint(&env::predecessor_account_id(), receiver_id, metadata)
            .map(U64)
    }

    #[handle_result]
    pub fn get_portfolio(&self, token_id: U64) -> Result<PortfolioView, PortfolioError> {
        self.state.get(token_id.0)
    }

    pub fn total_portfolios(&self) -> U64 {
        U64(self.state.total())
    }

    pub fn get_owner(&self) -> AccountId {
        self.state.owner().clone()
    }

    pub fn portfolios_for_owner(
        &self,
        account_id: AccountId,
        from_index: Option<U64>,
        limit: Option<u32>,
    ) -> Vec<PortfolioView> {
        self.state
            .tokens_for_owner(&account_id, from_index.map(|i| i.0), limit)
    }

    pub fn portfolio_supply_for_owner(&self, account_id: AccountId) -> U64 {
        U64(self.state.supply_for_owner(&account_id))
    }
}
