use crate::errors::PortfolioError;
use crate::events::PortfolioEvent;
use crate::types::{PortfolioMetadata, PortfolioRecord, PortfolioView};
use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U64;
use near_sdk::store::{IterableSet, LookupMap};
use near_sdk::{AccountId, BorshStorageKey, log};

pub const MAX_PAGE_LIMIT: u32 = 100;
const DEFAULT_PAGE_LIMIT: u32 = 50;

#[derive(BorshSerialize, BorshDeserialize, BorshStorageKey)]
#[borsh(crate = "near_sdk::borsh")]
pub enum StorageKey {
    Portfolios,
    TokensPerOwner,
    OwnerTokens { account_id: AccountId },
}

/// Append-only portfolio registry guarded by a single owner account.
///
/// Token ids are dense: the n-th successful mint receives id `n`, so
/// `total_portfolios` is always the highest assigned id.
#[derive(BorshSerialize, BorshDeserialize)]
#[borsh(crate = "near_sdk::borsh")]
pub struct PortfolioContractState {
    pub owner_id: AccountId,
    pub portfolios: LookupMap<u64, PortfolioRecord>,
    pub tokens_per_owner: LookupMap<AccountId, IterableSet<u64>>,
    pub total_portfolios: u64,
}

impl PortfolioContractState {
    pub fn new(owner_id: AccountId) -> Self {
        log!("Initializing portfolio registry owned by {}", owner_id);
        PortfolioEvent::ContractInitialized {
            owner_id: owner_id.clone(),
        }
        .emit();
        Self {
            owner_id,
            portfolios: LookupMap::new(StorageKey::Portfolios),
            tokens_per_owner: LookupMap::new(StorageKey::TokensPerOwner),
            total_portfolios: 0,
        }
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner_id
    }

    fn assert_owner(&self, caller: &AccountId) -> Result<(), PortfolioError> {
        if caller != &self.owner_id {
            return Err(PortfolioError::Unauthorized);
        }
        Ok(())
    }

    pub fn mint(
        &mut self,
        caller: &AccountId,
        receiver_id: AccountId,
        metadata: PortfolioMetadata,
    ) -> Result<u64, PortfolioError> {
        self.assert_owner(caller)?;

        let token_id = self.total_portfolios + 1;
        self.portfolios.insert(
            token_id,
            PortfolioRecord {
                owner_id: receiver_id.clone(),
                metadata,
            },
        );

        if let Some(owned) = self.tokens_per_owner.get_mut(&receiver_id) {
            owned.insert(token_id);
        } else {
            log!("Creating token set for account: {}", receiver_id);
            let mut owned = IterableSet::new(StorageKey::OwnerTokens {
                account_id: receiver_id.clone(),
            });
            owned.insert(token_id);
            self.tokens_per_owner.insert(receiver_id.clone(), owned);
        }

        self.total_portfolios = token_id;

        PortfolioEvent::PortfolioMinted {
            token_id: U64(token_id),
            owner_id: receiver_id,
            minted_by: caller.clone(),
        }
        .emit();

        Ok(token_id)
    }

    pub fn get(&self, token_id: u64) -> Result<PortfolioView, PortfolioError> {
        if token_id == 0 || token_id > self.total_portfolios {
            return Err(PortfolioError::NotFound);
        }
        self.portfolios
            .get(&token_id)
            .cloned()
            .map(|record| PortfolioView::new(token_id, record))
            .ok_or(PortfolioError::NotFound)
    }

    pub fn total(&self) -> u64 {
        self.total_portfolios
    }

    pub fn supply_for_owner(&self, account_id: &AccountId) -> u64 {
        self.tokens_per_owner
            .get(account_id)
            .map(|owned| u64::from(owned.len()))
            .unwrap_or(0)
    }

    pub fn tokens_for_owner(
        &self,
        account_id: &AccountId,
        from_index: Option<u64>,
        limit: Option<u32>,
    ) -> Vec<PortfolioView> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        assert!(limit <= MAX_PAGE_LIMIT, "Limit exceeds maximum allowed value");
        let Some(owned) = self.tokens_per_owner.get(account_id) else {
            return Vec::new();
        };
        owned
            .iter()
            .skip(from_index.unwrap_or(0) as usize)
            .take(limit as usize)
            .filter_map(|token_id| {
                self.portfolios
                    .get(token_id)
                    .cloned()
                    .map(|record| PortfolioView::new(*token_id, record))
            })
            .collect()
    }
}
