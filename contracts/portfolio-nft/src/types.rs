use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U64;
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::AccountId;
use near_sdk_macros::NearSchema;

/// Profile fields supplied at mint time. Handles may be empty.
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
    NearSchema,
)]
#[serde(crate = "near_sdk::serde")]
#[borsh(crate = "near_sdk::borsh")]
#[abi(json, borsh)]
pub struct PortfolioMetadata {
    pub name: String,
    pub email: String,
    pub github_username: String,
    pub code_chef_username: String,
    pub linked_in_profile: String,
}

/// Stored form of a minted portfolio. Never mutated after insertion.
#[derive(Clone, Debug, PartialEq, BorshSerialize, BorshDeserialize)]
#[borsh(crate = "near_sdk::borsh")]
pub struct PortfolioRecord {
    pub owner_id: AccountId,
    pub metadata: PortfolioMetadata,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, NearSchema)]
#[serde(crate = "near_sdk::serde")]
#[abi(json)]
pub struct PortfolioView {
    pub token_id: U64,
    pub owner_id: AccountId,
    pub name: String,
    pub email: String,
    pub github_username: String,
    pub code_chef_username: String,
    pub linked_in_profile: String,
}

impl PortfolioView {
    pub fn new(token_id: u64, record: PortfolioRecord) -> Self {
        let PortfolioRecord { owner_id, metadata } = record;
        Self {
            token_id: U64(token_id),
            owner_id,
            name: metadata.name,
            email: metadata.email,
            github_username: metadata.github_username,
            code_chef_username: metadata.code_chef_username,
            linked_in_profile: metadata.linked_in_profile,
        }
    }
}
