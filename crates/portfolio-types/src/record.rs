//! JSON shapes exchanged with the portfolio contract.

use serde::{Deserialize, Serialize};

/// A minted portfolio as returned by `get_portfolio`.
///
/// `token_id` travels as a decimal string, matching `near_sdk::json_types::U64`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioRecord {
    #[serde(with = "u64_string")]
    pub token_id: u64,
    pub owner_id: String,
    pub name: String,
    pub email: String,
    pub github_username: String,
    pub code_chef_username: String,
    pub linked_in_profile: String,
}

/// Arguments of `mint_portfolio`. Optional handles are sent as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintArgs {
    pub receiver_id: String,
    pub name: String,
    pub email: String,
    pub github_username: String,
    pub code_chef_username: String,
    pub linked_in_profile: String,
}

impl MintArgs {
    /// Whether this record would carry exactly the given values.
    pub fn matches(&self, record: &PortfolioRecord) -> bool {
        self.receiver_id == record.owner_id
            && self.name == record.name
            && self.email == record.email
            && self.github_username == record.github_username
            && self.code_chef_username == record.code_chef_username
            && self.linked_in_profile == record.linked_in_profile
    }
}

/// Parse a `U64` view result (`"12"`). Bare numbers are accepted too.
pub fn parse_u64_json(bytes: &[u8]) -> Option<u64> {
    match serde_json::from_slice::<serde_json::Value>(bytes).ok()? {
        serde_json::Value::String(s) => s.parse().ok(),
        serde_json::Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

mod u64_string {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            Num(u64),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Str(s) => s.parse().map_err(de::Error::custom),
            Repr::Num(n) => Ok(n),
        }
    }
}
