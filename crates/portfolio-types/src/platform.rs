//! Social platforms whose account ownership can be proven before minting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Github,
    CodeChef,
    LinkedIn,
}

impl Platform {
    /// Every platform, in form order.
    pub const ALL: [Platform; 3] = [Platform::Github, Platform::CodeChef, Platform::LinkedIn];

    /// Stable lowercase key used in configuration and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::CodeChef => "codechef",
            Self::LinkedIn => "linkedin",
        }
    }

    /// Name of the `extractedParameters` entry carrying the proven handle.
    pub fn extracted_parameter(self) -> &'static str {
        match self {
            Self::Github | Self::CodeChef => "username",
            Self::LinkedIn => "profileUrl",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePlatformError(pub String);

impl fmt::Display for ParsePlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown platform: {}", self.0)
    }
}

impl std::error::Error for ParsePlatformError {}

impl FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParsePlatformError(s.to_string()))
    }
}
