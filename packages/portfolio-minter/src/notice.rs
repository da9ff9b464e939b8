//! Transient user notifications for verification and mint results.

use crate::error::{Error, ValidationError};
use crate::verification::VerificationOutcome;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeVariant {
    Success,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    fn success(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NoticeVariant::Success,
        }
    }

    fn destructive(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }

    /// `None` for a dismissed session, which needs no notification.
    pub fn for_verification(outcome: &VerificationOutcome) -> Option<Self> {
        match outcome {
            VerificationOutcome::Verified { platform, .. } => Some(Self::success(
                "Verification Successful",
                format!("Your {platform} account has been verified."),
            )),
            VerificationOutcome::Cancelled { .. } => None,
        }
    }

    pub fn minted(token_id: u64) -> Self {
        Self::success(
            "Success",
            format!("Portfolio NFT #{token_id} minted successfully!"),
        )
    }

    pub fn for_error(error: &Error) -> Self {
        match error {
            Error::Validation(ValidationError::WalletNotConnected) => {
                Self::destructive("Wallet Not Connected", "Please connect your wallet first")
            }
            Error::Validation(ValidationError::MissingField(_)) => {
                Self::destructive("Required Fields Missing", "Please fill in your name and email")
            }
            Error::Validation(ValidationError::FieldLocked(platform)) => Self::destructive(
                "Field Locked",
                format!("Your {platform} handle is verified and cannot be edited"),
            ),
            Error::ExternalService(message) => {
                Self::destructive("Verification Failed", message.clone())
            }
            Error::Config(_) | Error::InvalidTransition { .. } => Self::destructive(
                "Verification Error",
                "An error occurred during verification.",
            ),
            Error::Contract(_) | Error::Rpc(_) => {
                Self::destructive("Error", format!("Failed to mint NFT: {error}"))
            }
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}
