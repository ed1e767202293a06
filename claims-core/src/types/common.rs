//! Common identifiers and shared enums

use serde::{Deserialize, Serialize};

/// Account ID - identifies every signing party (submitters, processors, CEO)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mint ID - identifies a payment-token mint in the fee registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MintId(pub String);

impl MintId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MintId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The protocol owner singleton.
///
/// Created once at initialization; the owner identity is replaced atomically
/// when the title is passed on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CeoAccount {
    pub owner: AccountId,
}

/// Claim lifecycle status
///
/// `Queued` and `Assigned` describe a live claim; the rest describe a
/// processed claim after the processor took ownership. `Approved`,
/// `AppealDenied`, and `MaxDenied` are terminal. `Revoked` can be reopened
/// by a fresh appeal from the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Queued,
    Assigned,
    Approved,
    Denied,
    Appealed,
    Undenied,
    AppealDenied,
    Revoked,
    MaxDenied,
}

impl ClaimStatus {
    /// True once the claim has passed through a first-finalize edge.
    pub fn is_finalized(&self) -> bool {
        !matches!(self, Self::Queued | Self::Assigned)
    }

    /// True for the statuses a submitter may appeal against.
    pub fn is_appealable(&self) -> bool {
        matches!(self, Self::Denied | Self::Revoked)
    }
}

/// Hospital type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HospitalType {
    General,
    Dental,
    Vision,
    Mental,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        let status = ClaimStatus::AppealDenied;
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, "\"appeal_denied\"");
    }

    #[test]
    fn test_finalized_statuses() {
        assert!(!ClaimStatus::Queued.is_finalized());
        assert!(!ClaimStatus::Assigned.is_finalized());
        assert!(ClaimStatus::Denied.is_finalized());
        assert!(ClaimStatus::MaxDenied.is_finalized());
    }

    #[test]
    fn test_appealable_statuses() {
        assert!(ClaimStatus::Denied.is_appealable());
        assert!(ClaimStatus::Revoked.is_appealable());
        assert!(!ClaimStatus::Approved.is_appealable());
        assert!(!ClaimStatus::Appealed.is_appealable());
    }
}
