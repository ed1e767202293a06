//! Processor registry records

use serde::{Deserialize, Serialize};

use super::common::AccountId;

/// A claim processor created by the CEO.
///
/// `processed_claim_count` is the processor-local sequence that addresses
/// processed claims; it advances exactly once per finalize performed against
/// this processor's work. `busy_with` holds the submitter of the claim the
/// processor currently has in progress; a processor works one claim at a
/// time so the in-progress record's address stays unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorAccount {
    pub id: u64,
    pub identity: AccountId,
    pub is_active: bool,
    pub is_super_admin: bool,
    pub busy_with: Option<AccountId>,
    pub processed_claim_count: u64,
    pub approved_claim_count: u64,
    pub approved_claim_amount: u64,
    pub denied_claim_count: u64,
    pub max_denied_claim_count: u64,
    pub undenied_claim_count: u64,
    pub denied_appeal_count: u64,
    pub revoked_approval_count: u64,
    pub created_patient_record_count: u64,
    pub created_master_record_count: u64,
    pub denial_hammer_dropped_count: u64,
}

impl ProcessorAccount {
    /// Create an active, non-admin processor.
    pub fn new(id: u64, identity: AccountId) -> Self {
        Self {
            id,
            identity,
            is_active: true,
            is_super_admin: false,
            busy_with: None,
            processed_claim_count: 0,
            approved_claim_count: 0,
            approved_claim_amount: 0,
            denied_claim_count: 0,
            max_denied_claim_count: 0,
            undenied_claim_count: 0,
            denied_appeal_count: 0,
            revoked_approval_count: 0,
            created_patient_record_count: 0,
            created_master_record_count: 0,
            denial_hammer_dropped_count: 0,
        }
    }

    /// Whether the processor may take on another claim.
    pub fn is_available(&self) -> bool {
        self.is_active && self.busy_with.is_none()
    }
}
