//! Submitter and patient registry records

use serde::{Deserialize, Serialize};

use super::common::AccountId;

/// Per-identity submitter record.
///
/// `patient_count` is also the next patient index, so patients must be
/// created in sequence for their addresses to line up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitterAccount {
    pub id: u64,
    pub identity: AccountId,
    pub patient_count: u8,
    pub active_patient_count: u8,
    pub submitted_claim_count: u32,
    pub approved_claim_count: u32,
    pub approved_claim_amount: u64,
    pub denied_claim_count: u32,
    pub max_denied_claim_count: u32,
    pub undenied_claim_count: u32,
    pub submitted_appeal_count: u32,
    pub denied_appeal_count: u32,
    pub revoked_approval_count: u32,
}

impl SubmitterAccount {
    pub fn new(id: u64, identity: AccountId) -> Self {
        Self {
            id,
            identity,
            patient_count: 0,
            active_patient_count: 0,
            submitted_claim_count: 0,
            approved_claim_count: 0,
            approved_claim_amount: 0,
            denied_claim_count: 0,
            max_denied_claim_count: 0,
            undenied_claim_count: 0,
            submitted_appeal_count: 0,
            denied_appeal_count: 0,
            revoked_approval_count: 0,
        }
    }
}

/// Patient sub-record under a submitter, addressed by `(submitter, index)`.
///
/// Name fields are immutable after creation; only the active flag toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientAccount {
    pub id: u64,
    pub submitter: AccountId,
    pub patient_index: u8,
    pub is_active: bool,
    pub first_name: String,
    pub last_name: String,
    /// Number of history records written for this patient; also the next
    /// record index.
    pub record_count: u32,
    pub submitted_claim_count: u32,
    pub approved_claim_count: u32,
    pub approved_claim_amount: u64,
    pub denied_claim_count: u32,
    pub max_denied_claim_count: u32,
    pub undenied_claim_count: u32,
    pub submitted_appeal_count: u32,
    pub denied_appeal_count: u32,
    pub revoked_approval_count: u32,
}

impl PatientAccount {
    pub fn new(
        id: u64,
        submitter: AccountId,
        patient_index: u8,
        first_name: String,
        last_name: String,
    ) -> Self {
        Self {
            id,
            submitter,
            patient_index,
            is_active: true,
            first_name,
            last_name,
            record_count: 0,
            submitted_claim_count: 0,
            approved_claim_count: 0,
            approved_claim_amount: 0,
            denied_claim_count: 0,
            max_denied_claim_count: 0,
            undenied_claim_count: 0,
            submitted_appeal_count: 0,
            denied_appeal_count: 0,
            revoked_approval_count: 0,
        }
    }
}
