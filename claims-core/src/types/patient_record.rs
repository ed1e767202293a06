//! Patient history records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{AccountId, ClaimStatus};

/// Per-patient claim history record.
///
/// Addressed by `(submitter, patient index, record index)`. Created while a
/// claim is in adjudication and then mirrors the processed claim's status
/// through appeals, undenials, and revocations. `patient_record_only` is
/// true until the claim's hospital and insurance master records exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub record_id: u32,
    pub claim_id: u64,
    pub status: ClaimStatus,
    pub patient_record_only: bool,
    pub denial_reason: Option<String>,
    pub appeal_reason: Option<String>,
    pub submitter: AccountId,
    pub patient_index: u8,
    pub processor: AccountId,
    /// The owning processor's local sequence for the claim.
    pub sequence: u64,
    pub country_index: u16,
    pub state_index: u32,
    pub hospital_index: i32,
    pub insurance_company_index: i16,
    pub invoice_number: String,
    pub amount: u64,
    pub ailment: String,
    pub note: String,
    pub submitted_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}
