//! Claim and processed-claim records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{AccountId, ClaimStatus, HospitalType, MintId};

/// Fields a submitter provides when queueing a claim.
///
/// Hospital and insurance indices are the submitter's best guess; negative
/// values mean the submitter could not resolve the entity and a processor
/// has to repair the index before master records can be created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimSubmission {
    pub patient_index: u8,
    pub payment_mint: MintId,
    pub country_index: u16,
    pub state_index: u32,
    pub hospital_index: i32,
    pub hospital_type: HospitalType,
    pub hospital_name: String,
    pub hospital_address: String,
    pub hospital_city: String,
    pub hospital_zip_code: u32,
    pub hospital_phone_number: u64,
    pub invoice_number: String,
    pub note: String,
    pub amount: u64,
    pub ailment: String,
    pub insurance_company_index: i16,
    pub insurance_company_name: String,
}

/// A queued or assigned reimbursement claim.
///
/// Lives at the submitter's claim slot from submission until it is consumed
/// by a finalize edge or the denial hammer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub id: u64,
    pub status: ClaimStatus,
    pub submitter: AccountId,
    pub processor: Option<AccountId>,
    pub patient_index: u8,
    pub payment_mint: MintId,
    pub country_index: u16,
    pub state_index: u32,
    pub hospital_index: i32,
    pub hospital_type: HospitalType,
    pub hospital_name: String,
    pub hospital_address: String,
    pub hospital_city: String,
    pub hospital_zip_code: u32,
    pub hospital_phone_number: u64,
    pub invoice_number: String,
    pub note: String,
    pub amount: u64,
    pub ailment: String,
    pub insurance_company_index: i16,
    pub insurance_company_name: String,
    pub is_patient_record_created: bool,
    pub is_hospital_record_created: bool,
    pub is_insurance_company_record_created: bool,
    pub patient_record_index: u32,
    pub submitted_at: DateTime<Utc>,
}

impl Claim {
    /// Build a queued claim from a submission.
    pub fn from_submission(
        id: u64,
        submitter: AccountId,
        submission: ClaimSubmission,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            status: ClaimStatus::Queued,
            submitter,
            processor: None,
            patient_index: submission.patient_index,
            payment_mint: submission.payment_mint,
            country_index: submission.country_index,
            state_index: submission.state_index,
            hospital_index: submission.hospital_index,
            hospital_type: submission.hospital_type,
            hospital_name: submission.hospital_name,
            hospital_address: submission.hospital_address,
            hospital_city: submission.hospital_city,
            hospital_zip_code: submission.hospital_zip_code,
            hospital_phone_number: submission.hospital_phone_number,
            invoice_number: submission.invoice_number,
            note: submission.note,
            amount: submission.amount,
            ailment: submission.ailment,
            insurance_company_index: submission.insurance_company_index,
            insurance_company_name: submission.insurance_company_name,
            is_patient_record_created: false,
            is_hospital_record_created: false,
            is_insurance_company_record_created: false,
            patient_record_index: 0,
            submitted_at,
        }
    }

    /// True when none of the derived records exist yet.
    pub fn has_no_records(&self) -> bool {
        !self.is_patient_record_created
            && !self.is_hospital_record_created
            && !self.is_insurance_company_record_created
    }

    /// True when every derived record exists.
    pub fn has_all_records(&self) -> bool {
        self.is_patient_record_created
            && self.is_hospital_record_created
            && self.is_insurance_company_record_created
    }
}

/// The working record of a claim once a processor has taken ownership.
///
/// Addressed by `(processor, sequence)` where `sequence` is the processor's
/// local processed-claim counter at assignment time; the counter only
/// advances on finalize, so the pair stays stable across the whole
/// adjudication including appeals. Denial and appeal reasons are append-only
/// histories; the last entry is the operative one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedClaim {
    /// Protocol-wide processed number, assigned on first finalize.
    pub processed_claim_id: Option<u64>,
    pub claim_id: u64,
    pub processor: AccountId,
    pub sequence: u64,
    pub status: ClaimStatus,
    pub denial_reasons: Vec<String>,
    pub appeal_reasons: Vec<String>,
    pub submitter: AccountId,
    pub patient_index: u8,
    pub country_index: u16,
    pub state_index: u32,
    pub hospital_index: i32,
    pub hospital_type: HospitalType,
    pub hospital_name: String,
    pub hospital_address: String,
    pub hospital_city: String,
    pub hospital_zip_code: u32,
    pub hospital_phone_number: u64,
    pub invoice_number: String,
    pub note: String,
    pub amount: u64,
    pub ailment: String,
    pub insurance_company_index: i16,
    pub insurance_company_name: String,
    pub is_patient_record_created: bool,
    pub is_hospital_record_created: bool,
    pub is_insurance_company_record_created: bool,
    pub patient_record_index: u32,
    pub submitted_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl ProcessedClaim {
    /// Open a working record for a freshly assigned claim.
    pub fn from_assignment(claim: &Claim, processor: AccountId, sequence: u64) -> Self {
        Self {
            processed_claim_id: None,
            claim_id: claim.id,
            processor,
            sequence,
            status: ClaimStatus::Assigned,
            denial_reasons: Vec::new(),
            appeal_reasons: Vec::new(),
            submitter: claim.submitter.clone(),
            patient_index: claim.patient_index,
            country_index: claim.country_index,
            state_index: claim.state_index,
            hospital_index: claim.hospital_index,
            hospital_type: claim.hospital_type,
            hospital_name: claim.hospital_name.clone(),
            hospital_address: claim.hospital_address.clone(),
            hospital_city: claim.hospital_city.clone(),
            hospital_zip_code: claim.hospital_zip_code,
            hospital_phone_number: claim.hospital_phone_number,
            invoice_number: claim.invoice_number.clone(),
            note: claim.note.clone(),
            amount: claim.amount,
            ailment: claim.ailment.clone(),
            insurance_company_index: claim.insurance_company_index,
            insurance_company_name: claim.insurance_company_name.clone(),
            is_patient_record_created: claim.is_patient_record_created,
            is_hospital_record_created: claim.is_hospital_record_created,
            is_insurance_company_record_created: claim.is_insurance_company_record_created,
            patient_record_index: claim.patient_record_index,
            submitted_at: claim.submitted_at,
            processed_at: None,
        }
    }

    /// Re-copy the mutable snapshot from the live claim.
    ///
    /// Index repairs, record creation, and approval edits touch the claim
    /// while it is assigned; the working record picks those up when it
    /// finalizes.
    pub fn refresh_from(&mut self, claim: &Claim) {
        self.country_index = claim.country_index;
        self.state_index = claim.state_index;
        self.hospital_index = claim.hospital_index;
        self.hospital_type = claim.hospital_type;
        self.hospital_name = claim.hospital_name.clone();
        self.hospital_address = claim.hospital_address.clone();
        self.hospital_city = claim.hospital_city.clone();
        self.hospital_zip_code = claim.hospital_zip_code;
        self.hospital_phone_number = claim.hospital_phone_number;
        self.invoice_number = claim.invoice_number.clone();
        self.note = claim.note.clone();
        self.amount = claim.amount;
        self.ailment = claim.ailment.clone();
        self.insurance_company_index = claim.insurance_company_index;
        self.insurance_company_name = claim.insurance_company_name.clone();
        self.is_patient_record_created = claim.is_patient_record_created;
        self.is_hospital_record_created = claim.is_hospital_record_created;
        self.is_insurance_company_record_created = claim.is_insurance_company_record_created;
        self.patient_record_index = claim.patient_record_index;
    }

    /// True when every derived record exists.
    pub fn has_all_records(&self) -> bool {
        self.is_patient_record_created
            && self.is_hospital_record_created
            && self.is_insurance_company_record_created
    }

    /// True when only the patient record exists.
    pub fn has_only_patient_record(&self) -> bool {
        self.is_patient_record_created
            && !self.is_hospital_record_created
            && !self.is_insurance_company_record_created
    }

    /// The operative denial reason, if any.
    pub fn denial_reason(&self) -> Option<&str> {
        self.denial_reasons.last().map(String::as_str)
    }

    /// The operative appeal reason, if any.
    pub fn appeal_reason(&self) -> Option<&str> {
        self.appeal_reasons.last().map(String::as_str)
    }
}

/// Edits a processor may fold into an approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalEdits {
    pub hospital_type: HospitalType,
    pub hospital_longitude: f64,
    pub hospital_latitude: f64,
    pub hospital_name: String,
    pub hospital_address: String,
    pub hospital_city: String,
    pub hospital_zip_code: u32,
    pub hospital_phone_number: u64,
    pub invoice_number: String,
    pub note: String,
    pub amount: u64,
    pub ailment: String,
    pub insurance_company_name: String,
}

/// Post-finalize corrections to a processed claim and its patient record,
/// including re-attribution to different master records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedClaimEdits {
    pub hospital_index: u32,
    pub insurance_company_index: u16,
    pub invoice_number: String,
    pub note: String,
    pub amount: u64,
    pub ailment: String,
}

/// Post-finalize corrections applied uniformly across a processed claim and
/// every record derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEdits {
    pub invoice_number: String,
    pub note: String,
    pub amount: u64,
    pub ailment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> ClaimSubmission {
        ClaimSubmission {
            patient_index: 0,
            payment_mint: MintId::new("mint:usdc"),
            country_index: 1,
            state_index: 5,
            hospital_index: -1,
            hospital_type: HospitalType::General,
            hospital_name: "General Hospital".to_string(),
            hospital_address: "123 Main St".to_string(),
            hospital_city: "Springfield".to_string(),
            hospital_zip_code: 12345,
            hospital_phone_number: 5551234567,
            invoice_number: "INV-001".to_string(),
            note: "note".to_string(),
            amount: 125_00,
            ailment: "broken arm".to_string(),
            insurance_company_index: -1,
            insurance_company_name: "Acme Insurance".to_string(),
        }
    }

    #[test]
    fn test_claim_starts_queued_without_records() {
        let claim = Claim::from_submission(
            1,
            AccountId::new("wallet:alice"),
            submission(),
            Utc::now(),
        );
        assert_eq!(claim.status, ClaimStatus::Queued);
        assert!(claim.has_no_records());
        assert!(!claim.has_all_records());
        assert!(claim.processor.is_none());
    }

    #[test]
    fn test_processed_claim_reason_history() {
        let claim = Claim::from_submission(
            1,
            AccountId::new("wallet:alice"),
            submission(),
            Utc::now(),
        );
        let mut processed =
            ProcessedClaim::from_assignment(&claim, AccountId::new("processor:1"), 0);
        assert!(processed.denial_reason().is_none());

        processed.denial_reasons.push("missing invoice".to_string());
        processed.denial_reasons.push("still missing".to_string());
        assert_eq!(processed.denial_reason(), Some("still missing"));
        assert_eq!(processed.denial_reasons.len(), 2);
    }
}
