//! Hospital master records

use serde::{Deserialize, Serialize};

use super::claim::{Claim, ProcessedClaim};
use super::common::HospitalType;

/// Hospital master record, addressed by `(country, state, hospital index)`.
///
/// Materialized lazily from the first claim that references the index;
/// coordinates are unknown at that point and stay zero until an
/// approve-with-edits supplies them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalAccount {
    pub id: u32,
    pub country_index: u16,
    pub state_index: u32,
    pub hospital_index: u32,
    pub hospital_type: HospitalType,
    pub longitude: f64,
    pub latitude: f64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub zip_code: u32,
    pub phone_number: u64,
    pub note: String,
    /// Claims recorded against this hospital.
    pub record_count: u64,
    pub approved_claim_count: u64,
    pub approved_claim_amount: u64,
    pub denied_claim_count: u64,
    pub undenied_claim_count: u64,
    pub submitted_appeal_count: u64,
    pub denied_appeal_count: u64,
    pub revoked_approval_count: u64,
}

impl HospitalAccount {
    /// Materialize a hospital from a referencing claim's snapshot.
    pub fn from_claim_snapshot(id: u32, hospital_index: u32, claim: &Claim) -> Self {
        Self {
            id,
            country_index: claim.country_index,
            state_index: claim.state_index,
            hospital_index,
            hospital_type: claim.hospital_type,
            longitude: 0.0,
            latitude: 0.0,
            name: claim.hospital_name.clone(),
            address: claim.hospital_address.clone(),
            city: claim.hospital_city.clone(),
            zip_code: claim.hospital_zip_code,
            phone_number: claim.hospital_phone_number,
            note: String::new(),
            record_count: 0,
            approved_claim_count: 0,
            approved_claim_amount: 0,
            denied_claim_count: 0,
            undenied_claim_count: 0,
            submitted_appeal_count: 0,
            denied_appeal_count: 0,
            revoked_approval_count: 0,
        }
    }

    /// Materialize a hospital from a processed claim's snapshot.
    ///
    /// Used when an undenial has to create the master records the original
    /// adjudication never did.
    pub fn from_processed_claim(id: u32, hospital_index: u32, processed: &ProcessedClaim) -> Self {
        Self {
            id,
            country_index: processed.country_index,
            state_index: processed.state_index,
            hospital_index,
            hospital_type: processed.hospital_type,
            longitude: 0.0,
            latitude: 0.0,
            name: processed.hospital_name.clone(),
            address: processed.hospital_address.clone(),
            city: processed.hospital_city.clone(),
            zip_code: processed.hospital_zip_code,
            phone_number: processed.hospital_phone_number,
            note: String::new(),
            record_count: 0,
            approved_claim_count: 0,
            approved_claim_amount: 0,
            denied_claim_count: 0,
            undenied_claim_count: 0,
            submitted_appeal_count: 0,
            denied_appeal_count: 0,
            revoked_approval_count: 0,
        }
    }
}
