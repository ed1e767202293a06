//! Insurance company master records

use serde::{Deserialize, Serialize};

/// Insurance company master record, addressed by its registry index.
///
/// Materialized lazily from the first claim that references the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceCompanyAccount {
    pub id: u16,
    pub insurance_company_index: u16,
    pub name: String,
    pub note: String,
    /// Claims recorded against this company.
    pub record_count: u64,
    pub approved_claim_count: u64,
    pub approved_claim_amount: u64,
    pub denied_claim_count: u64,
    pub undenied_claim_count: u64,
    pub submitted_appeal_count: u64,
    pub denied_appeal_count: u64,
    pub revoked_approval_count: u64,
}

impl InsuranceCompanyAccount {
    /// Materialize a company from a referencing claim's snapshot.
    pub fn new(id: u16, insurance_company_index: u16, name: String) -> Self {
        Self {
            id,
            insurance_company_index,
            name,
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
