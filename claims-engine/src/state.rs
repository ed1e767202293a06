//! In-memory ledger state
//!
//! One map per entity kind, keyed by derived address. Singletons are
//! `Option` so uninitialized access is an explicit error rather than a
//! default value. The id mints are plain monotonic totals; they are not
//! outcome statistics and never roll back.

use std::collections::HashMap;

use claims_core::types::{
    CeoAccount, Claim, ClaimQueue, FeeTokenEntry, HospitalAccount, InsuranceCompanyAccount,
    PatientAccount, PatientRecord, ProcessedClaim, ProcessorAccount, ProtocolStats,
    SubmitterAccount,
};
use claims_core::EntityAddress;

#[derive(Debug, Default)]
pub(crate) struct LedgerState {
    pub ceo: Option<CeoAccount>,
    pub stats: Option<ProtocolStats>,
    pub queue: Option<ClaimQueue>,
    pub fee_tokens: HashMap<EntityAddress, FeeTokenEntry>,
    pub processors: HashMap<EntityAddress, ProcessorAccount>,
    pub submitters: HashMap<EntityAddress, SubmitterAccount>,
    pub patients: HashMap<EntityAddress, PatientAccount>,
    pub claims: HashMap<EntityAddress, Claim>,
    pub processed_claims: HashMap<EntityAddress, ProcessedClaim>,
    pub hospitals: HashMap<EntityAddress, HospitalAccount>,
    pub insurance_companies: HashMap<EntityAddress, InsuranceCompanyAccount>,
    pub patient_records: HashMap<EntityAddress, PatientRecord>,
    // Id mints
    pub submitter_total: u64,
    pub patient_total: u64,
    pub processor_total: u64,
    pub hospital_total: u32,
    pub insurance_company_total: u16,
}
