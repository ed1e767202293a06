//! The ledger engine: construction, read access, and capability checks

use claims_core::directory::{
    claim_address, fee_token_address, hospital_address, insurance_company_address,
    patient_address, patient_record_address, processed_claim_address, processor_address,
    submitter_address,
};
use claims_core::types::{
    AccountId, CeoAccount, Claim, ClaimQueue, ClaimStatus, FeeTokenEntry, HospitalAccount,
    InsuranceCompanyAccount, MintId, PatientAccount, PatientRecord, ProcessedClaim,
    ProcessorAccount, ProtocolStats, SubmitterAccount,
};
use claims_core::{ClaimsError, ClaimsResult};

use crate::config::EngineConfig;
use crate::state::LedgerState;

/// The claims adjudication ledger.
///
/// All state lives behind `&mut self`; every public operation either fully
/// commits or fails without a trace.
#[derive(Debug, Default)]
pub struct ClaimsLedger {
    pub(crate) config: EngineConfig,
    pub(crate) state: LedgerState,
}

impl ClaimsLedger {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with explicit configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            state: LedgerState::default(),
        }
    }

    // ---- Read access ----

    pub fn ceo(&self) -> Option<&CeoAccount> {
        self.state.ceo.as_ref()
    }

    pub fn stats(&self) -> Option<&ProtocolStats> {
        self.state.stats.as_ref()
    }

    pub fn queue(&self) -> Option<&ClaimQueue> {
        self.state.queue.as_ref()
    }

    pub fn fee_token(&self, mint: &MintId) -> Option<&FeeTokenEntry> {
        self.state.fee_tokens.get(&fee_token_address(mint))
    }

    pub fn processor(&self, identity: &AccountId) -> Option<&ProcessorAccount> {
        self.state.processors.get(&processor_address(identity))
    }

    pub fn submitter(&self, identity: &AccountId) -> Option<&SubmitterAccount> {
        self.state.submitters.get(&submitter_address(identity))
    }

    pub fn patient(&self, submitter: &AccountId, patient_index: u8) -> Option<&PatientAccount> {
        self.state
            .patients
            .get(&patient_address(submitter, patient_index))
    }

    pub fn claim(&self, submitter: &AccountId) -> Option<&Claim> {
        self.state.claims.get(&claim_address(submitter))
    }

    pub fn processed_claim(
        &self,
        processor: &AccountId,
        sequence: u64,
    ) -> Option<&ProcessedClaim> {
        self.state
            .processed_claims
            .get(&processed_claim_address(processor, sequence))
    }

    pub fn hospital(
        &self,
        country_index: u16,
        state_index: u32,
        hospital_index: u32,
    ) -> Option<&HospitalAccount> {
        self.state
            .hospitals
            .get(&hospital_address(country_index, state_index, hospital_index))
    }

    pub fn insurance_company(
        &self,
        insurance_company_index: u16,
    ) -> Option<&InsuranceCompanyAccount> {
        self.state
            .insurance_companies
            .get(&insurance_company_address(insurance_company_index))
    }

    pub fn patient_record(
        &self,
        submitter: &AccountId,
        patient_index: u8,
        record_index: u32,
    ) -> Option<&PatientRecord> {
        self.state
            .patient_records
            .get(&patient_record_address(submitter, patient_index, record_index))
    }

    /// Claims still sitting in the queue, unassigned.
    ///
    /// Denial-hammer batches are built from this view between calls.
    pub fn queued_claims(&self) -> impl Iterator<Item = &Claim> {
        self.state
            .claims
            .values()
            .filter(|claim| claim.status == ClaimStatus::Queued)
    }

    // ---- Capability checks ----

    pub(crate) fn require_ceo(&self, caller: &AccountId) -> ClaimsResult<()> {
        let ceo = self
            .state
            .ceo
            .as_ref()
            .ok_or_else(|| ClaimsError::NotFound("ceo account is not initialized".to_string()))?;
        if ceo.owner != *caller {
            tracing::warn!(caller = %caller, "rejected ceo-only operation");
            return Err(ClaimsError::Unauthorized(
                "only the ceo can perform this operation".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn require_super_admin_or_ceo(&self, caller: &AccountId) -> ClaimsResult<()> {
        if let Some(ceo) = self.state.ceo.as_ref() {
            if ceo.owner == *caller {
                return Ok(());
            }
        }
        if let Some(processor) = self.processor(caller) {
            if processor.is_active && processor.is_super_admin {
                return Ok(());
            }
        }
        tracing::warn!(caller = %caller, "rejected admin-only operation");
        Err(ClaimsError::Unauthorized(
            "only the ceo or a super-admin processor can perform this operation".to_string(),
        ))
    }

    /// Gate for max-deny: admin-only by default, any active processor when
    /// the engine was configured that way.
    pub(crate) fn require_max_deny_authority(&self, caller: &AccountId) -> ClaimsResult<()> {
        if self.config.max_deny_requires_super_admin {
            self.require_super_admin_or_ceo(caller)
        } else {
            if let Some(ceo) = self.state.ceo.as_ref() {
                if ceo.owner == *caller {
                    return Ok(());
                }
            }
            self.require_active_processor(caller).map(|_| ())
        }
    }

    /// Resolve the caller as an active processor, cloning the record for a
    /// staged write.
    pub(crate) fn require_active_processor(
        &self,
        caller: &AccountId,
    ) -> ClaimsResult<ProcessorAccount> {
        match self.processor(caller) {
            Some(processor) if processor.is_active => Ok(processor.clone()),
            _ => {
                tracing::warn!(caller = %caller, "rejected processor-only operation");
                Err(ClaimsError::Unauthorized(
                    "only an active processor can perform this operation".to_string(),
                ))
            }
        }
    }

    // ---- Staged-write snapshots ----
    //
    // Operations mutate clones and commit them all at once; a `?` anywhere
    // before the commit leaves the ledger untouched.

    pub(crate) fn snapshot_stats(&self) -> ClaimsResult<ProtocolStats> {
        self.state.stats.clone().ok_or_else(|| {
            ClaimsError::NotFound("protocol stats are not initialized".to_string())
        })
    }

    pub(crate) fn snapshot_queue(&self) -> ClaimsResult<ClaimQueue> {
        self.state
            .queue
            .clone()
            .ok_or_else(|| ClaimsError::NotFound("claim queue is not initialized".to_string()))
    }

    pub(crate) fn snapshot_submitter(&self, identity: &AccountId) -> ClaimsResult<SubmitterAccount> {
        self.submitter(identity).cloned().ok_or_else(|| {
            ClaimsError::NotFound(format!("no submitter account for {identity}"))
        })
    }

    pub(crate) fn snapshot_patient(
        &self,
        submitter: &AccountId,
        patient_index: u8,
    ) -> ClaimsResult<PatientAccount> {
        self.patient(submitter, patient_index).cloned().ok_or_else(|| {
            ClaimsError::NotFound(format!(
                "no patient account at index {patient_index} for {submitter}"
            ))
        })
    }

    pub(crate) fn snapshot_processor(&self, identity: &AccountId) -> ClaimsResult<ProcessorAccount> {
        self.processor(identity).cloned().ok_or_else(|| {
            ClaimsError::NotFound(format!("no processor account for {identity}"))
        })
    }

    pub(crate) fn snapshot_hospital(
        &self,
        country_index: u16,
        state_index: u32,
        hospital_index: u32,
    ) -> ClaimsResult<HospitalAccount> {
        self.hospital(country_index, state_index, hospital_index)
            .cloned()
            .ok_or_else(|| {
                ClaimsError::NotFound(format!(
                    "no hospital record at ({country_index}, {state_index}, {hospital_index})"
                ))
            })
    }

    pub(crate) fn snapshot_insurance_company(
        &self,
        insurance_company_index: u16,
    ) -> ClaimsResult<InsuranceCompanyAccount> {
        self.insurance_company(insurance_company_index)
            .cloned()
            .ok_or_else(|| {
                ClaimsError::NotFound(format!(
                    "no insurance company record at index {insurance_company_index}"
                ))
            })
    }

    pub(crate) fn snapshot_patient_record(
        &self,
        submitter: &AccountId,
        patient_index: u8,
        record_index: u32,
    ) -> ClaimsResult<PatientRecord> {
        self.patient_record(submitter, patient_index, record_index)
            .cloned()
            .ok_or_else(|| {
                ClaimsError::NotFound(format!(
                    "no patient record at index {record_index} for {submitter}"
                ))
            })
    }

    pub(crate) fn snapshot_processed_claim(
        &self,
        processor: &AccountId,
        sequence: u64,
    ) -> ClaimsResult<ProcessedClaim> {
        self.processed_claim(processor, sequence).cloned().ok_or_else(|| {
            ClaimsError::NotFound(format!(
                "no processed claim at sequence {sequence} for processor {processor}"
            ))
        })
    }

    /// The claim a processor currently has assigned, checked for ownership.
    pub(crate) fn snapshot_assigned_claim(
        &self,
        caller: &AccountId,
        claim_owner: &AccountId,
    ) -> ClaimsResult<Claim> {
        let claim = self
            .claim(claim_owner)
            .ok_or_else(|| ClaimsError::NotFound(format!("no claim for submitter {claim_owner}")))?;
        if claim.status != ClaimStatus::Assigned {
            return Err(ClaimsError::InvalidState(
                "claim is not in the assigned state".to_string(),
            ));
        }
        if claim.processor.as_ref() != Some(caller) {
            return Err(ClaimsError::Unauthorized(
                "only the processor assigned to the claim can perform this operation".to_string(),
            ));
        }
        Ok(claim.clone())
    }
}
