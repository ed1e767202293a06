//! Record creation and index repair while a claim is assigned
//!
//! Master records are materialized lazily from the referencing claim's
//! snapshot and creation is idempotent: repeating a create against the same
//! claim is a no-op success. Only malformed or unresolvable indices fail.

use tracing::info;

use claims_core::counter::Counter;
use claims_core::directory::{
    claim_address, hospital_address, insurance_company_address, patient_address,
    patient_record_address, processor_address,
};
use claims_core::types::{
    AccountId, ClaimStatus, HospitalAccount, InsuranceCompanyAccount, PatientRecord,
};
use claims_core::{ClaimsError, ClaimsResult};

use crate::engine::ClaimsLedger;

impl ClaimsLedger {
    /// Repair the hospital index a claim references. Rejected once the
    /// hospital record exists, since the record was derived from the index.
    pub fn update_claim_hospital_index(
        &mut self,
        caller: &AccountId,
        claim_owner: &AccountId,
        hospital_index: u32,
    ) -> ClaimsResult<()> {
        self.require_active_processor(caller)?;
        let mut claim = self.snapshot_assigned_claim(caller, claim_owner)?;
        if claim.is_hospital_record_created {
            return Err(ClaimsError::InvalidState(
                "hospital record already created for the claim".to_string(),
            ));
        }
        claim.hospital_index = i32::try_from(hospital_index).map_err(|_| {
            ClaimsError::Validation(format!("hospital index {hospital_index} out of range"))
        })?;
        self.state.claims.insert(claim_address(claim_owner), claim);
        info!(submitter = %claim_owner, hospital_index, "claim hospital index updated");
        Ok(())
    }

    /// Repair the insurance company index a claim references.
    pub fn update_claim_insurance_company_index(
        &mut self,
        caller: &AccountId,
        claim_owner: &AccountId,
        insurance_company_index: u16,
    ) -> ClaimsResult<()> {
        self.require_active_processor(caller)?;
        let mut claim = self.snapshot_assigned_claim(caller, claim_owner)?;
        if claim.is_insurance_company_record_created {
            return Err(ClaimsError::InvalidState(
                "insurance company record already created for the claim".to_string(),
            ));
        }
        claim.insurance_company_index = i16::try_from(insurance_company_index).map_err(|_| {
            ClaimsError::Validation(format!(
                "insurance company index {insurance_company_index} out of range"
            ))
        })?;
        self.state.claims.insert(claim_address(claim_owner), claim);
        info!(
            submitter = %claim_owner,
            insurance_company_index,
            "claim insurance company index updated"
        );
        Ok(())
    }

    /// Create the patient history record for an assigned claim.
    pub fn create_patient_record(
        &mut self,
        caller: &AccountId,
        claim_owner: &AccountId,
    ) -> ClaimsResult<()> {
        let mut processor = self.require_active_processor(caller)?;
        let mut claim = self.snapshot_assigned_claim(caller, claim_owner)?;
        if claim.is_patient_record_created {
            return Ok(());
        }
        let mut patient = self.snapshot_patient(claim_owner, claim.patient_index)?;

        let record_index = patient.record_count;
        patient.record_count = patient.record_count.bump()?;
        processor.created_patient_record_count = processor.created_patient_record_count.bump()?;
        claim.is_patient_record_created = true;
        claim.patient_record_index = record_index;

        let record = PatientRecord {
            record_id: patient.record_count,
            claim_id: claim.id,
            status: ClaimStatus::Assigned,
            patient_record_only: true,
            denial_reason: None,
            appeal_reason: None,
            submitter: claim.submitter.clone(),
            patient_index: claim.patient_index,
            processor: caller.clone(),
            sequence: processor.processed_claim_count,
            country_index: claim.country_index,
            state_index: claim.state_index,
            hospital_index: claim.hospital_index,
            insurance_company_index: claim.insurance_company_index,
            invoice_number: claim.invoice_number.clone(),
            amount: claim.amount,
            ailment: claim.ailment.clone(),
            note: claim.note.clone(),
            submitted_at: claim.submitted_at,
            processed_at: None,
        };

        info!(
            claim_id = claim.id,
            submitter = %claim_owner,
            record_index,
            "patient record created"
        );

        self.state.patient_records.insert(
            patient_record_address(claim_owner, claim.patient_index, record_index),
            record,
        );
        self.state
            .patients
            .insert(patient_address(claim_owner, claim.patient_index), patient);
        self.state.claims.insert(claim_address(claim_owner), claim);
        self.state
            .processors
            .insert(processor_address(caller), processor);
        Ok(())
    }

    /// Create the hospital and insurance company master records a claim
    /// references, materializing either from the claim snapshot if absent.
    ///
    /// The patient record must exist first. Idempotent: once both records
    /// are attached to the claim, repeat calls succeed without effect.
    pub fn create_hospital_and_insurance_company_records(
        &mut self,
        caller: &AccountId,
        claim_owner: &AccountId,
    ) -> ClaimsResult<()> {
        let mut processor = self.require_active_processor(caller)?;
        let mut claim = self.snapshot_assigned_claim(caller, claim_owner)?;
        if !claim.is_patient_record_created {
            return Err(ClaimsError::InvalidState(
                "patient record must be created before hospital and insurance records".to_string(),
            ));
        }
        if claim.is_hospital_record_created && claim.is_insurance_company_record_created {
            return Ok(());
        }

        let hospital_index = u32::try_from(claim.hospital_index).map_err(|_| {
            ClaimsError::Validation(format!(
                "claim hospital index {} is unresolved; repair it before creating records",
                claim.hospital_index
            ))
        })?;
        let insurance_company_index = u16::try_from(claim.insurance_company_index).map_err(|_| {
            ClaimsError::Validation(format!(
                "claim insurance company index {} is unresolved; repair it before creating records",
                claim.insurance_company_index
            ))
        })?;

        let haddr = hospital_address(claim.country_index, claim.state_index, hospital_index);
        let mut hospital_total = self.state.hospital_total;
        let mut hospital = match self.state.hospitals.get(&haddr) {
            Some(existing) => existing.clone(),
            None => {
                hospital_total = hospital_total.bump()?;
                HospitalAccount::from_claim_snapshot(hospital_total, hospital_index, &claim)
            }
        };

        let iaddr = insurance_company_address(insurance_company_index);
        let mut insurance_company_total = self.state.insurance_company_total;
        let mut insurance_company = match self.state.insurance_companies.get(&iaddr) {
            Some(existing) => existing.clone(),
            None => {
                insurance_company_total = insurance_company_total.bump()?;
                InsuranceCompanyAccount::new(
                    insurance_company_total,
                    insurance_company_index,
                    claim.insurance_company_name.clone(),
                )
            }
        };

        let mut patient_record = self.snapshot_patient_record(
            claim_owner,
            claim.patient_index,
            claim.patient_record_index,
        )?;

        hospital.record_count = hospital.record_count.bump()?;
        insurance_company.record_count = insurance_company.record_count.bump()?;
        processor.created_master_record_count = processor.created_master_record_count.bump()?;
        patient_record.patient_record_only = false;
        claim.is_hospital_record_created = true;
        claim.is_insurance_company_record_created = true;

        info!(
            claim_id = claim.id,
            submitter = %claim_owner,
            hospital_index,
            insurance_company_index,
            "hospital and insurance company records created"
        );

        self.state.hospital_total = hospital_total;
        self.state.insurance_company_total = insurance_company_total;
        self.state.hospitals.insert(haddr, hospital);
        self.state.insurance_companies.insert(iaddr, insurance_company);
        self.state.patient_records.insert(
            patient_record_address(claim_owner, claim.patient_index, claim.patient_record_index),
            patient_record,
        );
        self.state.claims.insert(claim_address(claim_owner), claim);
        self.state
            .processors
            .insert(processor_address(caller), processor);
        Ok(())
    }
}
