//! Post-denial edges: appeals, undenials, appeal denials, and revocation
//!
//! These operations act on processed claims, addressed by the owning
//! processor's identity and local sequence. Outcome counters only ever
//! grow; a reversal gets its own counter instead of rewriting the one it
//! reverses.

use chrono::Utc;
use tracing::info;

use claims_core::counter::{add_amount, sub_amount, Counter};
use claims_core::directory::{
    fee_token_address, hospital_address, insurance_company_address, patient_address,
    patient_record_address, processed_claim_address, processor_address, submitter_address,
};
use claims_core::types::{
    AccountId, ClaimStatus, HospitalAccount, InsuranceCompanyAccount, MintId, ProcessedClaim,
};
use claims_core::{ClaimsError, ClaimsResult, EntityAddress};

use crate::engine::ClaimsLedger;
use crate::validate;

/// Which derived records an appeal-stage operation expects on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordSet {
    PatientOnly,
    All,
}

impl ClaimsLedger {
    /// Appeal a denied claim that never got hospital or insurance records.
    pub fn appeal_denied_claim_with_only_patient_record(
        &mut self,
        caller: &AccountId,
        processor: &AccountId,
        sequence: u64,
        payment_mint: &MintId,
        appeal_reason: String,
    ) -> ClaimsResult<()> {
        self.appeal_denied_claim(caller, processor, sequence, payment_mint, appeal_reason, RecordSet::PatientOnly)
    }

    /// Appeal a denied claim whose full record set exists.
    pub fn appeal_denied_claim_with_all_records(
        &mut self,
        caller: &AccountId,
        processor: &AccountId,
        sequence: u64,
        payment_mint: &MintId,
        appeal_reason: String,
    ) -> ClaimsResult<()> {
        self.appeal_denied_claim(caller, processor, sequence, payment_mint, appeal_reason, RecordSet::All)
    }

    fn appeal_denied_claim(
        &mut self,
        caller: &AccountId,
        processor: &AccountId,
        sequence: u64,
        payment_mint: &MintId,
        appeal_reason: String,
        record_set: RecordSet,
    ) -> ClaimsResult<()> {
        validate::reason("appeal reason", &appeal_reason)?;
        if !self
            .state
            .fee_tokens
            .contains_key(&fee_token_address(payment_mint))
        {
            return Err(ClaimsError::UnknownPaymentToken(payment_mint.to_string()));
        }
        let mut processed = self.snapshot_processed_claim(processor, sequence)?;
        if processed.submitter != *caller {
            return Err(ClaimsError::Unauthorized(
                "only the original submitter can appeal the claim".to_string(),
            ));
        }
        if !processed.status.is_appealable() {
            return Err(ClaimsError::InvalidState(
                "claim is not in a denied state".to_string(),
            ));
        }
        check_record_set(&processed, record_set)?;

        let mut stats = self.snapshot_stats()?;
        let mut submitter = self.snapshot_submitter(caller)?;
        let mut patient = self.snapshot_patient(caller, processed.patient_index)?;
        let mut patient_record = self.snapshot_patient_record(
            caller,
            processed.patient_index,
            processed.patient_record_index,
        )?;
        let masters = match record_set {
            RecordSet::All => {
                let (haddr, hospital, iaddr, insurance_company) =
                    self.snapshot_masters_for(&processed)?;
                let mut hospital = hospital;
                let mut insurance_company = insurance_company;
                hospital.submitted_appeal_count = hospital.submitted_appeal_count.bump()?;
                insurance_company.submitted_appeal_count =
                    insurance_company.submitted_appeal_count.bump()?;
                Some((haddr, hospital, iaddr, insurance_company))
            }
            RecordSet::PatientOnly => None,
        };

        stats.record_appeal()?;
        submitter.submitted_appeal_count = submitter.submitted_appeal_count.bump()?;
        patient.submitted_appeal_count = patient.submitted_appeal_count.bump()?;

        patient_record.status = ClaimStatus::Appealed;
        patient_record.appeal_reason = Some(appeal_reason.clone());
        processed.status = ClaimStatus::Appealed;
        processed.appeal_reasons.push(appeal_reason.clone());

        info!(
            claim_id = processed.claim_id,
            submitter = %caller,
            processor = %processor,
            sequence,
            reason = %appeal_reason,
            "denied claim appealed"
        );

        if let Some((haddr, hospital, iaddr, insurance_company)) = masters {
            self.state.hospitals.insert(haddr, hospital);
            self.state.insurance_companies.insert(iaddr, insurance_company);
        }
        self.state.patient_records.insert(
            patient_record_address(caller, processed.patient_index, processed.patient_record_index),
            patient_record,
        );
        self.state
            .patients
            .insert(patient_address(caller, processed.patient_index), patient);
        self.state
            .submitters
            .insert(submitter_address(caller), submitter);
        self.state
            .processed_claims
            .insert(processed_claim_address(processor, sequence), processed);
        self.state.stats = Some(stats);
        Ok(())
    }

    /// Undeny an appealed claim, creating the hospital and insurance master
    /// records the original adjudication never did.
    pub fn undeny_claim_and_create_records(
        &mut self,
        caller: &AccountId,
        processor: &AccountId,
        sequence: u64,
    ) -> ClaimsResult<()> {
        self.undeny_claim(caller, processor, sequence, RecordSet::PatientOnly)
    }

    /// Undeny an appealed claim whose full record set already exists.
    pub fn undeny_claim_with_all_records(
        &mut self,
        caller: &AccountId,
        processor: &AccountId,
        sequence: u64,
    ) -> ClaimsResult<()> {
        self.undeny_claim(caller, processor, sequence, RecordSet::All)
    }

    fn undeny_claim(
        &mut self,
        caller: &AccountId,
        processor: &AccountId,
        sequence: u64,
        record_set: RecordSet,
    ) -> ClaimsResult<()> {
        self.require_super_admin_or_ceo(caller)?;
        let mut processed = self.snapshot_processed_claim(processor, sequence)?;
        if processed.status != ClaimStatus::Appealed {
            return Err(ClaimsError::InvalidState(
                "claim is not in an appealed state".to_string(),
            ));
        }
        check_record_set(&processed, record_set)?;

        let mut stats = self.snapshot_stats()?;
        let mut submitter = self.snapshot_submitter(&processed.submitter)?;
        let mut patient =
            self.snapshot_patient(&processed.submitter, processed.patient_index)?;
        let mut owning_processor = self.snapshot_processor(processor)?;
        let mut patient_record = self.snapshot_patient_record(
            &processed.submitter,
            processed.patient_index,
            processed.patient_record_index,
        )?;
        let amount = processed.amount;
        let now = Utc::now();

        // Resolve or materialize the master records, depending on the path.
        let mut hospital_total = self.state.hospital_total;
        let mut insurance_company_total = self.state.insurance_company_total;
        let (haddr, mut hospital, iaddr, mut insurance_company, created) = match record_set {
            RecordSet::All => {
                let (haddr, hospital, iaddr, insurance_company) =
                    self.snapshot_masters_for(&processed)?;
                (haddr, hospital, iaddr, insurance_company, false)
            }
            RecordSet::PatientOnly => {
                let (haddr, hospital, iaddr, insurance_company) = self.materialize_masters_for(
                    &processed,
                    &mut hospital_total,
                    &mut insurance_company_total,
                )?;
                (haddr, hospital, iaddr, insurance_company, true)
            }
        };

        stats.record_undenial(amount)?;
        submitter.undenied_claim_count = submitter.undenied_claim_count.bump()?;
        submitter.approved_claim_amount = add_amount(submitter.approved_claim_amount, amount)?;
        patient.undenied_claim_count = patient.undenied_claim_count.bump()?;
        patient.approved_claim_amount = add_amount(patient.approved_claim_amount, amount)?;
        owning_processor.undenied_claim_count = owning_processor.undenied_claim_count.bump()?;
        owning_processor.approved_claim_amount =
            add_amount(owning_processor.approved_claim_amount, amount)?;
        hospital.undenied_claim_count = hospital.undenied_claim_count.bump()?;
        hospital.approved_claim_amount = add_amount(hospital.approved_claim_amount, amount)?;
        insurance_company.undenied_claim_count = insurance_company.undenied_claim_count.bump()?;
        insurance_company.approved_claim_amount =
            add_amount(insurance_company.approved_claim_amount, amount)?;

        if created {
            hospital.record_count = hospital.record_count.bump()?;
            insurance_company.record_count = insurance_company.record_count.bump()?;
            processed.is_hospital_record_created = true;
            processed.is_insurance_company_record_created = true;
            patient_record.patient_record_only = false;
        }

        processed.status = ClaimStatus::Undenied;
        processed.processed_at = Some(now);
        patient_record.status = ClaimStatus::Undenied;
        patient_record.processed_at = Some(now);

        info!(
            claim_id = processed.claim_id,
            processor = %processor,
            sequence,
            amount,
            created_records = created,
            "appealed claim undenied"
        );

        let submitter_identity = processed.submitter.clone();
        self.state.hospital_total = hospital_total;
        self.state.insurance_company_total = insurance_company_total;
        self.state.hospitals.insert(haddr, hospital);
        self.state.insurance_companies.insert(iaddr, insurance_company);
        self.state.patient_records.insert(
            patient_record_address(
                &submitter_identity,
                processed.patient_index,
                processed.patient_record_index,
            ),
            patient_record,
        );
        self.state.patients.insert(
            patient_address(&submitter_identity, processed.patient_index),
            patient,
        );
        self.state
            .submitters
            .insert(submitter_address(&submitter_identity), submitter);
        self.state
            .processors
            .insert(processor_address(processor), owning_processor);
        self.state
            .processed_claims
            .insert(processed_claim_address(processor, sequence), processed);
        self.state.stats = Some(stats);
        Ok(())
    }

    /// Deny an appeal on a claim that only has a patient record.
    pub fn deny_appealed_claim_with_only_patient_record(
        &mut self,
        caller: &AccountId,
        processor: &AccountId,
        sequence: u64,
        denial_reason: String,
    ) -> ClaimsResult<()> {
        self.deny_appealed_claim(caller, processor, sequence, denial_reason, RecordSet::PatientOnly)
    }

    /// Deny an appeal on a claim whose full record set exists.
    pub fn deny_appealed_claim_with_all_records(
        &mut self,
        caller: &AccountId,
        processor: &AccountId,
        sequence: u64,
        denial_reason: String,
    ) -> ClaimsResult<()> {
        self.deny_appealed_claim(caller, processor, sequence, denial_reason, RecordSet::All)
    }

    fn deny_appealed_claim(
        &mut self,
        caller: &AccountId,
        processor: &AccountId,
        sequence: u64,
        denial_reason: String,
        record_set: RecordSet,
    ) -> ClaimsResult<()> {
        self.require_super_admin_or_ceo(caller)?;
        validate::reason("denial reason", &denial_reason)?;
        let mut processed = self.snapshot_processed_claim(processor, sequence)?;
        if processed.status != ClaimStatus::Appealed {
            return Err(ClaimsError::InvalidState(
                "claim is not in an appealed state".to_string(),
            ));
        }
        check_record_set(&processed, record_set)?;

        let mut stats = self.snapshot_stats()?;
        let mut submitter = self.snapshot_submitter(&processed.submitter)?;
        let mut patient =
            self.snapshot_patient(&processed.submitter, processed.patient_index)?;
        let mut owning_processor = self.snapshot_processor(processor)?;
        let mut patient_record = self.snapshot_patient_record(
            &processed.submitter,
            processed.patient_index,
            processed.patient_record_index,
        )?;
        let masters = match record_set {
            RecordSet::All => {
                let (haddr, mut hospital, iaddr, mut insurance_company) =
                    self.snapshot_masters_for(&processed)?;
                hospital.denied_appeal_count = hospital.denied_appeal_count.bump()?;
                insurance_company.denied_appeal_count =
                    insurance_company.denied_appeal_count.bump()?;
                Some((haddr, hospital, iaddr, insurance_company))
            }
            RecordSet::PatientOnly => None,
        };
        let now = Utc::now();

        stats.record_appeal_denial()?;
        submitter.denied_appeal_count = submitter.denied_appeal_count.bump()?;
        patient.denied_appeal_count = patient.denied_appeal_count.bump()?;
        owning_processor.denied_appeal_count = owning_processor.denied_appeal_count.bump()?;

        patient_record.status = ClaimStatus::AppealDenied;
        patient_record.denial_reason = Some(denial_reason.clone());
        patient_record.processed_at = Some(now);
        processed.status = ClaimStatus::AppealDenied;
        processed.denial_reasons.push(denial_reason.clone());
        processed.processed_at = Some(now);

        info!(
            claim_id = processed.claim_id,
            processor = %processor,
            sequence,
            reason = %denial_reason,
            "appeal denied"
        );

        let submitter_identity = processed.submitter.clone();
        if let Some((haddr, hospital, iaddr, insurance_company)) = masters {
            self.state.hospitals.insert(haddr, hospital);
            self.state.insurance_companies.insert(iaddr, insurance_company);
        }
        self.state.patient_records.insert(
            patient_record_address(
                &submitter_identity,
                processed.patient_index,
                processed.patient_record_index,
            ),
            patient_record,
        );
        self.state.patients.insert(
            patient_address(&submitter_identity, processed.patient_index),
            patient,
        );
        self.state
            .submitters
            .insert(submitter_address(&submitter_identity), submitter);
        self.state
            .processors
            .insert(processor_address(processor), owning_processor);
        self.state
            .processed_claims
            .insert(processed_claim_address(processor, sequence), processed);
        self.state.stats = Some(stats);
        Ok(())
    }

    /// Revoke an approved claim. The approval stays on the books as history;
    /// the revocation gets its own counter and claws the amount back from
    /// the approved totals. The submitter can appeal a revocation.
    pub fn revoke_approval(
        &mut self,
        caller: &AccountId,
        processor: &AccountId,
        sequence: u64,
        denial_reason: String,
    ) -> ClaimsResult<()> {
        self.require_super_admin_or_ceo(caller)?;
        validate::reason("denial reason", &denial_reason)?;
        let mut processed = self.snapshot_processed_claim(processor, sequence)?;
        if processed.status != ClaimStatus::Approved {
            return Err(ClaimsError::InvalidState(
                "claim is not in an approved state".to_string(),
            ));
        }

        let mut stats = self.snapshot_stats()?;
        let mut submitter = self.snapshot_submitter(&processed.submitter)?;
        let mut patient =
            self.snapshot_patient(&processed.submitter, processed.patient_index)?;
        let mut owning_processor = self.snapshot_processor(processor)?;
        let mut patient_record = self.snapshot_patient_record(
            &processed.submitter,
            processed.patient_index,
            processed.patient_record_index,
        )?;
        let (haddr, mut hospital, iaddr, mut insurance_company) =
            self.snapshot_masters_for(&processed)?;
        let amount = processed.amount;
        let now = Utc::now();

        stats.record_revocation(amount)?;
        submitter.revoked_approval_count = submitter.revoked_approval_count.bump()?;
        submitter.approved_claim_amount = sub_amount(submitter.approved_claim_amount, amount)?;
        patient.revoked_approval_count = patient.revoked_approval_count.bump()?;
        patient.approved_claim_amount = sub_amount(patient.approved_claim_amount, amount)?;
        owning_processor.revoked_approval_count = owning_processor.revoked_approval_count.bump()?;
        owning_processor.approved_claim_amount =
            sub_amount(owning_processor.approved_claim_amount, amount)?;
        hospital.revoked_approval_count = hospital.revoked_approval_count.bump()?;
        hospital.approved_claim_amount = sub_amount(hospital.approved_claim_amount, amount)?;
        insurance_company.revoked_approval_count =
            insurance_company.revoked_approval_count.bump()?;
        insurance_company.approved_claim_amount =
            sub_amount(insurance_company.approved_claim_amount, amount)?;

        processed.status = ClaimStatus::Revoked;
        processed.denial_reasons.push(denial_reason.clone());
        processed.processed_at = Some(now);
        patient_record.status = ClaimStatus::Revoked;
        patient_record.denial_reason = Some(denial_reason.clone());
        patient_record.processed_at = Some(now);

        info!(
            claim_id = processed.claim_id,
            processor = %processor,
            sequence,
            amount,
            reason = %denial_reason,
            "approval revoked"
        );

        let submitter_identity = processed.submitter.clone();
        self.state.hospitals.insert(haddr, hospital);
        self.state.insurance_companies.insert(iaddr, insurance_company);
        self.state.patient_records.insert(
            patient_record_address(
                &submitter_identity,
                processed.patient_index,
                processed.patient_record_index,
            ),
            patient_record,
        );
        self.state.patients.insert(
            patient_address(&submitter_identity, processed.patient_index),
            patient,
        );
        self.state
            .submitters
            .insert(submitter_address(&submitter_identity), submitter);
        self.state
            .processors
            .insert(processor_address(processor), owning_processor);
        self.state
            .processed_claims
            .insert(processed_claim_address(processor, sequence), processed);
        self.state.stats = Some(stats);
        Ok(())
    }

    /// Clone the master records a processed claim references.
    pub(crate) fn snapshot_masters_for(
        &self,
        processed: &ProcessedClaim,
    ) -> ClaimsResult<(
        EntityAddress,
        HospitalAccount,
        EntityAddress,
        InsuranceCompanyAccount,
    )> {
        let (hospital_index, insurance_company_index) = resolved_indices(processed)?;
        let haddr = hospital_address(
            processed.country_index,
            processed.state_index,
            hospital_index,
        );
        let hospital = self.snapshot_hospital(
            processed.country_index,
            processed.state_index,
            hospital_index,
        )?;
        let iaddr = insurance_company_address(insurance_company_index);
        let insurance_company = self.snapshot_insurance_company(insurance_company_index)?;
        Ok((haddr, hospital, iaddr, insurance_company))
    }

    /// Resolve the master records a processed claim references, creating
    /// either from the claim snapshot if absent. New id mint values are
    /// staged through the caller's locals and committed with everything
    /// else.
    fn materialize_masters_for(
        &self,
        processed: &ProcessedClaim,
        hospital_total: &mut u32,
        insurance_company_total: &mut u16,
    ) -> ClaimsResult<(
        EntityAddress,
        HospitalAccount,
        EntityAddress,
        InsuranceCompanyAccount,
    )> {
        let (hospital_index, insurance_company_index) = resolved_indices(processed)?;
        let haddr = hospital_address(
            processed.country_index,
            processed.state_index,
            hospital_index,
        );
        let hospital = match self.state.hospitals.get(&haddr) {
            Some(existing) => existing.clone(),
            None => {
                *hospital_total = hospital_total.bump()?;
                HospitalAccount::from_processed_claim(*hospital_total, hospital_index, processed)
            }
        };
        let iaddr = insurance_company_address(insurance_company_index);
        let insurance_company = match self.state.insurance_companies.get(&iaddr) {
            Some(existing) => existing.clone(),
            None => {
                *insurance_company_total = insurance_company_total.bump()?;
                InsuranceCompanyAccount::new(
                    *insurance_company_total,
                    insurance_company_index,
                    processed.insurance_company_name.clone(),
                )
            }
        };
        Ok((haddr, hospital, iaddr, insurance_company))
    }
}

/// Both referenced indices must have resolved for record-bearing paths.
fn resolved_indices(processed: &ProcessedClaim) -> ClaimsResult<(u32, u16)> {
    let hospital_index = u32::try_from(processed.hospital_index).map_err(|_| {
        ClaimsError::Validation(format!(
            "claim hospital index {} is unresolved",
            processed.hospital_index
        ))
    })?;
    let insurance_company_index =
        u16::try_from(processed.insurance_company_index).map_err(|_| {
            ClaimsError::Validation(format!(
                "claim insurance company index {} is unresolved",
                processed.insurance_company_index
            ))
        })?;
    Ok((hospital_index, insurance_company_index))
}

/// Reject an appeal-stage operation whose target's record set does not
/// match the variant the caller picked.
fn check_record_set(processed: &ProcessedClaim, record_set: RecordSet) -> ClaimsResult<()> {
    let matches = match record_set {
        RecordSet::PatientOnly => processed.has_only_patient_record(),
        RecordSet::All => processed.has_all_records(),
    };
    if !matches {
        return Err(ClaimsError::InvalidState(
            "claim's record set does not match this operation variant".to_string(),
        ));
    }
    Ok(())
}
