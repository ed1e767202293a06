//! First-finalize edges: approve, deny, and the administrative max-deny
//!
//! Every path here consumes the live claim, stamps the working record with
//! its outcome, advances the owning processor's sequence, and updates the
//! aggregate counters inside the same commit. The claim slot frees up for
//! the submitter's next claim.

use chrono::Utc;
use tracing::info;

use claims_core::counter::{add_amount, Counter};
use claims_core::directory::{
    claim_address, hospital_address, insurance_company_address, patient_address,
    patient_record_address, processed_claim_address, processor_address, submitter_address,
};
use claims_core::types::{AccountId, ApprovalEdits, ClaimStatus, PatientRecord};
use claims_core::{ClaimsError, ClaimsResult};

use crate::engine::ClaimsLedger;
use crate::validate;

impl ClaimsLedger {
    /// Approve an assigned claim. All three derived records must exist;
    /// release of the escrowed payment happens in the external token
    /// service once the approval lands.
    pub fn approve_claim(&mut self, caller: &AccountId, claim_owner: &AccountId) -> ClaimsResult<()> {
        self.finalize_approval(caller, claim_owner, None)
    }

    /// Approve an assigned claim, folding field corrections into the claim,
    /// its master records, and its patient record first.
    pub fn approve_claim_with_edits(
        &mut self,
        caller: &AccountId,
        claim_owner: &AccountId,
        edits: ApprovalEdits,
    ) -> ClaimsResult<()> {
        validate::approval_edits(&edits)?;
        self.finalize_approval(caller, claim_owner, Some(edits))
    }

    fn finalize_approval(
        &mut self,
        caller: &AccountId,
        claim_owner: &AccountId,
        edits: Option<ApprovalEdits>,
    ) -> ClaimsResult<()> {
        let mut processor = self.require_active_processor(caller)?;
        let mut claim = self.snapshot_assigned_claim(caller, claim_owner)?;
        if !claim.has_all_records() {
            return Err(ClaimsError::InvalidState(
                "patient, hospital, and insurance company records must exist before approval"
                    .to_string(),
            ));
        }
        // Records exist, so both indices resolved when they were created.
        let hospital_index = u32::try_from(claim.hospital_index)
            .map_err(|_| ClaimsError::InvalidState("claim hospital index is unresolved".to_string()))?;
        let insurance_company_index = u16::try_from(claim.insurance_company_index).map_err(|_| {
            ClaimsError::InvalidState("claim insurance company index is unresolved".to_string())
        })?;

        let mut stats = self.snapshot_stats()?;
        let mut queue = self.snapshot_queue()?;
        let mut submitter = self.snapshot_submitter(claim_owner)?;
        let mut patient = self.snapshot_patient(claim_owner, claim.patient_index)?;
        let mut hospital =
            self.snapshot_hospital(claim.country_index, claim.state_index, hospital_index)?;
        let mut insurance_company = self.snapshot_insurance_company(insurance_company_index)?;
        let mut patient_record = self.snapshot_patient_record(
            claim_owner,
            claim.patient_index,
            claim.patient_record_index,
        )?;
        let sequence = processor.processed_claim_count;
        let mut processed = self.snapshot_processed_claim(caller, sequence)?;

        if let Some(edits) = edits {
            claim.hospital_type = edits.hospital_type;
            claim.hospital_name = edits.hospital_name;
            claim.hospital_address = edits.hospital_address;
            claim.hospital_city = edits.hospital_city;
            claim.hospital_zip_code = edits.hospital_zip_code;
            claim.hospital_phone_number = edits.hospital_phone_number;
            claim.invoice_number = edits.invoice_number;
            claim.note = edits.note;
            claim.amount = edits.amount;
            claim.ailment = edits.ailment;
            claim.insurance_company_name = edits.insurance_company_name;

            hospital.hospital_type = claim.hospital_type;
            hospital.longitude = edits.hospital_longitude;
            hospital.latitude = edits.hospital_latitude;
            hospital.name = claim.hospital_name.clone();
            hospital.address = claim.hospital_address.clone();
            hospital.city = claim.hospital_city.clone();
            hospital.zip_code = claim.hospital_zip_code;
            hospital.phone_number = claim.hospital_phone_number;

            insurance_company.name = claim.insurance_company_name.clone();
        }
        let amount = claim.amount;
        let now = Utc::now();

        stats.record_approval(amount)?;
        queue.current_queue_count = queue.current_queue_count.shrink()?;
        submitter.approved_claim_count = submitter.approved_claim_count.bump()?;
        submitter.approved_claim_amount = add_amount(submitter.approved_claim_amount, amount)?;
        patient.approved_claim_count = patient.approved_claim_count.bump()?;
        patient.approved_claim_amount = add_amount(patient.approved_claim_amount, amount)?;
        hospital.approved_claim_count = hospital.approved_claim_count.bump()?;
        hospital.approved_claim_amount = add_amount(hospital.approved_claim_amount, amount)?;
        insurance_company.approved_claim_count = insurance_company.approved_claim_count.bump()?;
        insurance_company.approved_claim_amount = add_amount(insurance_company.approved_claim_amount, amount)?;
        processor.approved_claim_count = processor.approved_claim_count.bump()?;
        processor.approved_claim_amount = add_amount(processor.approved_claim_amount, amount)?;
        processor.processed_claim_count = processor.processed_claim_count.bump()?;
        processor.busy_with = None;

        processed.refresh_from(&claim);
        processed.status = ClaimStatus::Approved;
        processed.processed_claim_id = Some(stats.processed_claim_count);
        processed.processed_at = Some(now);

        patient_record.status = ClaimStatus::Approved;
        patient_record.hospital_index = claim.hospital_index;
        patient_record.insurance_company_index = claim.insurance_company_index;
        patient_record.invoice_number = claim.invoice_number.clone();
        patient_record.amount = amount;
        patient_record.ailment = claim.ailment.clone();
        patient_record.note = claim.note.clone();
        patient_record.processed_at = Some(now);

        info!(
            claim_id = claim.id,
            submitter = %claim_owner,
            processor = %caller,
            sequence,
            amount,
            "claim approved"
        );

        self.state.claims.remove(&claim_address(claim_owner));
        self.state.patient_records.insert(
            patient_record_address(claim_owner, claim.patient_index, claim.patient_record_index),
            patient_record,
        );
        self.state
            .processed_claims
            .insert(processed_claim_address(caller, sequence), processed);
        self.state.hospitals.insert(
            hospital_address(claim.country_index, claim.state_index, hospital_index),
            hospital,
        );
        self.state.insurance_companies.insert(
            insurance_company_address(insurance_company_index),
            insurance_company,
        );
        self.state
            .patients
            .insert(patient_address(claim_owner, claim.patient_index), patient);
        self.state
            .submitters
            .insert(submitter_address(claim_owner), submitter);
        self.state
            .processors
            .insert(processor_address(caller), processor);
        self.state.queue = Some(queue);
        self.state.stats = Some(stats);
        Ok(())
    }

    /// Create the patient record and deny in one step, for claims whose
    /// hospital and insurance references never resolved.
    pub fn create_patient_record_and_deny_claim(
        &mut self,
        caller: &AccountId,
        claim_owner: &AccountId,
        denial_reason: String,
    ) -> ClaimsResult<()> {
        validate::reason("denial reason", &denial_reason)?;
        let mut processor = self.require_active_processor(caller)?;
        let mut claim = self.snapshot_assigned_claim(caller, claim_owner)?;
        if claim.is_patient_record_created {
            return Err(ClaimsError::InvalidState(
                "patient record already created; deny the claim with its records".to_string(),
            ));
        }

        let mut stats = self.snapshot_stats()?;
        let mut queue = self.snapshot_queue()?;
        let mut submitter = self.snapshot_submitter(claim_owner)?;
        let mut patient = self.snapshot_patient(claim_owner, claim.patient_index)?;
        let sequence = processor.processed_claim_count;
        let mut processed = self.snapshot_processed_claim(caller, sequence)?;
        let now = Utc::now();

        let record_index = patient.record_count;
        claim.is_patient_record_created = true;
        claim.patient_record_index = record_index;

        stats.record_denial()?;
        queue.current_queue_count = queue.current_queue_count.shrink()?;
        submitter.denied_claim_count = submitter.denied_claim_count.bump()?;
        patient.denied_claim_count = patient.denied_claim_count.bump()?;
        patient.record_count = patient.record_count.bump()?;
        processor.denied_claim_count = processor.denied_claim_count.bump()?;
        processor.created_patient_record_count = processor.created_patient_record_count.bump()?;
        processor.processed_claim_count = processor.processed_claim_count.bump()?;
        processor.busy_with = None;

        processed.refresh_from(&claim);
        processed.status = ClaimStatus::Denied;
        processed.denial_reasons.push(denial_reason.clone());
        processed.processed_claim_id = Some(stats.processed_claim_count);
        processed.processed_at = Some(now);

        let patient_record = PatientRecord {
            record_id: patient.record_count,
            claim_id: claim.id,
            status: ClaimStatus::Denied,
            patient_record_only: true,
            denial_reason: Some(denial_reason.clone()),
            appeal_reason: None,
            submitter: claim.submitter.clone(),
            patient_index: claim.patient_index,
            processor: caller.clone(),
            sequence,
            country_index: claim.country_index,
            state_index: claim.state_index,
            hospital_index: claim.hospital_index,
            insurance_company_index: claim.insurance_company_index,
            invoice_number: claim.invoice_number.clone(),
            amount: claim.amount,
            ailment: claim.ailment.clone(),
            note: claim.note.clone(),
            submitted_at: claim.submitted_at,
            processed_at: Some(now),
        };

        info!(
            claim_id = claim.id,
            submitter = %claim_owner,
            processor = %caller,
            sequence,
            reason = %denial_reason,
            "patient record created and claim denied"
        );

        self.state.claims.remove(&claim_address(claim_owner));
        self.state.patient_records.insert(
            patient_record_address(claim_owner, claim.patient_index, record_index),
            patient_record,
        );
        self.state
            .processed_claims
            .insert(processed_claim_address(caller, sequence), processed);
        self.state
            .patients
            .insert(patient_address(claim_owner, claim.patient_index), patient);
        self.state
            .submitters
            .insert(submitter_address(claim_owner), submitter);
        self.state
            .processors
            .insert(processor_address(caller), processor);
        self.state.queue = Some(queue);
        self.state.stats = Some(stats);
        Ok(())
    }

    /// Deny an assigned claim whose full record set exists.
    pub fn deny_claim_with_all_records(
        &mut self,
        caller: &AccountId,
        claim_owner: &AccountId,
        denial_reason: String,
    ) -> ClaimsResult<()> {
        validate::reason("denial reason", &denial_reason)?;
        let mut processor = self.require_active_processor(caller)?;
        let claim = self.snapshot_assigned_claim(caller, claim_owner)?;
        if !claim.has_all_records() {
            return Err(ClaimsError::InvalidState(
                "patient, hospital, and insurance company records must exist for this denial"
                    .to_string(),
            ));
        }
        let hospital_index = u32::try_from(claim.hospital_index)
            .map_err(|_| ClaimsError::InvalidState("claim hospital index is unresolved".to_string()))?;
        let insurance_company_index = u16::try_from(claim.insurance_company_index).map_err(|_| {
            ClaimsError::InvalidState("claim insurance company index is unresolved".to_string())
        })?;

        let mut stats = self.snapshot_stats()?;
        let mut queue = self.snapshot_queue()?;
        let mut submitter = self.snapshot_submitter(claim_owner)?;
        let mut patient = self.snapshot_patient(claim_owner, claim.patient_index)?;
        let mut hospital =
            self.snapshot_hospital(claim.country_index, claim.state_index, hospital_index)?;
        let mut insurance_company = self.snapshot_insurance_company(insurance_company_index)?;
        let mut patient_record = self.snapshot_patient_record(
            claim_owner,
            claim.patient_index,
            claim.patient_record_index,
        )?;
        let sequence = processor.processed_claim_count;
        let mut processed = self.snapshot_processed_claim(caller, sequence)?;
        let now = Utc::now();

        stats.record_denial()?;
        queue.current_queue_count = queue.current_queue_count.shrink()?;
        submitter.denied_claim_count = submitter.denied_claim_count.bump()?;
        patient.denied_claim_count = patient.denied_claim_count.bump()?;
        hospital.denied_claim_count = hospital.denied_claim_count.bump()?;
        insurance_company.denied_claim_count = insurance_company.denied_claim_count.bump()?;
        processor.denied_claim_count = processor.denied_claim_count.bump()?;
        processor.processed_claim_count = processor.processed_claim_count.bump()?;
        processor.busy_with = None;

        processed.refresh_from(&claim);
        processed.status = ClaimStatus::Denied;
        processed.denial_reasons.push(denial_reason.clone());
        processed.processed_claim_id = Some(stats.processed_claim_count);
        processed.processed_at = Some(now);

        patient_record.status = ClaimStatus::Denied;
        patient_record.denial_reason = Some(denial_reason.clone());
        patient_record.processed_at = Some(now);

        info!(
            claim_id = claim.id,
            submitter = %claim_owner,
            processor = %caller,
            sequence,
            reason = %denial_reason,
            "claim denied"
        );

        self.state.claims.remove(&claim_address(claim_owner));
        self.state.patient_records.insert(
            patient_record_address(claim_owner, claim.patient_index, claim.patient_record_index),
            patient_record,
        );
        self.state
            .processed_claims
            .insert(processed_claim_address(caller, sequence), processed);
        self.state.hospitals.insert(
            hospital_address(claim.country_index, claim.state_index, hospital_index),
            hospital,
        );
        self.state.insurance_companies.insert(
            insurance_company_address(insurance_company_index),
            insurance_company,
        );
        self.state
            .patients
            .insert(patient_address(claim_owner, claim.patient_index), patient);
        self.state
            .submitters
            .insert(submitter_address(claim_owner), submitter);
        self.state
            .processors
            .insert(processor_address(caller), processor);
        self.state.queue = Some(queue);
        self.state.stats = Some(stats);
        Ok(())
    }

    /// Administrative fast-path denial of a still-queued claim.
    pub fn max_deny_pending_claim(
        &mut self,
        caller: &AccountId,
        claim_owner: &AccountId,
    ) -> ClaimsResult<()> {
        self.require_max_deny_authority(caller)?;
        let claim = self
            .claim(claim_owner)
            .cloned()
            .ok_or_else(|| ClaimsError::NotFound(format!("no claim for submitter {claim_owner}")))?;
        if claim.status != ClaimStatus::Queued {
            return Err(ClaimsError::InvalidState(
                "claim must be queued for a pending max-deny".to_string(),
            ));
        }

        let mut stats = self.snapshot_stats()?;
        let mut queue = self.snapshot_queue()?;
        let mut submitter = self.snapshot_submitter(claim_owner)?;
        let mut patient = self.snapshot_patient(claim_owner, claim.patient_index)?;
        let acting_processor = match self.processor(caller) {
            Some(processor) => {
                let mut processor = processor.clone();
                processor.max_denied_claim_count = processor.max_denied_claim_count.bump()?;
                Some(processor)
            }
            None => None,
        };

        stats.record_max_denial()?;
        queue.current_queue_count = queue.current_queue_count.shrink()?;
        queue.max_denied_claim_count = queue.max_denied_claim_count.bump()?;
        submitter.max_denied_claim_count = submitter.max_denied_claim_count.bump()?;
        patient.max_denied_claim_count = patient.max_denied_claim_count.bump()?;

        info!(
            claim_id = claim.id,
            submitter = %claim_owner,
            caller = %caller,
            "pending claim max-denied"
        );

        self.state.claims.remove(&claim_address(claim_owner));
        if let Some(processor) = acting_processor {
            let address = processor_address(&processor.identity);
            self.state.processors.insert(address, processor);
        }
        self.state
            .patients
            .insert(patient_address(claim_owner, claim.patient_index), patient);
        self.state
            .submitters
            .insert(submitter_address(claim_owner), submitter);
        self.state.queue = Some(queue);
        self.state.stats = Some(stats);
        Ok(())
    }

    /// Administrative fast-path denial of an assigned claim. Blocked once
    /// any record exists; those claims go through regular adjudication.
    pub fn max_deny_in_progress_claim(
        &mut self,
        caller: &AccountId,
        claim_owner: &AccountId,
    ) -> ClaimsResult<()> {
        self.require_max_deny_authority(caller)?;
        let claim = self
            .claim(claim_owner)
            .cloned()
            .ok_or_else(|| ClaimsError::NotFound(format!("no claim for submitter {claim_owner}")))?;
        if claim.status != ClaimStatus::Assigned {
            return Err(ClaimsError::InvalidState(
                "claim must be assigned for an in-progress max-deny".to_string(),
            ));
        }
        if !claim.has_no_records() {
            return Err(ClaimsError::InvalidState(
                "records already exist for the claim; deny it through adjudication".to_string(),
            ));
        }
        let owning_identity = claim.processor.clone().ok_or_else(|| {
            ClaimsError::InvalidState("assigned claim has no processor".to_string())
        })?;

        let mut stats = self.snapshot_stats()?;
        let mut queue = self.snapshot_queue()?;
        let mut submitter = self.snapshot_submitter(claim_owner)?;
        let mut patient = self.snapshot_patient(claim_owner, claim.patient_index)?;
        let mut owning_processor = self.snapshot_processor(&owning_identity)?;
        let sequence = owning_processor.processed_claim_count;
        let mut processed = self.snapshot_processed_claim(&owning_identity, sequence)?;
        let now = Utc::now();

        stats.record_max_denial()?;
        queue.current_queue_count = queue.current_queue_count.shrink()?;
        queue.max_denied_claim_count = queue.max_denied_claim_count.bump()?;
        submitter.max_denied_claim_count = submitter.max_denied_claim_count.bump()?;
        patient.max_denied_claim_count = patient.max_denied_claim_count.bump()?;
        owning_processor.max_denied_claim_count = owning_processor.max_denied_claim_count.bump()?;
        owning_processor.processed_claim_count = owning_processor.processed_claim_count.bump()?;
        owning_processor.busy_with = None;

        processed.refresh_from(&claim);
        processed.status = ClaimStatus::MaxDenied;
        processed.processed_claim_id = Some(stats.processed_claim_count);
        processed.processed_at = Some(now);

        info!(
            claim_id = claim.id,
            submitter = %claim_owner,
            processor = %owning_identity,
            caller = %caller,
            "in-progress claim max-denied"
        );

        self.state.claims.remove(&claim_address(claim_owner));
        self.state
            .processed_claims
            .insert(processed_claim_address(&owning_identity, sequence), processed);
        self.state
            .processors
            .insert(processor_address(&owning_identity), owning_processor);
        self.state
            .patients
            .insert(patient_address(claim_owner, claim.patient_index), patient);
        self.state
            .submitters
            .insert(submitter_address(claim_owner), submitter);
        self.state.queue = Some(queue);
        self.state.stats = Some(stats);
        Ok(())
    }
}
