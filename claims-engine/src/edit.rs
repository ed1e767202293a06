//! Post-finalize corrections to processed claims and their records
//!
//! Edits never change a processed claim's status or any outcome counter.
//! When the target is currently approved, the value totals move with the
//! corrected amount so the books keep tracking approved value.

use chrono::Utc;
use tracing::info;

use claims_core::counter::{add_amount, sub_amount};
use claims_core::directory::{
    patient_address, patient_record_address, processed_claim_address, processor_address,
    submitter_address,
};
use claims_core::types::{AccountId, ClaimStatus, ProcessedClaimEdits, RecordEdits};
use claims_core::{ClaimsError, ClaimsResult};

use crate::engine::ClaimsLedger;
use crate::validate;

impl ClaimsLedger {
    /// Correct a finalized processed claim and its patient record, including
    /// re-attribution to different hospital and insurance masters. The
    /// target masters must exist; their display fields are copied onto the
    /// processed claim.
    pub fn edit_processed_claim_and_patient_record(
        &mut self,
        caller: &AccountId,
        processor: &AccountId,
        sequence: u64,
        edits: ProcessedClaimEdits,
    ) -> ClaimsResult<()> {
        self.require_super_admin_or_ceo(caller)?;
        validate::processed_claim_edits(&edits)?;
        let mut processed = self.snapshot_processed_claim(processor, sequence)?;
        if !processed.status.is_finalized() {
            return Err(ClaimsError::InvalidState(
                "processed claim has not been finalized".to_string(),
            ));
        }
        let hospital = self.snapshot_hospital(
            processed.country_index,
            processed.state_index,
            edits.hospital_index,
        )?;
        let insurance_company = self.snapshot_insurance_company(edits.insurance_company_index)?;
        let mut patient_record = self.snapshot_patient_record(
            &processed.submitter,
            processed.patient_index,
            processed.patient_record_index,
        )?;
        let now = Utc::now();

        processed.hospital_index = i32::try_from(edits.hospital_index).map_err(|_| {
            ClaimsError::Validation(format!("hospital index {} out of range", edits.hospital_index))
        })?;
        processed.insurance_company_index = i16::try_from(edits.insurance_company_index)
            .map_err(|_| {
                ClaimsError::Validation(format!(
                    "insurance company index {} out of range",
                    edits.insurance_company_index
                ))
            })?;
        processed.invoice_number = edits.invoice_number.clone();
        processed.note = edits.note.clone();
        processed.amount = edits.amount;
        processed.ailment = edits.ailment.clone();
        processed.hospital_type = hospital.hospital_type;
        processed.hospital_name = hospital.name.clone();
        processed.hospital_address = hospital.address.clone();
        processed.hospital_city = hospital.city.clone();
        processed.hospital_zip_code = hospital.zip_code;
        processed.hospital_phone_number = hospital.phone_number;
        processed.insurance_company_name = insurance_company.name.clone();
        processed.processed_at = Some(now);

        patient_record.hospital_index = processed.hospital_index;
        patient_record.insurance_company_index = processed.insurance_company_index;
        patient_record.invoice_number = edits.invoice_number;
        patient_record.amount = edits.amount;
        patient_record.ailment = edits.ailment;
        patient_record.note = edits.note;
        patient_record.processed_at = Some(now);

        info!(
            claim_id = processed.claim_id,
            processor = %processor,
            sequence,
            "processed claim and patient record edited"
        );

        let submitter_identity = processed.submitter.clone();
        self.state.patient_records.insert(
            patient_record_address(
                &submitter_identity,
                processed.patient_index,
                processed.patient_record_index,
            ),
            patient_record,
        );
        self.state
            .processed_claims
            .insert(processed_claim_address(processor, sequence), processed);
        Ok(())
    }

    /// Correct a finalized processed claim and every record derived from it.
    /// Requires the full record set; amounts on the approved-value totals
    /// follow the correction when the claim is currently approved.
    pub fn edit_processed_claim_and_all_records(
        &mut self,
        caller: &AccountId,
        processor: &AccountId,
        sequence: u64,
        edits: RecordEdits,
    ) -> ClaimsResult<()> {
        self.require_super_admin_or_ceo(caller)?;
        validate::record_edits(&edits)?;
        let mut processed = self.snapshot_processed_claim(processor, sequence)?;
        if !processed.status.is_finalized() {
            return Err(ClaimsError::InvalidState(
                "processed claim has not been finalized".to_string(),
            ));
        }
        if !processed.has_all_records() {
            return Err(ClaimsError::InvalidState(
                "processed claim does not have its full record set".to_string(),
            ));
        }
        let (haddr, mut hospital, iaddr, mut insurance_company) =
            self.snapshot_masters_for(&processed)?;
        let mut stats = self.snapshot_stats()?;
        let mut submitter = self.snapshot_submitter(&processed.submitter)?;
        let mut patient = self.snapshot_patient(&processed.submitter, processed.patient_index)?;
        let mut owning_processor = self.snapshot_processor(processor)?;
        let mut patient_record = self.snapshot_patient_record(
            &processed.submitter,
            processed.patient_index,
            processed.patient_record_index,
        )?;
        let now = Utc::now();

        // The counted approval stands; only the value totals move.
        let value_is_on_the_books = matches!(
            processed.status,
            ClaimStatus::Approved | ClaimStatus::Undenied
        );
        if value_is_on_the_books && processed.amount != edits.amount {
            let old = processed.amount;
            let new = edits.amount;
            stats.approved_claim_amount =
                add_amount(sub_amount(stats.approved_claim_amount, old)?, new)?;
            submitter.approved_claim_amount =
                add_amount(sub_amount(submitter.approved_claim_amount, old)?, new)?;
            patient.approved_claim_amount =
                add_amount(sub_amount(patient.approved_claim_amount, old)?, new)?;
            owning_processor.approved_claim_amount =
                add_amount(sub_amount(owning_processor.approved_claim_amount, old)?, new)?;
            hospital.approved_claim_amount =
                add_amount(sub_amount(hospital.approved_claim_amount, old)?, new)?;
            insurance_company.approved_claim_amount =
                add_amount(sub_amount(insurance_company.approved_claim_amount, old)?, new)?;
        }

        processed.invoice_number = edits.invoice_number.clone();
        processed.note = edits.note.clone();
        processed.amount = edits.amount;
        processed.ailment = edits.ailment.clone();
        processed.processed_at = Some(now);

        patient_record.invoice_number = edits.invoice_number;
        patient_record.amount = edits.amount;
        patient_record.ailment = edits.ailment;
        patient_record.note = edits.note;
        patient_record.processed_at = Some(now);

        info!(
            claim_id = processed.claim_id,
            processor = %processor,
            sequence,
            "processed claim and all records edited"
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
}
