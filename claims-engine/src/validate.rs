//! Field validation
//!
//! Length limits mirror the submission UI; the engine re-checks them so a
//! direct caller cannot oversize a record. Checks run before any state is
//! touched.

use claims_core::types::{ApprovalEdits, ClaimSubmission, ProcessedClaimEdits, RecordEdits};
use claims_core::{
    ClaimsError, ClaimsResult, MAX_AILMENT_LENGTH, MAX_HOSPITAL_ADDRESS_LENGTH,
    MAX_HOSPITAL_CITY_LENGTH, MAX_HOSPITAL_NAME_LENGTH, MAX_INSURANCE_COMPANY_NAME_LENGTH,
    MAX_INVOICE_NUMBER_LENGTH, MAX_NOTE_LENGTH, MAX_PATIENT_FIRST_NAME_LENGTH,
    MAX_PATIENT_LAST_NAME_LENGTH,
};

pub(crate) fn length(field: &str, value: &str, max: usize) -> ClaimsResult<()> {
    if value.len() > max {
        return Err(ClaimsError::Validation(format!(
            "{field} cannot be longer than {max} characters"
        )));
    }
    Ok(())
}

pub(crate) fn patient_name(first_name: &str, last_name: &str) -> ClaimsResult<()> {
    length("patient first name", first_name, MAX_PATIENT_FIRST_NAME_LENGTH)?;
    length("patient last name", last_name, MAX_PATIENT_LAST_NAME_LENGTH)?;
    Ok(())
}

pub(crate) fn reason(field: &str, value: &str) -> ClaimsResult<()> {
    length(field, value, MAX_NOTE_LENGTH)
}

pub(crate) fn submission(submission: &ClaimSubmission) -> ClaimsResult<()> {
    length("hospital name", &submission.hospital_name, MAX_HOSPITAL_NAME_LENGTH)?;
    length(
        "hospital address",
        &submission.hospital_address,
        MAX_HOSPITAL_ADDRESS_LENGTH,
    )?;
    length("hospital city", &submission.hospital_city, MAX_HOSPITAL_CITY_LENGTH)?;
    length(
        "invoice number",
        &submission.invoice_number,
        MAX_INVOICE_NUMBER_LENGTH,
    )?;
    length("ailment", &submission.ailment, MAX_AILMENT_LENGTH)?;
    length("note", &submission.note, MAX_NOTE_LENGTH)?;
    length(
        "insurance company name",
        &submission.insurance_company_name,
        MAX_INSURANCE_COMPANY_NAME_LENGTH,
    )?;
    Ok(())
}

pub(crate) fn approval_edits(edits: &ApprovalEdits) -> ClaimsResult<()> {
    length("hospital name", &edits.hospital_name, MAX_HOSPITAL_NAME_LENGTH)?;
    length(
        "hospital address",
        &edits.hospital_address,
        MAX_HOSPITAL_ADDRESS_LENGTH,
    )?;
    length("hospital city", &edits.hospital_city, MAX_HOSPITAL_CITY_LENGTH)?;
    length("invoice number", &edits.invoice_number, MAX_INVOICE_NUMBER_LENGTH)?;
    length("ailment", &edits.ailment, MAX_AILMENT_LENGTH)?;
    length("note", &edits.note, MAX_NOTE_LENGTH)?;
    length(
        "insurance company name",
        &edits.insurance_company_name,
        MAX_INSURANCE_COMPANY_NAME_LENGTH,
    )?;
    Ok(())
}

pub(crate) fn processed_claim_edits(edits: &ProcessedClaimEdits) -> ClaimsResult<()> {
    length("invoice number", &edits.invoice_number, MAX_INVOICE_NUMBER_LENGTH)?;
    length("ailment", &edits.ailment, MAX_AILMENT_LENGTH)?;
    length("note", &edits.note, MAX_NOTE_LENGTH)?;
    Ok(())
}

pub(crate) fn record_edits(edits: &RecordEdits) -> ClaimsResult<()> {
    length("invoice number", &edits.invoice_number, MAX_INVOICE_NUMBER_LENGTH)?;
    length("ailment", &edits.ailment, MAX_AILMENT_LENGTH)?;
    length("note", &edits.note, MAX_NOTE_LENGTH)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_limit_is_inclusive() {
        let at_limit = "x".repeat(MAX_HOSPITAL_CITY_LENGTH);
        assert!(length("hospital city", &at_limit, MAX_HOSPITAL_CITY_LENGTH).is_ok());

        let over = "x".repeat(MAX_HOSPITAL_CITY_LENGTH + 1);
        let err = length("hospital city", &over, MAX_HOSPITAL_CITY_LENGTH).unwrap_err();
        assert!(matches!(err, ClaimsError::Validation(_)));
    }
}
