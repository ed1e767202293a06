//! Submitter and patient registry operations

use tracing::info;

use claims_core::counter::Counter;
use claims_core::directory::{patient_address, submitter_address};
use claims_core::types::{AccountId, PatientAccount, SubmitterAccount};
use claims_core::{ClaimsError, ClaimsResult};

use crate::engine::ClaimsLedger;
use crate::validate;

impl ClaimsLedger {
    /// Create the caller's submitter account. One per identity, ever.
    pub fn create_submitter(&mut self, caller: &AccountId) -> ClaimsResult<()> {
        let address = submitter_address(caller);
        if self.state.submitters.contains_key(&address) {
            return Err(ClaimsError::AlreadyExists(format!(
                "submitter account for {caller}"
            )));
        }
        let total = self.state.submitter_total.bump()?;
        self.state.submitter_total = total;
        self.state
            .submitters
            .insert(address, SubmitterAccount::new(total, caller.clone()));
        info!(submitter = %caller, id = total, "submitter account created");
        Ok(())
    }

    /// Create the caller's next patient sub-record.
    ///
    /// The caller supplies the index it derived the patient address from;
    /// it must equal the submitter's patient count so addresses line up.
    pub fn create_patient(
        &mut self,
        caller: &AccountId,
        patient_index: u8,
        first_name: String,
        last_name: String,
    ) -> ClaimsResult<()> {
        validate::patient_name(&first_name, &last_name)?;
        let mut submitter = self.snapshot_submitter(caller)?;
        if patient_index != submitter.patient_count {
            return Err(ClaimsError::Validation(format!(
                "patient index {patient_index} is out of sequence; next index is {}",
                submitter.patient_count
            )));
        }

        let total = self.state.patient_total.bump()?;
        submitter.patient_count = submitter.patient_count.bump()?;
        submitter.active_patient_count = submitter.active_patient_count.bump()?;

        let patient = PatientAccount::new(
            total,
            caller.clone(),
            patient_index,
            first_name,
            last_name,
        );

        self.state.patient_total = total;
        self.state
            .patients
            .insert(patient_address(caller, patient_index), patient);
        self.state
            .submitters
            .insert(submitter_address(caller), submitter);
        info!(submitter = %caller, patient_index, "patient account created");
        Ok(())
    }

    /// Toggle a patient's active flag. Writing the current value is rejected
    /// so the submitter's active count stays honest.
    pub fn set_patient_active(
        &mut self,
        caller: &AccountId,
        patient_index: u8,
        is_active: bool,
    ) -> ClaimsResult<()> {
        let mut submitter = self.snapshot_submitter(caller)?;
        let mut patient = self.snapshot_patient(caller, patient_index)?;
        if patient.is_active == is_active {
            return Err(ClaimsError::InvalidState(format!(
                "patient active flag is already {is_active}"
            )));
        }
        patient.is_active = is_active;
        if is_active {
            submitter.active_patient_count = submitter.active_patient_count.bump()?;
        } else {
            submitter.active_patient_count = submitter.active_patient_count.shrink()?;
        }
        self.state
            .patients
            .insert(patient_address(caller, patient_index), patient);
        self.state
            .submitters
            .insert(submitter_address(caller), submitter);
        info!(submitter = %caller, patient_index, is_active, "patient flag set");
        Ok(())
    }
}
