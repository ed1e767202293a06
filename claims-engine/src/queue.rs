//! Claim submission and processor assignment

use chrono::Utc;
use tracing::info;

use claims_core::counter::Counter;
use claims_core::directory::{
    claim_address, fee_token_address, patient_address, processed_claim_address, processor_address,
    submitter_address,
};
use claims_core::types::{AccountId, Claim, ClaimStatus, ClaimSubmission, ProcessedClaim};
use claims_core::{ClaimsError, ClaimsResult};

use crate::engine::ClaimsLedger;
use crate::validate;

impl ClaimsLedger {
    /// Queue a claim against escrowed payment.
    ///
    /// The payment mint must be in the fee registry; actual escrow and fee
    /// transfer happen in the external token service. Returns the claim id.
    pub fn submit_claim(
        &mut self,
        caller: &AccountId,
        submission: ClaimSubmission,
    ) -> ClaimsResult<u64> {
        let mut queue = self.snapshot_queue()?;
        if !queue.enabled {
            return Err(ClaimsError::QueueDisabled);
        }
        if !queue.has_capacity() {
            return Err(ClaimsError::QueueFull);
        }
        if !self
            .state
            .fee_tokens
            .contains_key(&fee_token_address(&submission.payment_mint))
        {
            return Err(ClaimsError::UnknownPaymentToken(
                submission.payment_mint.to_string(),
            ));
        }
        validate::submission(&submission)?;

        let mut submitter = self.snapshot_submitter(caller)?;
        let mut patient = self.snapshot_patient(caller, submission.patient_index)?;

        let address = claim_address(caller);
        if self.state.claims.contains_key(&address) {
            return Err(ClaimsError::AlreadyExists(format!(
                "submitter {caller} already has a claim in flight"
            )));
        }

        queue.submitted_claim_count = queue.submitted_claim_count.bump()?;
        queue.current_queue_count = queue.current_queue_count.bump()?;
        submitter.submitted_claim_count = submitter.submitted_claim_count.bump()?;
        patient.submitted_claim_count = patient.submitted_claim_count.bump()?;

        let claim_id = queue.submitted_claim_count;
        let claim = Claim::from_submission(claim_id, caller.clone(), submission, Utc::now());

        info!(
            claim_id,
            submitter = %caller,
            patient_index = claim.patient_index,
            amount = claim.amount,
            "claim submitted to queue"
        );

        self.state.claims.insert(address, claim);
        self.state
            .patients
            .insert(patient_address(caller, patient.patient_index), patient);
        self.state
            .submitters
            .insert(submitter_address(caller), submitter);
        self.state.queue = Some(queue);
        Ok(claim_id)
    }

    /// Take ownership of a queued claim.
    ///
    /// Single-winner: the first processor to assign flips the claim out of
    /// `Queued`, and every later attempt fails with no side effects. Opens
    /// the working record at the processor's current sequence and returns
    /// that sequence.
    pub fn assign_claim(&mut self, caller: &AccountId, claim_owner: &AccountId) -> ClaimsResult<u64> {
        let mut processor = self.require_active_processor(caller)?;
        if processor.busy_with.is_some() {
            return Err(ClaimsError::InvalidState(
                "processor is already working a claim".to_string(),
            ));
        }

        let address = claim_address(claim_owner);
        let mut claim = self
            .state
            .claims
            .get(&address)
            .cloned()
            .ok_or_else(|| ClaimsError::NotFound(format!("no claim for submitter {claim_owner}")))?;
        if claim.status != ClaimStatus::Queued {
            return Err(ClaimsError::InvalidState(
                "claim already has a processor".to_string(),
            ));
        }

        let sequence = processor.processed_claim_count;
        claim.status = ClaimStatus::Assigned;
        claim.processor = Some(caller.clone());
        processor.busy_with = Some(claim_owner.clone());

        let processed = ProcessedClaim::from_assignment(&claim, caller.clone(), sequence);

        info!(
            claim_id = claim.id,
            submitter = %claim_owner,
            processor = %caller,
            sequence,
            "claim assigned to processor"
        );

        self.state
            .processed_claims
            .insert(processed_claim_address(caller, sequence), processed);
        self.state.claims.insert(address, claim);
        self.state
            .processors
            .insert(processor_address(caller), processor);
        Ok(sequence)
    }
}
