//! Bulk maintenance: the denial hammer
//!
//! Force-closes a batch of still-queued claims in one atomic unit. The
//! batch is validated in full before anything is removed; one bad element
//! fails the whole call and the caller resubmits a corrected batch built
//! from the live queue.

use std::collections::HashSet;
use tracing::info;

use claims_core::counter::{shrink_by, Counter};
use claims_core::directory::{claim_address, processor_address};
use claims_core::types::{AccountId, ClaimStatus};
use claims_core::{ClaimsError, ClaimsResult};

use crate::engine::ClaimsLedger;

impl ClaimsLedger {
    /// Purge a batch of queued claims, identified by their submitters.
    ///
    /// Returns the number of claims removed. Safe to call repeatedly to
    /// drain a queue larger than one batch.
    pub fn drop_denial_hammer(
        &mut self,
        caller: &AccountId,
        batch: &[AccountId],
    ) -> ClaimsResult<usize> {
        self.require_super_admin_or_ceo(caller)?;
        if batch.len() > self.config.denial_hammer_batch_limit {
            return Err(ClaimsError::Validation(format!(
                "denial hammer batch of {} exceeds the {}-claim limit",
                batch.len(),
                self.config.denial_hammer_batch_limit
            )));
        }
        if batch.is_empty() {
            return Ok(0);
        }

        // Validate the whole batch before touching anything.
        let mut addresses = Vec::with_capacity(batch.len());
        let mut seen = HashSet::new();
        for claim_owner in batch {
            if !seen.insert(claim_owner) {
                return Err(ClaimsError::Validation(format!(
                    "claim owner {claim_owner} appears twice in the batch"
                )));
            }
            let address = claim_address(claim_owner);
            let claim = self.state.claims.get(&address).ok_or_else(|| {
                ClaimsError::NotFound(format!("no claim for submitter {claim_owner}"))
            })?;
            if claim.status != ClaimStatus::Queued {
                return Err(ClaimsError::InvalidState(format!(
                    "claim for submitter {claim_owner} is not queued"
                )));
            }
            addresses.push(address);
        }

        let mut stats = self.snapshot_stats()?;
        let mut queue = self.snapshot_queue()?;
        stats.record_hammer_drop()?;
        queue.current_queue_count = shrink_by(queue.current_queue_count, batch.len() as u32)?;
        let acting_processor = match self.processor(caller) {
            Some(processor) => {
                let mut processor = processor.clone();
                processor.denial_hammer_dropped_count =
                    processor.denial_hammer_dropped_count.bump()?;
                Some(processor)
            }
            None => None,
        };

        for address in &addresses {
            self.state.claims.remove(address);
        }
        if let Some(processor) = acting_processor {
            let address = processor_address(&processor.identity);
            self.state.processors.insert(address, processor);
        }
        self.state.queue = Some(queue);
        self.state.stats = Some(stats);

        info!(
            caller = %caller,
            count = batch.len(),
            "denial hammer dropped"
        );
        Ok(batch.len())
    }
}
