//! Protocol-wide aggregate statistics

use serde::{Deserialize, Serialize};

use crate::counter::{add_amount, sub_amount, Counter};
use crate::error::ClaimsResult;

/// Aggregate outcome counters for the whole protocol.
///
/// Outcome counters are monotonically non-decreasing: every first-finalize
/// edge bumps `processed_claim_count` exactly once, every outcome edge bumps
/// its own counter exactly once, and nothing ever decrements. Later
/// reversals (undeny, revoke) get their own counters instead of rewriting
/// history, so `approved + denied + max_denied <= processed` holds at every
/// observable point. `approved_claim_amount` is a value total, not a
/// counter; it tracks currently-approved value and shrinks on revocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtocolStats {
    pub processed_claim_count: u64,
    pub approved_claim_count: u64,
    pub approved_claim_amount: u64,
    pub denied_claim_count: u64,
    pub max_denied_claim_count: u64,
    pub undenied_claim_count: u64,
    pub submitted_appeal_count: u64,
    pub denied_appeal_count: u64,
    pub revoked_approval_count: u64,
    pub denial_hammer_dropped_count: u64,
}

impl ProtocolStats {
    /// Record a first-finalize approval.
    pub fn record_approval(&mut self, amount: u64) -> ClaimsResult<()> {
        let processed = self.processed_claim_count.bump()?;
        let approved = self.approved_claim_count.bump()?;
        let total = add_amount(self.approved_claim_amount, amount)?;
        self.processed_claim_count = processed;
        self.approved_claim_count = approved;
        self.approved_claim_amount = total;
        Ok(())
    }

    /// Record a first-finalize denial.
    pub fn record_denial(&mut self) -> ClaimsResult<()> {
        let processed = self.processed_claim_count.bump()?;
        let denied = self.denied_claim_count.bump()?;
        self.processed_claim_count = processed;
        self.denied_claim_count = denied;
        Ok(())
    }

    /// Record an administrative max-denial (pending or in progress).
    pub fn record_max_denial(&mut self) -> ClaimsResult<()> {
        let processed = self.processed_claim_count.bump()?;
        let max_denied = self.max_denied_claim_count.bump()?;
        self.processed_claim_count = processed;
        self.max_denied_claim_count = max_denied;
        Ok(())
    }

    /// Record a submitter appeal against a denial.
    pub fn record_appeal(&mut self) -> ClaimsResult<()> {
        self.submitted_appeal_count = self.submitted_appeal_count.bump()?;
        Ok(())
    }

    /// Record an appealed claim being undenied.
    pub fn record_undenial(&mut self, amount: u64) -> ClaimsResult<()> {
        let undenied = self.undenied_claim_count.bump()?;
        let total = add_amount(self.approved_claim_amount, amount)?;
        self.undenied_claim_count = undenied;
        self.approved_claim_amount = total;
        Ok(())
    }

    /// Record an appeal being denied for good.
    pub fn record_appeal_denial(&mut self) -> ClaimsResult<()> {
        self.denied_appeal_count = self.denied_appeal_count.bump()?;
        Ok(())
    }

    /// Record an approval being revoked.
    pub fn record_revocation(&mut self, amount: u64) -> ClaimsResult<()> {
        let revoked = self.revoked_approval_count.bump()?;
        let total = sub_amount(self.approved_claim_amount, amount)?;
        self.revoked_approval_count = revoked;
        self.approved_claim_amount = total;
        Ok(())
    }

    /// Record one denial-hammer drop.
    pub fn record_hammer_drop(&mut self) -> ClaimsResult<()> {
        self.denial_hammer_dropped_count = self.denial_hammer_dropped_count.bump()?;
        Ok(())
    }

    /// Outcome counters never exceed the number of first finalizes.
    pub fn outcomes_are_consistent(&self) -> bool {
        self.approved_claim_count + self.denied_claim_count + self.max_denied_claim_count
            <= self.processed_claim_count
    }
}
