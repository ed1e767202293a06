//! Governance operations: CEO, fee tokens, queue gating, processor registry

use tracing::info;

use claims_core::counter::Counter;
use claims_core::directory::{fee_token_address, processor_address};
use claims_core::types::{AccountId, CeoAccount, ClaimQueue, FeeTokenEntry, MintId, ProcessorAccount, ProtocolStats};
use claims_core::{ClaimsError, ClaimsResult};

use crate::engine::ClaimsLedger;

impl ClaimsLedger {
    /// One-time creation of the CEO singleton; the caller becomes the owner.
    pub fn initialize_admin(&mut self, caller: &AccountId) -> ClaimsResult<()> {
        if self.state.ceo.is_some() {
            return Err(ClaimsError::AlreadyInitialized(
                "ceo account already exists".to_string(),
            ));
        }
        self.state.ceo = Some(CeoAccount {
            owner: caller.clone(),
        });
        info!(ceo = %caller, "protocol admin initialized");
        Ok(())
    }

    /// One-time creation of the protocol statistics singleton.
    pub fn initialize_stats(&mut self, caller: &AccountId) -> ClaimsResult<()> {
        self.require_ceo(caller)?;
        if self.state.stats.is_some() {
            return Err(ClaimsError::AlreadyInitialized(
                "protocol stats already exist".to_string(),
            ));
        }
        self.state.stats = Some(ProtocolStats::default());
        info!("protocol stats initialized");
        Ok(())
    }

    /// One-time creation of the claim queue, enabled and at the configured
    /// capacity. Stats must exist first so finalizes never race a missing
    /// counter set.
    pub fn initialize_queue(&mut self, caller: &AccountId) -> ClaimsResult<()> {
        if self.state.stats.is_none() {
            return Err(ClaimsError::NotFound(
                "protocol stats must be initialized before the claim queue".to_string(),
            ));
        }
        if self.state.queue.is_some() {
            return Err(ClaimsError::AlreadyInitialized(
                "claim queue already exists".to_string(),
            ));
        }
        self.state.queue = Some(ClaimQueue::new(self.config.queue_size_limit));
        info!(initiator = %caller, "claim queue initialized");
        Ok(())
    }

    /// Replace the CEO. Only the current owner can pass on the title.
    pub fn pass_on_ceo(&mut self, caller: &AccountId, new_owner: AccountId) -> ClaimsResult<()> {
        self.require_ceo(caller)?;
        info!(old = %caller, new = %new_owner, "ceo title passed on");
        self.state.ceo = Some(CeoAccount { owner: new_owner });
        Ok(())
    }

    /// Register a payment-token mint for submission fees.
    pub fn add_fee_token(
        &mut self,
        caller: &AccountId,
        mint: MintId,
        decimals: u8,
    ) -> ClaimsResult<()> {
        self.require_ceo(caller)?;
        let address = fee_token_address(&mint);
        if self.state.fee_tokens.contains_key(&address) {
            return Err(ClaimsError::AlreadyExists(format!(
                "fee token entry for mint {mint}"
            )));
        }
        info!(mint = %mint, decimals, "fee token added");
        self.state
            .fee_tokens
            .insert(address, FeeTokenEntry { mint, decimals });
        Ok(())
    }

    /// Drop a payment-token mint from the registry. Claims already queued
    /// against the mint are unaffected.
    pub fn remove_fee_token(&mut self, caller: &AccountId, mint: &MintId) -> ClaimsResult<()> {
        self.require_ceo(caller)?;
        let address = fee_token_address(mint);
        if self.state.fee_tokens.remove(&address).is_none() {
            return Err(ClaimsError::NotFound(format!(
                "no fee token entry for mint {mint}"
            )));
        }
        info!(mint = %mint, "fee token removed");
        Ok(())
    }

    /// Gate claim submission. CEO or super-admin.
    pub fn set_queue_enabled(&mut self, caller: &AccountId, enabled: bool) -> ClaimsResult<()> {
        self.require_super_admin_or_ceo(caller)?;
        let mut queue = self.snapshot_queue()?;
        queue.enabled = enabled;
        self.state.queue = Some(queue);
        info!(enabled, "claim queue flag set");
        Ok(())
    }

    /// Resize the queue. A limit below the live count only blocks new
    /// submissions; nothing already queued is evicted.
    pub fn set_queue_size_limit(&mut self, caller: &AccountId, limit: u32) -> ClaimsResult<()> {
        self.require_ceo(caller)?;
        let mut queue = self.snapshot_queue()?;
        queue.queue_size_limit = limit;
        self.state.queue = Some(queue);
        info!(limit, "claim queue size limit set");
        Ok(())
    }

    /// Register a processor, active and without super-admin privilege.
    pub fn create_processor(&mut self, caller: &AccountId, identity: AccountId) -> ClaimsResult<()> {
        self.require_ceo(caller)?;
        let address = processor_address(&identity);
        if self.state.processors.contains_key(&address) {
            return Err(ClaimsError::AlreadyExists(format!(
                "processor account for {identity}"
            )));
        }
        let total = self.state.processor_total.bump()?;
        let processor = ProcessorAccount::new(total, identity.clone());
        self.state.processor_total = total;
        self.state.processors.insert(address, processor);
        info!(processor = %identity, id = total, "processor account created");
        Ok(())
    }

    /// Flip a processor's active flag. Writing the current value is rejected
    /// so derived totals stay honest. Deactivation also strips super-admin.
    pub fn set_processor_active(
        &mut self,
        caller: &AccountId,
        identity: &AccountId,
        is_active: bool,
    ) -> ClaimsResult<()> {
        self.require_ceo(caller)?;
        let mut processor = self.snapshot_processor(identity)?;
        if processor.is_active == is_active {
            return Err(ClaimsError::InvalidState(format!(
                "processor active flag is already {is_active}"
            )));
        }
        processor.is_active = is_active;
        if !is_active {
            processor.is_super_admin = false;
        }
        self.state
            .processors
            .insert(processor_address(identity), processor);
        info!(processor = %identity, is_active, "processor active flag set");
        Ok(())
    }

    /// Flip a processor's super-admin flag. Granting the privilege to an
    /// inactive processor reactivates it.
    pub fn set_processor_admin(
        &mut self,
        caller: &AccountId,
        identity: &AccountId,
        is_super_admin: bool,
    ) -> ClaimsResult<()> {
        self.require_ceo(caller)?;
        let mut processor = self.snapshot_processor(identity)?;
        if processor.is_super_admin == is_super_admin {
            return Err(ClaimsError::InvalidState(format!(
                "processor super-admin flag is already {is_super_admin}"
            )));
        }
        processor.is_super_admin = is_super_admin;
        if is_super_admin {
            processor.is_active = true;
        }
        self.state
            .processors
            .insert(processor_address(identity), processor);
        info!(processor = %identity, is_super_admin, "processor privilege set");
        Ok(())
    }
}
