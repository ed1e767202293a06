//! Engine configuration

use claims_core::{DEFAULT_QUEUE_SIZE_LIMIT, DENIAL_HAMMER_BATCH_LIMIT};

/// Tunables fixed at engine construction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Queue capacity used when the claim queue is initialized.
    pub queue_size_limit: u32,
    /// Upper bound on a single denial-hammer batch.
    pub denial_hammer_batch_limit: usize,
    /// Whether max-deny requires a super-admin (or the CEO). When false any
    /// active processor may max-deny; the reference material does not pin
    /// this down, so it stays configurable with the conservative default.
    pub max_deny_requires_super_admin: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            queue_size_limit: DEFAULT_QUEUE_SIZE_LIMIT,
            denial_hammer_batch_limit: DENIAL_HAMMER_BATCH_LIMIT,
            max_deny_requires_super_admin: true,
        }
    }
}
