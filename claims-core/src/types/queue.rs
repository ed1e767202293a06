//! Claim queue singleton

use serde::{Deserialize, Serialize};

/// Claim queue state
///
/// `submitted_claim_count` only ever grows and doubles as the claim id mint;
/// `current_queue_count` tracks claims that are queued or assigned but not
/// yet finalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimQueue {
    pub enabled: bool,
    pub queue_size_limit: u32,
    pub current_queue_count: u32,
    pub submitted_claim_count: u64,
    pub max_denied_claim_count: u64,
}

impl ClaimQueue {
    /// Create an enabled queue with the given capacity.
    pub fn new(queue_size_limit: u32) -> Self {
        Self {
            enabled: true,
            queue_size_limit,
            current_queue_count: 0,
            submitted_claim_count: 0,
            max_denied_claim_count: 0,
        }
    }

    /// Whether another submission fits under the size limit.
    pub fn has_capacity(&self) -> bool {
        self.current_queue_count < self.queue_size_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_check() {
        let mut queue = ClaimQueue::new(2);
        assert!(queue.has_capacity());
        queue.current_queue_count = 2;
        assert!(!queue.has_capacity());
    }
}
