//! Logging conventions for the claims ledger
//!
//! All engine modules emit structured `tracing` events using the field and
//! operation names below, so downstream collectors can filter without
//! parsing message text.
//!
//! # Log levels
//!
//! | Level | Usage | Examples |
//! |-------|-------|----------|
//! | ERROR | Invariant violations | Counter underflow on commit |
//! | WARN  | Rejected privileged attempts | Non-CEO calling a CEO operation |
//! | INFO  | State transitions | Claim assigned, claim approved |
//! | DEBUG | Operation parameters | Submission field values |

/// Standard log field names
pub mod fields {
    /// Claim id
    pub const CLAIM_ID: &str = "claim_id";
    /// Submitter identity
    pub const SUBMITTER: &str = "submitter";
    /// Processor identity
    pub const PROCESSOR: &str = "processor";
    /// Processor-local sequence of a processed claim
    pub const SEQUENCE: &str = "sequence";
    /// Operation name
    pub const OPERATION: &str = "operation";
    /// Claim amount in cents
    pub const AMOUNT: &str = "amount";
    /// Lifecycle status
    pub const STATUS: &str = "status";
    /// Batch size
    pub const COUNT: &str = "count";
}

/// Operation names for consistent event naming
pub mod operations {
    // Governance
    pub const INITIALIZE_ADMIN: &str = "initialize_admin";
    pub const PASS_ON_CEO: &str = "pass_on_ceo";
    pub const SET_QUEUE_ENABLED: &str = "set_queue_enabled";

    // Submission
    pub const SUBMIT_CLAIM: &str = "submit_claim";
    pub const ASSIGN_CLAIM: &str = "assign_claim";

    // Adjudication
    pub const APPROVE: &str = "approve";
    pub const DENY: &str = "deny";
    pub const MAX_DENY: &str = "max_deny";
    pub const APPEAL: &str = "appeal";
    pub const UNDENY: &str = "undeny";
    pub const DENY_APPEAL: &str = "deny_appeal";
    pub const REVOKE_APPROVAL: &str = "revoke_approval";

    // Maintenance
    pub const DENIAL_HAMMER: &str = "denial_hammer";
}
