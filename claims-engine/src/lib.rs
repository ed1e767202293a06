//! Claims Engine - the ledger behind the claims adjudication protocol
//!
//! Holds every protocol entity in maps keyed by derived address and exposes
//! the public operation surface:
//! - Governance: CEO succession, processor registry, fee tokens, queue gating
//! - Submission: submitter/patient registry, claim submission, assignment
//! - Adjudication: record creation, approve/deny, appeals, undenials,
//!   revocations, post-finalize edits
//! - Maintenance: the denial hammer
//!
//! Every operation is a single indivisible transaction against the entities
//! it names: it validates all preconditions, stages its writes on working
//! copies, and only then commits, so an error never leaves partial state
//! behind. Exclusive access (`&mut self`) is the serialization boundary;
//! callers that share the engine across threads put their own lock around
//! it and inherit the same one-winner semantics.

mod access;
mod appeal;
mod config;
mod edit;
mod engine;
mod lifecycle;
mod maintenance;
mod queue;
mod records;
mod registry;
mod state;
mod validate;

pub use config::EngineConfig;
pub use engine::ClaimsLedger;

// Re-export the data model so engine consumers need a single import.
pub use claims_core::{ClaimsError, ClaimsResult};
