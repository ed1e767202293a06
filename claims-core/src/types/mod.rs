//! Entity records for the claims ledger
//!
//! One module per subsystem:
//! - `common`: identifiers and shared enums
//! - `queue` / `fee_token`: submission gating
//! - `claim`: queued claims and processed claims
//! - `submitter` / `processor`: participant registries
//! - `hospital` / `insurance`: master records
//! - `patient_record`: per-patient claim history
//! - `stats`: protocol-wide aggregate counters

pub mod claim;
pub mod common;
pub mod fee_token;
pub mod hospital;
pub mod insurance;
pub mod patient_record;
pub mod processor;
pub mod queue;
pub mod stats;
pub mod submitter;

pub use claim::*;
pub use common::*;
pub use fee_token::*;
pub use hospital::*;
pub use insurance::*;
pub use patient_record::*;
pub use processor::*;
pub use queue::*;
pub use stats::*;
pub use submitter::*;
