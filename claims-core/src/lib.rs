//! Claims Core - shared types for the claims adjudication ledger
//!
//! This crate provides the data model and interfaces for a ledger-backed
//! medical-reimbursement claim workflow:
//! - Deterministic entity addressing (every record reachable from its key tuple)
//! - The claim lifecycle status set and entity records
//! - Governance records (CEO, processor registry, fee-token registry)
//! - Protocol-wide aggregate statistics with checked counter arithmetic
//!
//! The engine that drives these types lives in `claims-engine`. Payment
//! escrow, transport, and signing are external concerns; this crate only
//! models what the ledger itself persists.

pub mod constants;
pub mod counter;
pub mod directory;
pub mod error;
pub mod logging;
pub mod types;

pub use constants::*;
pub use counter::Counter;
pub use directory::EntityAddress;
pub use error::{ClaimsError, ClaimsResult};
pub use types::*;
