//! Fee-token registry entries

use serde::{Deserialize, Serialize};

use super::common::MintId;

/// A payment-token mint accepted for claim submission fees.
///
/// Removing an entry only gates future submissions; claims already queued
/// against the mint are unaffected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeTokenEntry {
    pub mint: MintId,
    pub decimals: u8,
}
