//! Deterministic entity addressing
//!
//! Every ledger entity lives at a 32-byte address derived from a versioned
//! domain label plus its full key material. Any caller holding the same key
//! tuple derives the same address, so lookups are pure functions of the key
//! and need no directory round-trip.
//!
//! Derivation: SHA-256 over the label followed by each component as a
//! `u64` little-endian length prefix and the raw bytes. Length prefixes keep
//! distinct component tuples distinct even when their concatenations agree.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::types::common::{AccountId, MintId};

/// Domain labels for address derivation.
///
/// Labels are versioned and NUL-terminated so no label is a prefix of
/// another.
pub mod seeds {
    pub const CEO: &[u8] = b"claims:ceo:v1\0";
    pub const PROTOCOL_STATS: &[u8] = b"claims:protocolStats:v1\0";
    pub const CLAIM_QUEUE: &[u8] = b"claims:claimQueue:v1\0";
    pub const FEE_TOKEN: &[u8] = b"claims:feeToken:v1\0";
    pub const PROCESSOR: &[u8] = b"claims:processor:v1\0";
    pub const SUBMITTER: &[u8] = b"claims:submitter:v1\0";
    pub const PATIENT: &[u8] = b"claims:patient:v1\0";
    pub const CLAIM: &[u8] = b"claims:claim:v1\0";
    pub const PROCESSED_CLAIM: &[u8] = b"claims:processedClaim:v1\0";
    pub const HOSPITAL: &[u8] = b"claims:hospital:v1\0";
    pub const INSURANCE_COMPANY: &[u8] = b"claims:insuranceCompany:v1\0";
    pub const PATIENT_RECORD: &[u8] = b"claims:patientRecord:v1\0";
}

/// 32-byte entity address
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityAddress(pub [u8; 32]);

impl EntityAddress {
    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for EntityAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityAddress({})", self.to_hex())
    }
}

impl fmt::Display for EntityAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Incremental address derivation over a domain label and key components.
struct AddressBuilder {
    hasher: Sha256,
}

impl AddressBuilder {
    fn new(label: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(label);
        Self { hasher }
    }

    fn component(mut self, bytes: &[u8]) -> Self {
        self.hasher.update((bytes.len() as u64).to_le_bytes());
        self.hasher.update(bytes);
        self
    }

    fn finish(self) -> EntityAddress {
        EntityAddress(self.hasher.finalize().into())
    }
}

/// Address of the CEO singleton.
pub fn ceo_address() -> EntityAddress {
    AddressBuilder::new(seeds::CEO).finish()
}

/// Address of the protocol statistics singleton.
pub fn protocol_stats_address() -> EntityAddress {
    AddressBuilder::new(seeds::PROTOCOL_STATS).finish()
}

/// Address of the claim queue singleton.
pub fn claim_queue_address() -> EntityAddress {
    AddressBuilder::new(seeds::CLAIM_QUEUE).finish()
}

/// Address of a fee-token registry entry.
pub fn fee_token_address(mint: &MintId) -> EntityAddress {
    AddressBuilder::new(seeds::FEE_TOKEN)
        .component(mint.as_str().as_bytes())
        .finish()
}

/// Address of a processor account.
pub fn processor_address(identity: &AccountId) -> EntityAddress {
    AddressBuilder::new(seeds::PROCESSOR)
        .component(identity.as_str().as_bytes())
        .finish()
}

/// Address of a submitter account.
pub fn submitter_address(identity: &AccountId) -> EntityAddress {
    AddressBuilder::new(seeds::SUBMITTER)
        .component(identity.as_str().as_bytes())
        .finish()
}

/// Address of a patient account under its submitter.
pub fn patient_address(submitter: &AccountId, patient_index: u8) -> EntityAddress {
    AddressBuilder::new(seeds::PATIENT)
        .component(submitter.as_str().as_bytes())
        .component(&patient_index.to_le_bytes())
        .finish()
}

/// Address of a submitter's live claim.
///
/// A submitter has at most one claim in flight, so the submitter identity is
/// the whole key; the slot is reusable once the claim is consumed.
pub fn claim_address(submitter: &AccountId) -> EntityAddress {
    AddressBuilder::new(seeds::CLAIM)
        .component(submitter.as_str().as_bytes())
        .finish()
}

/// Address of a processed claim under its processor's local sequence.
pub fn processed_claim_address(processor: &AccountId, sequence: u64) -> EntityAddress {
    AddressBuilder::new(seeds::PROCESSED_CLAIM)
        .component(processor.as_str().as_bytes())
        .component(&sequence.to_le_bytes())
        .finish()
}

/// Address of a hospital master record.
pub fn hospital_address(country_index: u16, state_index: u32, hospital_index: u32) -> EntityAddress {
    AddressBuilder::new(seeds::HOSPITAL)
        .component(&country_index.to_le_bytes())
        .component(&state_index.to_le_bytes())
        .component(&hospital_index.to_le_bytes())
        .finish()
}

/// Address of an insurance company master record.
pub fn insurance_company_address(insurance_company_index: u16) -> EntityAddress {
    AddressBuilder::new(seeds::INSURANCE_COMPANY)
        .component(&insurance_company_index.to_le_bytes())
        .finish()
}

/// Address of a patient history record.
pub fn patient_record_address(
    submitter: &AccountId,
    patient_index: u8,
    record_index: u32,
) -> EntityAddress {
    AddressBuilder::new(seeds::PATIENT_RECORD)
        .component(submitter.as_str().as_bytes())
        .component(&patient_index.to_le_bytes())
        .component(&record_index.to_le_bytes())
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses_are_reproducible() {
        let submitter = AccountId::new("wallet:alice");
        assert_eq!(submitter_address(&submitter), submitter_address(&submitter));
        assert_eq!(
            patient_address(&submitter, 3),
            patient_address(&submitter, 3)
        );
    }

    #[test]
    fn test_labels_separate_entity_kinds() {
        let id = AccountId::new("wallet:alice");
        assert_ne!(submitter_address(&id), processor_address(&id));
        assert_ne!(submitter_address(&id), claim_address(&id));
    }

    #[test]
    fn test_component_boundaries_do_not_collide() {
        // "ab" + "c" vs "a" + "bc" agree when concatenated; the length
        // prefixes must keep them apart
        let a = AddressBuilder::new(seeds::PATIENT_RECORD)
            .component(b"ab")
            .component(b"c")
            .finish();
        let b = AddressBuilder::new(seeds::PATIENT_RECORD)
            .component(b"a")
            .component(b"bc")
            .finish();
        assert_ne!(a, b);
    }

    #[test]
    fn test_numeric_components_distinguish_addresses() {
        let p = AccountId::new("processor:1");
        assert_ne!(
            processed_claim_address(&p, 0),
            processed_claim_address(&p, 1)
        );
        assert_ne!(hospital_address(1, 2, 3), hospital_address(1, 3, 2));
    }
}
