//! Protocol constants
//!
//! Field length limits mirror what the submission UI enforces; the engine
//! re-checks them so a direct caller cannot oversize a record.

/// Maximum length for free-text notes, denial reasons, and appeal reasons.
pub const MAX_NOTE_LENGTH: usize = 144;

/// Maximum length for a patient first name.
pub const MAX_PATIENT_FIRST_NAME_LENGTH: usize = 52;

/// Maximum length for a patient last name.
pub const MAX_PATIENT_LAST_NAME_LENGTH: usize = 52;

/// Maximum length for a hospital name.
pub const MAX_HOSPITAL_NAME_LENGTH: usize = 50;

/// Maximum length for a hospital street address.
pub const MAX_HOSPITAL_ADDRESS_LENGTH: usize = 100;

/// Maximum length for a hospital city name.
pub const MAX_HOSPITAL_CITY_LENGTH: usize = 40;

/// Maximum length for a hospital bill invoice number.
pub const MAX_INVOICE_NUMBER_LENGTH: usize = 20;

/// Maximum length for an ailment description.
pub const MAX_AILMENT_LENGTH: usize = 45;

/// Maximum length for an insurance company name.
pub const MAX_INSURANCE_COMPANY_NAME_LENGTH: usize = 35;

/// Claim queue capacity at initialization.
pub const DEFAULT_QUEUE_SIZE_LIMIT: u32 = 100;

/// Upper bound on a single denial-hammer batch.
pub const DENIAL_HAMMER_BATCH_LIMIT: usize = 25;
