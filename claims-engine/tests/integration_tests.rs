//! Integration tests for the claims ledger engine
//!
//! Each test drives the public operation surface end to end: bootstrap the
//! protocol, walk claims through the lifecycle graph, and check the
//! aggregate counters after every edge.

use claims_core::types::{
    AccountId, ApprovalEdits, ClaimStatus, ClaimSubmission, HospitalType, MintId,
    ProcessedClaimEdits, RecordEdits,
};
use claims_engine::{ClaimsError, ClaimsLedger, EngineConfig};

fn ceo() -> AccountId {
    AccountId::new("wallet:ceo")
}

fn usdc() -> MintId {
    MintId::new("mint:usdc")
}

fn submitter(name: &str) -> AccountId {
    AccountId::new(format!("wallet:{name}"))
}

fn processor(index: u32) -> AccountId {
    AccountId::new(format!("processor:{index}"))
}

fn submission() -> ClaimSubmission {
    ClaimSubmission {
        patient_index: 0,
        payment_mint: usdc(),
        country_index: 1,
        state_index: 5,
        hospital_index: 0,
        hospital_type: HospitalType::General,
        hospital_name: "Springfield General".to_string(),
        hospital_address: "742 Evergreen Terrace".to_string(),
        hospital_city: "Springfield".to_string(),
        hospital_zip_code: 49007,
        hospital_phone_number: 5551234567,
        invoice_number: "INV-0001".to_string(),
        note: "first visit".to_string(),
        amount: 125_00,
        ailment: "broken arm".to_string(),
        insurance_company_index: 1,
        insurance_company_name: "Acme Mutual".to_string(),
    }
}

/// Admin, stats, queue, one fee token, one processor.
fn bootstrap() -> ClaimsLedger {
    bootstrap_with(EngineConfig::default())
}

fn bootstrap_with(config: EngineConfig) -> ClaimsLedger {
    let mut ledger = ClaimsLedger::with_config(config);
    ledger.initialize_admin(&ceo()).unwrap();
    ledger.initialize_stats(&ceo()).unwrap();
    ledger.initialize_queue(&ceo()).unwrap();
    ledger.add_fee_token(&ceo(), usdc(), 6).unwrap();
    ledger.create_processor(&ceo(), processor(1)).unwrap();
    ledger
}

/// Register a submitter with one patient and queue a claim.
fn submit_claim_for(ledger: &mut ClaimsLedger, who: &AccountId) -> u64 {
    ledger.create_submitter(who).unwrap();
    ledger
        .create_patient(who, 0, "Jane".to_string(), "Doe".to_string())
        .unwrap();
    ledger.submit_claim(who, submission()).unwrap()
}

/// Walk a submitted claim to approval under processor 1.
fn approve_claim_for(ledger: &mut ClaimsLedger, who: &AccountId) -> u64 {
    let sequence = ledger.assign_claim(&processor(1), who).unwrap();
    ledger.create_patient_record(&processor(1), who).unwrap();
    ledger
        .create_hospital_and_insurance_company_records(&processor(1), who)
        .unwrap();
    ledger.approve_claim(&processor(1), who).unwrap();
    sequence
}

// ============ Initialization ============

#[test]
fn test_initialization_is_one_time() {
    let mut ledger = ClaimsLedger::new();
    ledger.initialize_admin(&ceo()).unwrap();
    assert!(matches!(
        ledger.initialize_admin(&submitter("intruder")),
        Err(ClaimsError::AlreadyInitialized(_))
    ));

    // Queue init requires stats so finalizes never race a missing counter set.
    assert!(matches!(
        ledger.initialize_queue(&ceo()),
        Err(ClaimsError::NotFound(_))
    ));
    ledger.initialize_stats(&ceo()).unwrap();
    ledger.initialize_queue(&ceo()).unwrap();
    assert!(matches!(
        ledger.initialize_stats(&ceo()),
        Err(ClaimsError::AlreadyInitialized(_))
    ));
    assert!(matches!(
        ledger.initialize_queue(&ceo()),
        Err(ClaimsError::AlreadyInitialized(_))
    ));

    let queue = ledger.queue().unwrap();
    assert!(queue.enabled);
    assert_eq!(queue.queue_size_limit, 100);
}

#[test]
fn test_only_ceo_passes_on_the_title() {
    let mut ledger = bootstrap();
    let pretender = submitter("pretender");
    assert!(matches!(
        ledger.pass_on_ceo(&pretender, pretender.clone()),
        Err(ClaimsError::Unauthorized(_))
    ));
    assert_eq!(ledger.ceo().unwrap().owner, ceo());

    let heir = submitter("heir");
    ledger.pass_on_ceo(&ceo(), heir.clone()).unwrap();
    assert_eq!(ledger.ceo().unwrap().owner, heir);

    // The old CEO is just another wallet now.
    assert!(matches!(
        ledger.add_fee_token(&ceo(), MintId::new("mint:other"), 9),
        Err(ClaimsError::Unauthorized(_))
    ));
    ledger.add_fee_token(&heir, MintId::new("mint:other"), 9).unwrap();
}

// ============ Access control ============

#[test]
fn test_processor_flags_reject_same_state_writes() {
    let mut ledger = bootstrap();
    // Only the CEO touches processor flags, and the registry is untouched
    // by a rejected attempt.
    assert!(matches!(
        ledger.set_processor_active(&submitter("mallory"), &processor(1), false),
        Err(ClaimsError::Unauthorized(_))
    ));
    assert!(ledger.processor(&processor(1)).unwrap().is_active);

    assert!(matches!(
        ledger.set_processor_active(&ceo(), &processor(1), true),
        Err(ClaimsError::InvalidState(_))
    ));

    ledger.set_processor_active(&ceo(), &processor(1), false).unwrap();
    assert!(!ledger.processor(&processor(1)).unwrap().is_active);

    // Granting super-admin reactivates; deactivating strips super-admin.
    ledger.set_processor_admin(&ceo(), &processor(1), true).unwrap();
    let record = ledger.processor(&processor(1)).unwrap();
    assert!(record.is_active && record.is_super_admin);

    ledger.set_processor_active(&ceo(), &processor(1), false).unwrap();
    let record = ledger.processor(&processor(1)).unwrap();
    assert!(!record.is_active && !record.is_super_admin);
}

#[test]
fn test_inactive_processor_is_rejected_everywhere() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    ledger.set_processor_active(&ceo(), &processor(1), false).unwrap();

    assert!(matches!(
        ledger.assign_claim(&processor(1), &alice),
        Err(ClaimsError::Unauthorized(_))
    ));
    assert_eq!(ledger.claim(&alice).unwrap().status, ClaimStatus::Queued);
}

#[test]
fn test_queue_flag_gating() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    ledger.create_submitter(&alice).unwrap();
    ledger
        .create_patient(&alice, 0, "Jane".to_string(), "Doe".to_string())
        .unwrap();

    // A plain processor cannot toggle the queue; a super-admin can.
    assert!(matches!(
        ledger.set_queue_enabled(&processor(1), false),
        Err(ClaimsError::Unauthorized(_))
    ));
    ledger.set_processor_admin(&ceo(), &processor(1), true).unwrap();
    ledger.set_queue_enabled(&processor(1), false).unwrap();

    assert!(matches!(
        ledger.submit_claim(&alice, submission()),
        Err(ClaimsError::QueueDisabled)
    ));
    ledger.set_queue_enabled(&ceo(), true).unwrap();
    ledger.submit_claim(&alice, submission()).unwrap();
}

#[test]
fn test_unknown_payment_token_is_rejected() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    ledger.create_submitter(&alice).unwrap();
    ledger
        .create_patient(&alice, 0, "Jane".to_string(), "Doe".to_string())
        .unwrap();

    let mut bad = submission();
    bad.payment_mint = MintId::new("mint:unlisted");
    assert!(matches!(
        ledger.submit_claim(&alice, bad),
        Err(ClaimsError::UnknownPaymentToken(_))
    ));

    // Removing the registered mint blocks future submissions only.
    ledger.submit_claim(&alice, submission()).unwrap();
    ledger.remove_fee_token(&ceo(), &usdc()).unwrap();
    assert!(ledger.claim(&alice).is_some());

    let bob = submitter("bob");
    ledger.create_submitter(&bob).unwrap();
    ledger
        .create_patient(&bob, 0, "John".to_string(), "Roe".to_string())
        .unwrap();
    assert!(matches!(
        ledger.submit_claim(&bob, submission()),
        Err(ClaimsError::UnknownPaymentToken(_))
    ));
}

#[test]
fn test_queue_capacity_is_enforced() {
    let mut ledger = bootstrap_with(EngineConfig {
        queue_size_limit: 1,
        ..EngineConfig::default()
    });
    let alice = submitter("alice");
    let bob = submitter("bob");
    submit_claim_for(&mut ledger, &alice);

    ledger.create_submitter(&bob).unwrap();
    ledger
        .create_patient(&bob, 0, "John".to_string(), "Roe".to_string())
        .unwrap();
    assert!(matches!(
        ledger.submit_claim(&bob, submission()),
        Err(ClaimsError::QueueFull)
    ));

    ledger.set_queue_size_limit(&ceo(), 2).unwrap();
    ledger.submit_claim(&bob, submission()).unwrap();
}

// ============ Registry ============

#[test]
fn test_patient_indices_are_sequential() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    ledger.create_submitter(&alice).unwrap();
    assert!(matches!(
        ledger.create_submitter(&alice),
        Err(ClaimsError::AlreadyExists(_))
    ));

    assert!(matches!(
        ledger.create_patient(&alice, 1, "Jane".to_string(), "Doe".to_string()),
        Err(ClaimsError::Validation(_))
    ));
    ledger
        .create_patient(&alice, 0, "Jane".to_string(), "Doe".to_string())
        .unwrap();
    ledger
        .create_patient(&alice, 1, "June".to_string(), "Doe".to_string())
        .unwrap();
    assert_eq!(ledger.submitter(&alice).unwrap().patient_count, 2);
    assert_eq!(ledger.patient(&alice, 1).unwrap().first_name, "June");
}

#[test]
fn test_patient_flag_tracks_active_count() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    ledger.create_submitter(&alice).unwrap();
    ledger
        .create_patient(&alice, 0, "Jane".to_string(), "Doe".to_string())
        .unwrap();
    assert_eq!(ledger.submitter(&alice).unwrap().active_patient_count, 1);

    assert!(matches!(
        ledger.set_patient_active(&alice, 0, true),
        Err(ClaimsError::InvalidState(_))
    ));
    ledger.set_patient_active(&alice, 0, false).unwrap();
    assert_eq!(ledger.submitter(&alice).unwrap().active_patient_count, 0);
}

// ============ Submission and assignment ============

#[test]
fn test_one_claim_in_flight_per_submitter() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    assert!(matches!(
        ledger.submit_claim(&alice, submission()),
        Err(ClaimsError::AlreadyExists(_))
    ));

    // Finalizing frees the slot and the next claim gets a fresh id.
    approve_claim_for(&mut ledger, &alice);
    let second_id = ledger.submit_claim(&alice, submission()).unwrap();
    assert_eq!(second_id, 2);
}

#[test]
fn test_assignment_has_exactly_one_winner() {
    let mut ledger = bootstrap();
    ledger.create_processor(&ceo(), processor(2)).unwrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);

    ledger.assign_claim(&processor(1), &alice).unwrap();
    let processed_before = ledger.stats().unwrap().processed_claim_count;

    let loser = ledger.assign_claim(&processor(2), &alice);
    assert!(matches!(loser, Err(ClaimsError::InvalidState(_))));

    // The loser's attempt left nothing behind.
    assert_eq!(ledger.stats().unwrap().processed_claim_count, processed_before);
    assert!(ledger.processed_claim(&processor(2), 0).is_none());
    assert!(ledger.processor(&processor(2)).unwrap().busy_with.is_none());
    assert_eq!(
        ledger.claim(&alice).unwrap().processor,
        Some(processor(1))
    );
}

#[test]
fn test_processor_works_one_claim_at_a_time() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    let bob = submitter("bob");
    submit_claim_for(&mut ledger, &alice);
    ledger.create_submitter(&bob).unwrap();
    ledger
        .create_patient(&bob, 0, "John".to_string(), "Roe".to_string())
        .unwrap();
    ledger.submit_claim(&bob, submission()).unwrap();

    ledger.assign_claim(&processor(1), &alice).unwrap();
    assert!(matches!(
        ledger.assign_claim(&processor(1), &bob),
        Err(ClaimsError::InvalidState(_))
    ));
}

// ============ Approval ============

#[test]
fn test_approval_round_trip_updates_exactly_one_outcome() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    let claim_id = submit_claim_for(&mut ledger, &alice);
    let sequence = approve_claim_for(&mut ledger, &alice);

    let stats = ledger.stats().unwrap();
    assert_eq!(stats.processed_claim_count, 1);
    assert_eq!(stats.approved_claim_count, 1);
    assert_eq!(stats.approved_claim_amount, 125_00);
    assert_eq!(stats.denied_claim_count, 0);
    assert_eq!(stats.max_denied_claim_count, 0);
    assert_eq!(stats.undenied_claim_count, 0);
    assert_eq!(stats.denied_appeal_count, 0);
    assert_eq!(stats.revoked_approval_count, 0);

    // The claim slot is consumed; the working record carries the outcome.
    assert!(ledger.claim(&alice).is_none());
    let processed = ledger.processed_claim(&processor(1), sequence).unwrap();
    assert_eq!(processed.status, ClaimStatus::Approved);
    assert_eq!(processed.claim_id, claim_id);
    assert_eq!(processed.processed_claim_id, Some(1));

    let record = ledger.patient_record(&alice, 0, 0).unwrap();
    assert_eq!(record.status, ClaimStatus::Approved);
    assert!(!record.patient_record_only);

    let freed = ledger.processor(&processor(1)).unwrap();
    assert!(freed.busy_with.is_none());
    assert_eq!(freed.processed_claim_count, 1);
    assert_eq!(ledger.queue().unwrap().current_queue_count, 0);
}

#[test]
fn test_approval_requires_all_records() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    ledger.assign_claim(&processor(1), &alice).unwrap();

    assert!(matches!(
        ledger.approve_claim(&processor(1), &alice),
        Err(ClaimsError::InvalidState(_))
    ));

    ledger.create_patient_record(&processor(1), &alice).unwrap();
    assert!(matches!(
        ledger.approve_claim(&processor(1), &alice),
        Err(ClaimsError::InvalidState(_))
    ));
    assert_eq!(ledger.stats().unwrap().processed_claim_count, 0);
}

#[test]
fn test_approval_with_edits_rewrites_claim_and_masters() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    let sequence = ledger.assign_claim(&processor(1), &alice).unwrap();
    ledger.create_patient_record(&processor(1), &alice).unwrap();
    ledger
        .create_hospital_and_insurance_company_records(&processor(1), &alice)
        .unwrap();

    let edits = ApprovalEdits {
        hospital_type: HospitalType::Dental,
        hospital_longitude: -85.6,
        hospital_latitude: 42.3,
        hospital_name: "Springfield Dental".to_string(),
        hospital_address: "100 Main St".to_string(),
        hospital_city: "Springfield".to_string(),
        hospital_zip_code: 49008,
        hospital_phone_number: 5559876543,
        invoice_number: "INV-0001-R".to_string(),
        note: "corrected invoice".to_string(),
        amount: 90_00,
        ailment: "cracked tooth".to_string(),
        insurance_company_name: "Acme Mutual Inc".to_string(),
    };
    ledger
        .approve_claim_with_edits(&processor(1), &alice, edits)
        .unwrap();

    assert_eq!(ledger.stats().unwrap().approved_claim_amount, 90_00);
    let processed = ledger.processed_claim(&processor(1), sequence).unwrap();
    assert_eq!(processed.amount, 90_00);
    assert_eq!(processed.hospital_name, "Springfield Dental");

    let hospital = ledger.hospital(1, 5, 0).unwrap();
    assert_eq!(hospital.hospital_type, HospitalType::Dental);
    assert_eq!(hospital.longitude, -85.6);
    assert_eq!(ledger.insurance_company(1).unwrap().name, "Acme Mutual Inc");
}

// ============ Max-deny ============

#[test]
fn test_max_deny_pending_counts_as_processed() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    ledger.max_deny_pending_claim(&ceo(), &alice).unwrap();

    let stats = ledger.stats().unwrap();
    assert_eq!(stats.max_denied_claim_count, 1);
    assert_eq!(stats.processed_claim_count, 1);
    assert_eq!(stats.approved_claim_count, 0);
    assert_eq!(stats.denied_claim_count, 0);
    assert!(ledger.claim(&alice).is_none());
    assert_eq!(ledger.queue().unwrap().max_denied_claim_count, 1);
}

#[test]
fn test_max_deny_in_progress_frees_the_processor() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    let sequence = ledger.assign_claim(&processor(1), &alice).unwrap();
    ledger.max_deny_in_progress_claim(&ceo(), &alice).unwrap();

    let stats = ledger.stats().unwrap();
    assert_eq!(stats.max_denied_claim_count, 1);
    assert_eq!(stats.processed_claim_count, 1);

    let processed = ledger.processed_claim(&processor(1), sequence).unwrap();
    assert_eq!(processed.status, ClaimStatus::MaxDenied);

    let freed = ledger.processor(&processor(1)).unwrap();
    assert!(freed.busy_with.is_none());
    assert_eq!(freed.processed_claim_count, 1);
}

#[test]
fn test_max_deny_is_blocked_once_records_exist() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    ledger.assign_claim(&processor(1), &alice).unwrap();
    ledger.create_patient_record(&processor(1), &alice).unwrap();

    assert!(matches!(
        ledger.max_deny_in_progress_claim(&ceo(), &alice),
        Err(ClaimsError::InvalidState(_))
    ));
}

#[test]
fn test_max_deny_gating_is_configurable() {
    // Conservative default: plain processors cannot max-deny.
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    assert!(matches!(
        ledger.max_deny_pending_claim(&processor(1), &alice),
        Err(ClaimsError::Unauthorized(_))
    ));

    // Relaxed engines let any active processor swing it.
    let mut ledger = bootstrap_with(EngineConfig {
        max_deny_requires_super_admin: false,
        ..EngineConfig::default()
    });
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    ledger.max_deny_pending_claim(&processor(1), &alice).unwrap();
    assert_eq!(
        ledger.processor(&processor(1)).unwrap().max_denied_claim_count,
        1
    );
}

// ============ Denial, appeal, undenial ============

#[test]
fn test_deny_appeal_undeny_walk() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    let sequence = ledger.assign_claim(&processor(1), &alice).unwrap();
    ledger
        .create_patient_record_and_deny_claim(&processor(1), &alice, "Testing".to_string())
        .unwrap();

    assert_eq!(ledger.stats().unwrap().denied_claim_count, 1);
    assert_eq!(ledger.stats().unwrap().processed_claim_count, 1);
    let processed = ledger.processed_claim(&processor(1), sequence).unwrap();
    assert_eq!(processed.status, ClaimStatus::Denied);
    assert_eq!(processed.denial_reason(), Some("Testing"));
    assert!(processed.has_only_patient_record());

    ledger
        .appeal_denied_claim_with_only_patient_record(
            &alice,
            &processor(1),
            sequence,
            &usdc(),
            "Testing Appeal".to_string(),
        )
        .unwrap();
    assert_eq!(ledger.stats().unwrap().submitted_appeal_count, 1);
    assert_eq!(
        ledger.processed_claim(&processor(1), sequence).unwrap().status,
        ClaimStatus::Appealed
    );

    ledger
        .undeny_claim_and_create_records(&ceo(), &processor(1), sequence)
        .unwrap();
    let stats = ledger.stats().unwrap();
    assert_eq!(stats.undenied_claim_count, 1);
    // The original denial stays on the books.
    assert_eq!(stats.denied_claim_count, 1);
    assert_eq!(stats.approved_claim_amount, 125_00);

    let processed = ledger.processed_claim(&processor(1), sequence).unwrap();
    assert_eq!(processed.status, ClaimStatus::Undenied);
    assert!(processed.has_all_records());

    // The undenial materialized the masters the adjudication never made.
    assert!(ledger.hospital(1, 5, 0).is_some());
    assert!(ledger.insurance_company(1).is_some());
    assert!(!ledger.patient_record(&alice, 0, 0).unwrap().patient_record_only);
}

#[test]
fn test_deny_appeal_then_final_denial() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    let sequence = ledger.assign_claim(&processor(1), &alice).unwrap();
    ledger.create_patient_record(&processor(1), &alice).unwrap();
    ledger
        .create_hospital_and_insurance_company_records(&processor(1), &alice)
        .unwrap();
    ledger
        .deny_claim_with_all_records(&processor(1), &alice, "incomplete invoice".to_string())
        .unwrap();
    ledger
        .appeal_denied_claim_with_all_records(
            &alice,
            &processor(1),
            sequence,
            &usdc(),
            "invoice attached".to_string(),
        )
        .unwrap();
    ledger
        .deny_appealed_claim_with_all_records(
            &ceo(),
            &processor(1),
            sequence,
            "invoice illegible".to_string(),
        )
        .unwrap();

    let stats = ledger.stats().unwrap();
    assert_eq!(stats.denied_appeal_count, 1);
    let processed = ledger.processed_claim(&processor(1), sequence).unwrap();
    assert_eq!(processed.status, ClaimStatus::AppealDenied);
    assert_eq!(processed.denial_reasons.len(), 2);

    // A settled appeal cannot be denied again.
    assert!(matches!(
        ledger.deny_appealed_claim_with_all_records(
            &ceo(),
            &processor(1),
            sequence,
            "again".to_string(),
        ),
        Err(ClaimsError::InvalidState(_))
    ));
    assert_eq!(ledger.stats().unwrap().denied_appeal_count, 1);
}

#[test]
fn test_only_the_original_submitter_appeals() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    let sequence = ledger.assign_claim(&processor(1), &alice).unwrap();
    ledger
        .create_patient_record_and_deny_claim(&processor(1), &alice, "Testing".to_string())
        .unwrap();

    assert!(matches!(
        ledger.appeal_denied_claim_with_only_patient_record(
            &submitter("mallory"),
            &processor(1),
            sequence,
            &usdc(),
            "not mine".to_string(),
        ),
        Err(ClaimsError::Unauthorized(_))
    ));
    assert_eq!(ledger.stats().unwrap().submitted_appeal_count, 0);
}

#[test]
fn test_appeal_variant_must_match_record_set() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    let sequence = ledger.assign_claim(&processor(1), &alice).unwrap();
    ledger
        .create_patient_record_and_deny_claim(&processor(1), &alice, "Testing".to_string())
        .unwrap();

    // The claim only has a patient record; the all-records path is wrong.
    assert!(matches!(
        ledger.appeal_denied_claim_with_all_records(
            &alice,
            &processor(1),
            sequence,
            &usdc(),
            "Testing Appeal".to_string(),
        ),
        Err(ClaimsError::InvalidState(_))
    ));
}

// ============ Revocation ============

#[test]
fn test_revocation_keeps_history_and_reopens_the_claim() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    let sequence = approve_claim_for(&mut ledger, &alice);

    ledger
        .revoke_approval(&ceo(), &processor(1), sequence, "billing fraud".to_string())
        .unwrap();
    let stats = ledger.stats().unwrap();
    assert_eq!(stats.revoked_approval_count, 1);
    // The approval stays counted; only the value total is clawed back.
    assert_eq!(stats.approved_claim_count, 1);
    assert_eq!(stats.approved_claim_amount, 0);

    let processed = ledger.processed_claim(&processor(1), sequence).unwrap();
    assert_eq!(processed.status, ClaimStatus::Revoked);

    // Revocation is reopenable: the submitter can appeal it.
    ledger
        .appeal_denied_claim_with_all_records(
            &alice,
            &processor(1),
            sequence,
            &usdc(),
            "the invoice was genuine".to_string(),
        )
        .unwrap();
    assert_eq!(
        ledger.processed_claim(&processor(1), sequence).unwrap().status,
        ClaimStatus::Appealed
    );

    // Revoking anything not approved fails.
    assert!(matches!(
        ledger.revoke_approval(&ceo(), &processor(1), sequence, "again".to_string()),
        Err(ClaimsError::InvalidState(_))
    ));
}

// ============ Records ============

#[test]
fn test_master_record_creation_is_idempotent() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    ledger.assign_claim(&processor(1), &alice).unwrap();
    ledger.create_patient_record(&processor(1), &alice).unwrap();

    ledger
        .create_hospital_and_insurance_company_records(&processor(1), &alice)
        .unwrap();
    ledger
        .create_hospital_and_insurance_company_records(&processor(1), &alice)
        .unwrap();

    // Exactly one of each master exists.
    assert_eq!(ledger.hospital(1, 5, 0).unwrap().id, 1);
    assert_eq!(ledger.insurance_company(1).unwrap().id, 1);
    assert_eq!(ledger.hospital(1, 5, 0).unwrap().record_count, 1);

    // The patient record path is idempotent too.
    ledger.create_patient_record(&processor(1), &alice).unwrap();
    assert_eq!(ledger.patient(&alice, 0).unwrap().record_count, 1);
}

#[test]
fn test_masters_are_shared_across_claims() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    let bob = submitter("bob");
    submit_claim_for(&mut ledger, &alice);
    approve_claim_for(&mut ledger, &alice);

    ledger.create_submitter(&bob).unwrap();
    ledger
        .create_patient(&bob, 0, "John".to_string(), "Roe".to_string())
        .unwrap();
    ledger.submit_claim(&bob, submission()).unwrap();
    approve_claim_for(&mut ledger, &bob);

    // Same key tuple, one master, two recorded claims.
    let hospital = ledger.hospital(1, 5, 0).unwrap();
    assert_eq!(hospital.id, 1);
    assert_eq!(hospital.record_count, 2);
    assert_eq!(hospital.approved_claim_count, 2);
}

#[test]
fn test_unresolved_indices_block_record_creation() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    ledger.create_submitter(&alice).unwrap();
    ledger
        .create_patient(&alice, 0, "Jane".to_string(), "Doe".to_string())
        .unwrap();
    let mut unresolved = submission();
    unresolved.hospital_index = -1;
    unresolved.insurance_company_index = -1;
    ledger.submit_claim(&alice, unresolved).unwrap();
    ledger.assign_claim(&processor(1), &alice).unwrap();
    ledger.create_patient_record(&processor(1), &alice).unwrap();

    assert!(matches!(
        ledger.create_hospital_and_insurance_company_records(&processor(1), &alice),
        Err(ClaimsError::Validation(_))
    ));

    // Index repair unblocks creation at the corrected key.
    ledger
        .update_claim_hospital_index(&processor(1), &alice, 7)
        .unwrap();
    ledger
        .update_claim_insurance_company_index(&processor(1), &alice, 3)
        .unwrap();
    ledger
        .create_hospital_and_insurance_company_records(&processor(1), &alice)
        .unwrap();
    assert!(ledger.hospital(1, 5, 7).is_some());
    assert!(ledger.insurance_company(3).is_some());

    // Once the record exists the index is frozen.
    assert!(matches!(
        ledger.update_claim_hospital_index(&processor(1), &alice, 8),
        Err(ClaimsError::InvalidState(_))
    ));
}

// ============ Post-finalize edits ============

#[test]
fn test_edits_never_touch_status_or_counters() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    let sequence = approve_claim_for(&mut ledger, &alice);
    let stats_before = ledger.stats().unwrap().clone();

    ledger
        .edit_processed_claim_and_all_records(
            &ceo(),
            &processor(1),
            sequence,
            RecordEdits {
                invoice_number: "INV-0001-C".to_string(),
                note: "amount corrected".to_string(),
                amount: 150_00,
                ailment: "broken arm".to_string(),
            },
        )
        .unwrap();

    let stats = ledger.stats().unwrap();
    assert_eq!(stats.processed_claim_count, stats_before.processed_claim_count);
    assert_eq!(stats.approved_claim_count, stats_before.approved_claim_count);
    // The approved-value total follows the corrected amount.
    assert_eq!(stats.approved_claim_amount, 150_00);

    let processed = ledger.processed_claim(&processor(1), sequence).unwrap();
    assert_eq!(processed.status, ClaimStatus::Approved);
    assert_eq!(processed.amount, 150_00);
    assert_eq!(processed.invoice_number, "INV-0001-C");
    assert_eq!(ledger.patient_record(&alice, 0, 0).unwrap().amount, 150_00);
}

#[test]
fn test_edit_reattributes_to_existing_masters_only() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    let sequence = ledger.assign_claim(&processor(1), &alice).unwrap();
    ledger
        .create_patient_record_and_deny_claim(&processor(1), &alice, "Testing".to_string())
        .unwrap();

    // No master exists at the target indices yet.
    let edits = ProcessedClaimEdits {
        hospital_index: 0,
        insurance_company_index: 1,
        invoice_number: "INV-0001".to_string(),
        note: "reattributed".to_string(),
        amount: 125_00,
        ailment: "broken arm".to_string(),
    };
    assert!(matches!(
        ledger.edit_processed_claim_and_patient_record(
            &ceo(),
            &processor(1),
            sequence,
            edits.clone(),
        ),
        Err(ClaimsError::NotFound(_))
    ));

    // Approve a second claim that materializes the masters, then retry.
    let bob = submitter("bob");
    ledger.create_submitter(&bob).unwrap();
    ledger
        .create_patient(&bob, 0, "John".to_string(), "Roe".to_string())
        .unwrap();
    ledger.submit_claim(&bob, submission()).unwrap();
    approve_claim_for(&mut ledger, &bob);

    ledger
        .edit_processed_claim_and_patient_record(&ceo(), &processor(1), sequence, edits)
        .unwrap();
    let processed = ledger.processed_claim(&processor(1), sequence).unwrap();
    assert_eq!(processed.hospital_name, "Springfield General");
    assert_eq!(processed.status, ClaimStatus::Denied);
}

// ============ Sequences ============

#[test]
fn test_processor_sequence_relocates_each_claim() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    let bob = submitter("bob");
    submit_claim_for(&mut ledger, &alice);
    ledger.create_submitter(&bob).unwrap();
    ledger
        .create_patient(&bob, 0, "John".to_string(), "Roe".to_string())
        .unwrap();
    ledger.submit_claim(&bob, submission()).unwrap();

    let first = approve_claim_for(&mut ledger, &alice);
    let second = ledger.assign_claim(&processor(1), &bob).unwrap();
    ledger
        .create_patient_record_and_deny_claim(&processor(1), &bob, "Testing".to_string())
        .unwrap();

    assert_eq!(first, 0);
    assert_eq!(second, 1);
    assert_eq!(
        ledger.processed_claim(&processor(1), first).unwrap().status,
        ClaimStatus::Approved
    );
    assert_eq!(
        ledger.processed_claim(&processor(1), second).unwrap().status,
        ClaimStatus::Denied
    );
}

// ============ Denial hammer ============

#[test]
fn test_denial_hammer_is_all_or_nothing() {
    let mut ledger = bootstrap();
    let names = ["alice", "bob", "carol"];
    for name in names {
        let who = submitter(name);
        ledger.create_submitter(&who).unwrap();
        ledger
            .create_patient(&who, 0, "Jane".to_string(), "Doe".to_string())
            .unwrap();
        ledger.submit_claim(&who, submission()).unwrap();
    }
    ledger.assign_claim(&processor(1), &submitter("carol")).unwrap();

    // One assigned claim poisons the whole batch.
    let batch: Vec<_> = names.iter().map(|name| submitter(name)).collect();
    assert!(matches!(
        ledger.drop_denial_hammer(&ceo(), &batch),
        Err(ClaimsError::InvalidState(_))
    ));
    assert!(ledger.claim(&submitter("alice")).is_some());
    assert!(ledger.claim(&submitter("bob")).is_some());
    assert_eq!(ledger.queue().unwrap().current_queue_count, 3);
    assert_eq!(ledger.stats().unwrap().denial_hammer_dropped_count, 0);

    // Rebuild the batch from the live queue and drop again.
    let corrected: Vec<_> = ledger
        .queued_claims()
        .map(|claim| claim.submitter.clone())
        .collect();
    assert_eq!(ledger.drop_denial_hammer(&ceo(), &corrected).unwrap(), 2);
    assert!(ledger.claim(&submitter("alice")).is_none());
    assert!(ledger.claim(&submitter("carol")).is_some());
    assert_eq!(ledger.queue().unwrap().current_queue_count, 1);
    assert_eq!(ledger.stats().unwrap().denial_hammer_dropped_count, 1);
}

#[test]
fn test_denial_hammer_batch_rules() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);

    let oversized: Vec<_> = (0..26).map(|i| submitter(&format!("bulk{i}"))).collect();
    assert!(matches!(
        ledger.drop_denial_hammer(&ceo(), &oversized),
        Err(ClaimsError::Validation(_))
    ));

    let duplicated = vec![alice.clone(), alice.clone()];
    assert!(matches!(
        ledger.drop_denial_hammer(&ceo(), &duplicated),
        Err(ClaimsError::Validation(_))
    ));

    assert!(matches!(
        ledger.drop_denial_hammer(&submitter("mallory"), &[alice.clone()]),
        Err(ClaimsError::Unauthorized(_))
    ));

    assert_eq!(ledger.drop_denial_hammer(&ceo(), &[alice]).unwrap(), 1);
}

// ============ Inspection ============

#[test]
fn test_records_export_for_inspection() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);
    let sequence = approve_claim_for(&mut ledger, &alice);

    let stats = serde_json::to_value(ledger.stats().unwrap()).unwrap();
    assert_eq!(stats["approved_claim_count"], 1);
    assert_eq!(stats["approved_claim_amount"], 125_00);

    let processed =
        serde_json::to_value(ledger.processed_claim(&processor(1), sequence).unwrap()).unwrap();
    assert_eq!(processed["status"], "approved");
    assert_eq!(processed["submitter"], "wallet:alice");
}

// ============ Lifecycle walks ============

#[test]
fn test_statuses_walk_the_lifecycle_graph_only() {
    let mut ledger = bootstrap();
    let alice = submitter("alice");
    submit_claim_for(&mut ledger, &alice);

    // Queued claims cannot be finalized or denied directly.
    assert!(matches!(
        ledger.approve_claim(&processor(1), &alice),
        Err(ClaimsError::InvalidState(_))
    ));
    assert!(matches!(
        ledger.deny_claim_with_all_records(&processor(1), &alice, "no".to_string()),
        Err(ClaimsError::InvalidState(_))
    ));

    let sequence = ledger.assign_claim(&processor(1), &alice).unwrap();
    assert_eq!(ledger.claim(&alice).unwrap().status, ClaimStatus::Assigned);
    assert_eq!(
        ledger.processed_claim(&processor(1), sequence).unwrap().status,
        ClaimStatus::Assigned
    );

    // Appeal before any denial is a dead edge.
    assert!(matches!(
        ledger.appeal_denied_claim_with_only_patient_record(
            &alice,
            &processor(1),
            sequence,
            &usdc(),
            "early".to_string(),
        ),
        Err(ClaimsError::InvalidState(_))
    ));

    // Undeny before any appeal is a dead edge.
    ledger
        .create_patient_record_and_deny_claim(&processor(1), &alice, "Testing".to_string())
        .unwrap();
    assert!(matches!(
        ledger.undeny_claim_and_create_records(&ceo(), &processor(1), sequence),
        Err(ClaimsError::InvalidState(_))
    ));

    let stats = ledger.stats().unwrap();
    assert!(
        stats.approved_claim_count + stats.denied_claim_count + stats.max_denied_claim_count
            <= stats.processed_claim_count
    );
}
