//! Integration test: the single-contract lifecycle end to end.
//!
//! Hash lock over "mysecret123", 21 minute timeout, shared-secret keys.

use chrono::Duration;
use htlc_core::{Commitment, ErrorKind, HtlcError, Identity, Resolution};
use htlc_integration_tests::{alice_sig, bob_sig, Harness, ALICE_KEY, BOB_KEY, SECRET, TIMEOUT_SECS};

#[test]
fn test_claim_at_one_second_reveals_secret() {
    let h = Harness::shared_secret();
    let contract = h.funded_contract();
    h.clock.advance(Duration::seconds(1));

    let receipt = h
        .engine
        .claim(&contract, b"mysecret123", &alice_sig())
        .expect("claim should succeed");

    assert_eq!(receipt.preimage, b"mysecret123");
    assert_eq!(contract.resolution(), Resolution::ClaimedByClaimant);
    assert_eq!(contract.revealed_preimage().as_deref(), Some(SECRET));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let h = Harness::shared_secret();
    let contract = h.funded_contract();
    h.clock.advance(Duration::seconds(1));

    let err = h.engine.claim(&contract, b"wrong", &alice_sig()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PreimageMismatch);
    assert_eq!(contract.resolution(), Resolution::Unresolved);
}

#[test]
fn test_refund_after_timeout_on_untouched_contract() {
    let h = Harness::shared_secret();
    let contract = h.funded_contract();
    h.clock.advance(Duration::seconds(TIMEOUT_SECS + 1));

    h.engine
        .refund(&contract, &bob_sig())
        .expect("refund should succeed");
    assert_eq!(contract.resolution(), Resolution::RefundedToFunder);
}

#[test]
fn test_failed_claim_then_refund_like_the_demo() {
    let h = Harness::shared_secret();
    let contract = h.funded_contract();

    assert!(h.engine.claim(&contract, b"wrong", &alice_sig()).is_err());
    let err = h.engine.refund(&contract, &bob_sig()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DeadlineNotReached);

    h.clock.set(contract.deadline() + Duration::seconds(1));
    h.engine.refund(&contract, &bob_sig()).unwrap();

    let snap = contract.snapshot();
    assert_eq!(snap.resolution, Resolution::RefundedToFunder);
    assert!(snap.funded);
    assert!(snap.revealed_preimage.is_none());
}

#[test]
fn test_every_operation_on_unfunded_contract_fails() {
    let h = Harness::shared_secret();
    let contract = h
        .engine
        .construct(
            Commitment::from_secret(SECRET),
            Identity::from_bytes(BOB_KEY.to_vec()),
            Identity::from_bytes(ALICE_KEY.to_vec()),
            Duration::seconds(TIMEOUT_SECS),
        )
        .unwrap();

    for offset in [0, TIMEOUT_SECS, TIMEOUT_SECS + 10] {
        h.clock.set(contract.created_at() + Duration::seconds(offset));
        assert_eq!(
            h.engine.claim(&contract, SECRET, &alice_sig()).unwrap_err(),
            HtlcError::NotFunded(contract.id())
        );
        assert_eq!(
            h.engine.refund(&contract, &bob_sig()).unwrap_err(),
            HtlcError::NotFunded(contract.id())
        );
    }
}

#[test]
fn test_refund_before_deadline_fails_regardless_of_credentials() {
    let h = Harness::shared_secret();
    let contract = h.funded_contract();

    for offset in [0, 1, TIMEOUT_SECS / 2, TIMEOUT_SECS - 1] {
        h.clock.set(contract.created_at() + Duration::seconds(offset));
        for cred in [bob_sig(), alice_sig()] {
            let err = h.engine.refund(&contract, &cred).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DeadlineNotReached);
        }
    }
    assert_eq!(contract.resolution(), Resolution::Unresolved);
}

#[test]
fn test_claim_after_deadline_fails_even_with_valid_inputs() {
    let h = Harness::shared_secret();
    let contract = h.funded_contract();

    for offset in [1, 60, 86_400] {
        h.clock.set(contract.deadline() + Duration::seconds(offset));
        let err = h.engine.claim(&contract, SECRET, &alice_sig()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeadlineExpired);
    }
}

#[test]
fn test_claim_succeeds_once_then_everything_is_already_resolved() {
    let h = Harness::shared_secret();
    let contract = h.funded_contract();
    h.engine.claim(&contract, SECRET, &alice_sig()).unwrap();

    assert_eq!(
        h.engine.claim(&contract, SECRET, &alice_sig()).unwrap_err().kind(),
        ErrorKind::AlreadyResolved
    );
    h.clock.set(contract.deadline());
    assert_eq!(
        h.engine.refund(&contract, &bob_sig()).unwrap_err().kind(),
        ErrorKind::AlreadyResolved
    );
    assert_eq!(contract.resolution(), Resolution::ClaimedByClaimant);
}

#[test]
fn test_snapshot_is_serializable_for_audit() {
    let h = Harness::shared_secret();
    let contract = h.funded_contract();
    h.engine.claim(&contract, SECRET, &alice_sig()).unwrap();

    let json = serde_json::to_value(contract.snapshot()).unwrap();
    assert_eq!(json["resolution"], "ClaimedByClaimant");
    assert_eq!(json["funded"], true);
    assert_eq!(json["commitment"], "ef1219c978270e3da250ea2db34986bef29d0436");
    assert_eq!(json["claimant"], hex::encode(ALICE_KEY));
}
