//! Integration test: atomic swap over two mirrored contracts.
//!
//! Alice knows the secret. She locks value for Bob on chain A with a long
//! timeout; Bob locks value for Alice on chain B under the same hash lock with
//! a shorter timeout. Alice's claim on B reveals the secret, which Bob then
//! uses on A. Both contracts use Ed25519 authorization.

use chrono::Duration;
use htlc_core::{Commitment, Contract, ErrorKind, Party, Resolution};
use htlc_integration_tests::{Harness, Signer, SECRET};

const LONG_TIMEOUT: i64 = 2 * 3600;
const SHORT_TIMEOUT: i64 = 3600;

struct Swap {
    h: Harness,
    alice: Signer,
    bob: Signer,
    /// Funded by Alice, claimable by Bob.
    chain_a: Contract,
    /// Funded by Bob, claimable by Alice.
    chain_b: Contract,
}

fn setup_swap() -> Swap {
    let h = Harness::ed25519();
    let alice = Signer::from_seed(1);
    let bob = Signer::from_seed(2);
    let lock = Commitment::from_secret(SECRET);

    let chain_a = h
        .engine
        .construct(lock, alice.identity(), bob.identity(), Duration::seconds(LONG_TIMEOUT))
        .unwrap();
    h.engine.fund(&chain_a).unwrap();

    // Bob only needs the published hash lock to mirror the contract.
    let published = Commitment::from_hex(&chain_a.commitment().to_hex()).unwrap();
    let chain_b = h
        .engine
        .construct(published, bob.identity(), alice.identity(), Duration::seconds(SHORT_TIMEOUT))
        .unwrap();
    h.engine.fund(&chain_b).unwrap();

    Swap {
        h,
        alice,
        bob,
        chain_a,
        chain_b,
    }
}

#[test]
fn test_revealed_secret_completes_both_legs() {
    let s = setup_swap();
    s.h.clock.advance(Duration::seconds(60));

    let receipt = s
        .h
        .engine
        .claim(&s.chain_b, SECRET, &s.alice.authorize(&s.chain_b, Party::Claimant))
        .unwrap();
    assert_eq!(s.chain_b.resolution(), Resolution::ClaimedByClaimant);

    // Bob learns the secret from chain B and claims chain A.
    let learned = s.chain_b.revealed_preimage().expect("secret revealed");
    assert_eq!(learned, receipt.preimage);
    s.h.clock.advance(Duration::seconds(60));
    s.h.engine
        .claim(&s.chain_a, &learned, &s.bob.authorize(&s.chain_a, Party::Claimant))
        .unwrap();
    assert_eq!(s.chain_a.resolution(), Resolution::ClaimedByClaimant);
}

#[test]
fn test_no_reveal_means_both_sides_refund() {
    let s = setup_swap();

    s.h.clock.set(s.chain_b.deadline());
    s.h.engine
        .refund(&s.chain_b, &s.bob.authorize(&s.chain_b, Party::Funder))
        .unwrap();

    // Chain A is still locked until its own, later deadline.
    let err = s
        .h
        .engine
        .refund(&s.chain_a, &s.alice.authorize(&s.chain_a, Party::Funder))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DeadlineNotReached);

    s.h.clock.set(s.chain_a.deadline());
    s.h.engine
        .refund(&s.chain_a, &s.alice.authorize(&s.chain_a, Party::Funder))
        .unwrap();

    assert_eq!(s.chain_a.resolution(), Resolution::RefundedToFunder);
    assert_eq!(s.chain_b.resolution(), Resolution::RefundedToFunder);
}

#[test]
fn test_signature_for_one_leg_is_useless_on_the_other() {
    let s = setup_swap();

    let sig_for_b = s.alice.authorize(&s.chain_b, Party::Claimant);
    s.h.clock.set(s.chain_a.deadline());
    // Alice is the funder of A: a claimant signature for B must not refund A.
    let err = s.h.engine.refund(&s.chain_a, &sig_for_b).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthorizationFailed);
}

#[test]
fn test_wrong_signer_cannot_claim() {
    let s = setup_swap();
    let err = s
        .h
        .engine
        .claim(&s.chain_b, SECRET, &s.bob.authorize(&s.chain_b, Party::Claimant))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthorizationFailed);
    assert_eq!(s.chain_b.resolution(), Resolution::Unresolved);
}
