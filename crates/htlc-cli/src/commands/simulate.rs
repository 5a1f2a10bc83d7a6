//! `htlc simulate` — Walk one contract through fund, claim and refund.
//!
//! Runs against a manual clock, so the refund path doesn't have to wait out
//! the real timeout: when the claim fails (or no secret is offered) the clock
//! is moved one second past the deadline and the funder refunds.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use clap::Args;
use ed25519_dalek::SigningKey;
use htlc_core::auth::{ed25519_credential, ed25519_identity};
use htlc_core::{
    AuthContext, Commitment, Contract, ContractSnapshot, Credential, HtlcEngine, Identity,
    ManualClock, Party,
};
use sha2::{Digest, Sha256};

use crate::config::{AuthScheme, HtlcConfig};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Secret the hash lock is built from.
    #[arg(long, default_value = "mysecret123")]
    pub secret: String,

    /// Secret the claimant presents (defaults to the real secret).
    #[arg(long, conflicts_with = "no_secret")]
    pub claim_secret: Option<String>,

    /// Claimant never presents a secret; go straight to the refund path.
    #[arg(long)]
    pub no_secret: bool,

    /// Contract timeout in seconds (defaults to the configured timeout).
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Claimant key material.
    #[arg(long, default_value = "AliceSecretKey")]
    pub claimant_key: String,

    /// Funder key material.
    #[arg(long, default_value = "BobSecretKey")]
    pub funder_key: String,
}

/// A party's key under the configured scheme.
///
/// Shared-secret: the key string is both identity and credential.
/// Ed25519: the key string is hashed into a signing key seed.
struct Participant<'a> {
    key: &'a str,
    scheme: AuthScheme,
}

impl<'a> Participant<'a> {
    fn new(key: &'a str, scheme: AuthScheme) -> Self {
        Self { key, scheme }
    }

    fn signing_key(&self) -> SigningKey {
        let seed: [u8; 32] = Sha256::digest(self.key.as_bytes()).into();
        SigningKey::from_bytes(&seed)
    }

    fn identity(&self) -> Identity {
        match self.scheme {
            AuthScheme::SharedSecret => Identity::from_bytes(self.key.as_bytes().to_vec()),
            AuthScheme::Ed25519 => ed25519_identity(&self.signing_key().verifying_key()),
        }
    }

    fn credential(&self, contract: &Contract, party: Party) -> Credential {
        match self.scheme {
            AuthScheme::SharedSecret => Credential::from_bytes(self.key.as_bytes().to_vec()),
            AuthScheme::Ed25519 => {
                ed25519_credential(&self.signing_key(), &AuthContext::new(contract.id(), party))
            }
        }
    }
}

pub fn run(args: &SimulateArgs, config: &HtlcConfig) -> anyhow::Result<()> {
    let snapshot = simulate(args, config)?;

    println!("\n=== Final state ===");
    match snapshot.resolution.winner() {
        Some(Party::Claimant) => println!("Funds claimed by: claimant"),
        Some(Party::Funder) => println!("Funds refunded to: funder"),
        None => println!("Funds are still locked"),
    }
    println!("{}", snapshot.to_json()?);
    Ok(())
}

/// One second past the deadline, or the deadline itself when that would
/// overflow the representable range (refund is already open there).
fn refund_instant(contract: &Contract) -> DateTime<Utc> {
    contract
        .deadline()
        .checked_add_signed(Duration::seconds(1))
        .unwrap_or_else(|| contract.deadline())
}

pub fn simulate(args: &SimulateArgs, config: &HtlcConfig) -> anyhow::Result<ContractSnapshot> {
    let scheme = config.auth.scheme;
    let clock = Arc::new(ManualClock::starting_now());
    let engine = HtlcEngine::new(config.engine.clone(), clock.clone(), scheme.verifier());

    let claimant = Participant::new(&args.claimant_key, scheme);
    let funder = Participant::new(&args.funder_key, scheme);

    let commitment = Commitment::from_secret(args.secret.as_bytes());
    println!("HASH160(secret): {}", commitment);

    let timeout_secs = args.timeout.unwrap_or(config.engine.default_timeout_secs);
    let timeout = htlc_core::engine::seconds(timeout_secs)
        .ok_or_else(|| anyhow::anyhow!("timeout {}s out of range", timeout_secs))?;
    let contract = engine.construct(commitment, funder.identity(), claimant.identity(), timeout)?;
    engine.fund(&contract)?;
    println!("HTLC {} funded, deadline {}", contract.id(), contract.deadline());

    let claimed = if args.no_secret {
        println!("\nClaimant does not provide the secret preimage.");
        false
    } else {
        let secret = args.claim_secret.as_deref().unwrap_or(&args.secret);
        println!("\nClaimant provides a secret preimage...");
        match engine.claim(
            &contract,
            secret.as_bytes(),
            &claimant.credential(&contract, Party::Claimant),
        ) {
            Ok(receipt) => {
                println!(
                    "Claimant claimed the funds, revealing {:?}",
                    String::from_utf8_lossy(&receipt.preimage)
                );
                true
            }
            Err(e) => {
                println!("Claim failed: {}", e);
                false
            }
        }
    };

    if !claimed {
        println!("Waiting for the timeout so the funder can refund...");
        clock.set(refund_instant(&contract));
        match engine.refund(&contract, &funder.credential(&contract, Party::Funder)) {
            Ok(_) => println!("Funder refunded the funds."),
            Err(e) => println!("Refund failed: {}", e),
        }
    }

    Ok(contract.snapshot())
}
