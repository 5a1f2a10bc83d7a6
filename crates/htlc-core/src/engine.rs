use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthContext, AuthorizationVerifier, SharedSecretVerifier};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::contract::{Contract, Resolution};
use crate::error::{HtlcError, Result};
use crate::hashing::Commitment;
use crate::types::{ContractId, Credential, Identity, Party};

/// Proof of a successful claim. Carries the revealed preimage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    pub contract_id: ContractId,
    #[serde(with = "hex")]
    pub preimage: Vec<u8>,
    pub claimed_at: DateTime<Utc>,
}

/// Proof of a successful refund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundReceipt {
    pub contract_id: ContractId,
    pub refunded_at: DateTime<Utc>,
}

/// Drives contracts through fund, claim and refund.
///
/// The engine is stateless apart from its collaborators; contract state lives
/// in each [`Contract`]. Time comes from the injected [`Clock`] and
/// authorization decisions from the injected [`AuthorizationVerifier`].
///
/// Deadline boundaries: a claim is allowed while `now <= deadline`, a refund
/// once `now >= deadline`. At exactly the deadline both branches are open and
/// whichever call resolves the contract first wins; the other gets
/// [`HtlcError::AlreadyResolved`].
pub struct HtlcEngine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    verifier: Arc<dyn AuthorizationVerifier>,
}

impl HtlcEngine {
    pub fn new(
        config: EngineConfig,
        clock: Arc<dyn Clock>,
        verifier: Arc<dyn AuthorizationVerifier>,
    ) -> Self {
        Self {
            config,
            clock,
            verifier,
        }
    }

    /// Wall clock, shared-secret authorization, default limits.
    pub fn with_defaults() -> Self {
        Self::new(
            EngineConfig::default(),
            Arc::new(SystemClock),
            Arc::new(SharedSecretVerifier),
        )
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Create an unfunded, unresolved contract expiring `timeout` from now.
    pub fn construct(
        &self,
        commitment: Commitment,
        funder: Identity,
        claimant: Identity,
        timeout: Duration,
    ) -> Result<Contract> {
        if timeout <= Duration::zero() {
            return Err(HtlcError::InvalidParameter(format!(
                "timeout must be positive, got {}s",
                timeout.num_seconds()
            )));
        }
        if let Some(max) = self.config.max_timeout_secs {
            if seconds(max).is_some_and(|limit| timeout > limit) {
                return Err(HtlcError::InvalidParameter(format!(
                    "timeout {}s exceeds maximum {}s",
                    timeout.num_seconds(),
                    max
                )));
            }
        }

        let created_at = self.clock.now();
        let deadline = created_at
            .checked_add_signed(timeout)
            .ok_or_else(|| HtlcError::InvalidParameter("deadline out of range".into()))?;

        let contract = Contract::new(commitment, funder, claimant, created_at, deadline);
        tracing::info!(
            contract_id = %contract.id(),
            commitment = %contract.commitment(),
            deadline = %deadline,
            "HTLC created"
        );
        Ok(contract)
    }

    /// Like [`construct`](Self::construct), from a raw digest of unchecked length.
    pub fn construct_from_slice(
        &self,
        commitment: &[u8],
        funder: Identity,
        claimant: Identity,
        timeout: Duration,
    ) -> Result<Contract> {
        let commitment = Commitment::from_slice(commitment)?;
        self.construct(commitment, funder, claimant, timeout)
    }

    /// Construct with `config.default_timeout_secs`.
    pub fn construct_with_default_timeout(
        &self,
        commitment: Commitment,
        funder: Identity,
        claimant: Identity,
    ) -> Result<Contract> {
        let timeout = seconds(self.config.default_timeout_secs).ok_or_else(|| {
            HtlcError::InvalidParameter(format!(
                "default timeout {}s out of range",
                self.config.default_timeout_secs
            ))
        })?;
        self.construct(commitment, funder, claimant, timeout)
    }

    /// Record that the funding deposit was observed. Allowed exactly once.
    ///
    /// The engine doesn't check any ledger; the caller signals funding once its
    /// settlement layer has confirmed the deposit.
    pub fn fund(&self, contract: &Contract) -> Result<()> {
        if !contract.mark_funded() {
            tracing::warn!(contract_id = %contract.id(), "HTLC already funded");
            return Err(HtlcError::AlreadyFunded(contract.id()));
        }
        tracing::info!(contract_id = %contract.id(), "HTLC funded");
        Ok(())
    }

    /// Withdraw the value by revealing the preimage before the deadline.
    ///
    /// Checks, in order: funded, unresolved, `now <= deadline`, preimage,
    /// claimant authorization. The first failing check is returned.
    pub fn claim(
        &self,
        contract: &Contract,
        preimage: &[u8],
        credential: &Credential,
    ) -> Result<ClaimReceipt> {
        let id = contract.id();
        self.check_open(contract, Party::Claimant)?;

        let now = self.clock.now();
        if now > contract.deadline() {
            return Err(reject(Party::Claimant, HtlcError::DeadlineExpired(id)));
        }

        if !contract.commitment().matches(preimage) {
            return Err(reject(Party::Claimant, HtlcError::PreimageMismatch(id)));
        }

        self.check_authorization(contract, Party::Claimant, credential)?;

        contract
            .compare_and_resolve(Resolution::ClaimedByClaimant, now, Some(preimage))
            .map_err(|resolution| {
                reject(Party::Claimant, HtlcError::AlreadyResolved { id, resolution })
            })?;

        tracing::info!(contract_id = %id, party = %Party::Claimant, "HTLC claimed");
        Ok(ClaimReceipt {
            contract_id: id,
            preimage: preimage.to_vec(),
            claimed_at: now,
        })
    }

    /// Reclaim the value once the deadline has been reached.
    ///
    /// Checks, in order: funded, unresolved, `now >= deadline`, funder
    /// authorization.
    pub fn refund(&self, contract: &Contract, credential: &Credential) -> Result<RefundReceipt> {
        let id = contract.id();
        self.check_open(contract, Party::Funder)?;

        let now = self.clock.now();
        if now < contract.deadline() {
            return Err(reject(Party::Funder, HtlcError::DeadlineNotReached(id)));
        }

        self.check_authorization(contract, Party::Funder, credential)?;

        contract
            .compare_and_resolve(Resolution::RefundedToFunder, now, None)
            .map_err(|resolution| {
                reject(Party::Funder, HtlcError::AlreadyResolved { id, resolution })
            })?;

        tracing::info!(contract_id = %id, party = %Party::Funder, "HTLC refunded");
        Ok(RefundReceipt {
            contract_id: id,
            refunded_at: now,
        })
    }

    /// Whether the claim branch is still open on the clock (`now <= deadline`).
    pub fn claim_window_open(&self, contract: &Contract) -> bool {
        self.clock.now() <= contract.deadline()
    }

    /// Whether the refund branch is open on the clock (`now >= deadline`).
    pub fn is_expired(&self, contract: &Contract) -> bool {
        self.clock.now() >= contract.deadline()
    }

    /// Time left until the deadline, zero once it has passed.
    pub fn time_remaining(&self, contract: &Contract) -> Duration {
        (contract.deadline() - self.clock.now()).max(Duration::zero())
    }

    fn check_open(&self, contract: &Contract, party: Party) -> Result<()> {
        let id = contract.id();
        if !contract.is_funded() {
            return Err(reject(party, HtlcError::NotFunded(id)));
        }
        let resolution = contract.resolution();
        if resolution.is_final() {
            return Err(reject(party, HtlcError::AlreadyResolved { id, resolution }));
        }
        Ok(())
    }

    fn check_authorization(
        &self,
        contract: &Contract,
        party: Party,
        credential: &Credential,
    ) -> Result<()> {
        let ctx = AuthContext::new(contract.id(), party);
        if self
            .verifier
            .verify(&ctx, contract.identity_of(party), credential)
        {
            Ok(())
        } else {
            Err(reject(party, HtlcError::AuthorizationFailed(contract.id())))
        }
    }
}

/// `secs` as a `Duration`, `None` if it doesn't fit.
pub fn seconds(secs: u64) -> Option<Duration> {
    i64::try_from(secs).ok().and_then(Duration::try_seconds)
}

fn reject(party: Party, err: HtlcError) -> HtlcError {
    tracing::debug!(party = %party, kind = ?err.kind(), error = %err, "HTLC operation rejected");
    err
}
