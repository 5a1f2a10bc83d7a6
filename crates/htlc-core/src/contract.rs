use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hashing::Commitment;
use crate::types::{ContractId, Identity, Party};

/// Terminal outcome of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    /// Neither branch has succeeded yet.
    Unresolved,
    /// The claimant revealed the preimage before the deadline.
    ClaimedByClaimant,
    /// The funder reclaimed the value after the deadline.
    RefundedToFunder,
}

impl Resolution {
    /// Whether this is a terminal state.
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }

    /// The party that received the value, if any.
    pub fn winner(&self) -> Option<Party> {
        match self {
            Self::Unresolved => None,
            Self::ClaimedByClaimant => Some(Party::Claimant),
            Self::RefundedToFunder => Some(Party::Funder),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved => write!(f, "Unresolved"),
            Self::ClaimedByClaimant => write!(f, "ClaimedByClaimant"),
            Self::RefundedToFunder => write!(f, "RefundedToFunder"),
        }
    }
}

#[derive(Debug)]
struct Outcome {
    resolution: Resolution,
    resolved_at: Option<DateTime<Utc>>,
    revealed_preimage: Option<Vec<u8>>,
}

/// A Hashed Timelock Contract.
///
/// Terms are immutable after construction. The only mutable parts are the
/// `funded` flag and the outcome, and both only move forward: `funded` from
/// false to true, the outcome from `Unresolved` to exactly one terminal
/// [`Resolution`]. Both writes are check-and-set operations, so a `Contract`
/// can be shared between threads racing to claim and refund it.
///
/// Contracts are created through [`HtlcEngine::construct`](crate::engine::HtlcEngine::construct).
#[derive(Debug)]
pub struct Contract {
    id: ContractId,
    commitment: Commitment,
    funder: Identity,
    claimant: Identity,
    created_at: DateTime<Utc>,
    deadline: DateTime<Utc>,
    funded: AtomicBool,
    outcome: Mutex<Outcome>,
}

impl Contract {
    pub(crate) fn new(
        commitment: Commitment,
        funder: Identity,
        claimant: Identity,
        created_at: DateTime<Utc>,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ContractId::new(),
            commitment,
            funder,
            claimant,
            created_at,
            deadline,
            funded: AtomicBool::new(false),
            outcome: Mutex::new(Outcome {
                resolution: Resolution::Unresolved,
                resolved_at: None,
                revealed_preimage: None,
            }),
        }
    }

    pub fn id(&self) -> ContractId {
        self.id
    }

    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    pub fn funder(&self) -> &Identity {
        &self.funder
    }

    pub fn claimant(&self) -> &Identity {
        &self.claimant
    }

    /// Identity bound to `party` at construction.
    pub fn identity_of(&self, party: Party) -> &Identity {
        match party {
            Party::Funder => &self.funder,
            Party::Claimant => &self.claimant,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    pub fn is_funded(&self) -> bool {
        self.funded.load(Ordering::Acquire)
    }

    pub fn resolution(&self) -> Resolution {
        self.lock_outcome().resolution
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.lock_outcome().resolved_at
    }

    /// The preimage revealed by a successful claim.
    ///
    /// This is what lets the counterparty of a cross-chain swap unlock the
    /// mirrored contract on the other side.
    pub fn revealed_preimage(&self) -> Option<Vec<u8>> {
        self.lock_outcome().revealed_preimage.clone()
    }

    /// Flip `funded` from false to true. Returns false if it was already set.
    pub(crate) fn mark_funded(&self) -> bool {
        self.funded
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Move the outcome from `Unresolved` to `to`, atomically.
    ///
    /// On failure returns the resolution that got there first and leaves the
    /// contract untouched.
    pub(crate) fn compare_and_resolve(
        &self,
        to: Resolution,
        at: DateTime<Utc>,
        preimage: Option<&[u8]>,
    ) -> Result<(), Resolution> {
        debug_assert!(to.is_final());

        let mut outcome = self.lock_outcome();
        if outcome.resolution != Resolution::Unresolved {
            return Err(outcome.resolution);
        }
        outcome.resolution = to;
        outcome.resolved_at = Some(at);
        outcome.revealed_preimage = preimage.map(<[u8]>::to_vec);
        Ok(())
    }

    /// Serializable copy of the externally observable state.
    pub fn snapshot(&self) -> ContractSnapshot {
        let outcome = self.lock_outcome();
        ContractSnapshot {
            id: self.id,
            commitment: self.commitment,
            funder: self.funder.clone(),
            claimant: self.claimant.clone(),
            created_at: self.created_at,
            deadline: self.deadline,
            funded: self.is_funded(),
            resolution: outcome.resolution,
            resolved_at: outcome.resolved_at,
            revealed_preimage: outcome.revealed_preimage.as_deref().map(hex::encode),
        }
    }

    fn lock_outcome(&self) -> std::sync::MutexGuard<'_, Outcome> {
        // The guarded writes can't panic halfway, so a poisoned lock still
        // holds consistent data.
        self.outcome.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Point-in-time view of a [`Contract`], for audit logs and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSnapshot {
    pub id: ContractId,
    pub commitment: Commitment,
    pub funder: Identity,
    pub claimant: Identity,
    pub created_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub funded: bool,
    pub resolution: Resolution,
    pub resolved_at: Option<DateTime<Utc>>,
    /// Hex-encoded preimage, present once claimed.
    pub revealed_preimage: Option<String>,
}

impl ContractSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
