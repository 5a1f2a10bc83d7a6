//! HTLC Engine
//!
//! A Hashed Timelock Contract locks value so that the claimant can withdraw it
//! by revealing a secret whose HASH160 matches the committed hash lock before
//! a deadline, and the funder can reclaim it from the deadline on. This crate
//! owns the contract state machine and the race between those two branches;
//! time and authorization are injected collaborators.

pub mod error;
pub mod types;
pub mod hashing;
pub mod clock;
pub mod auth;
pub mod config;
pub mod contract;
pub mod engine;

pub use error::{ErrorKind, HtlcError, Result};
pub use types::{ContractId, Credential, Identity, Party};
pub use hashing::{hash160, Commitment, Hash160};
pub use clock::{Clock, ManualClock, SystemClock};
pub use auth::{AuthContext, AuthorizationVerifier, Ed25519Verifier, SharedSecretVerifier};
pub use config::EngineConfig;
pub use contract::{Contract, ContractSnapshot, Resolution};
pub use engine::{ClaimReceipt, HtlcEngine, RefundReceipt};
