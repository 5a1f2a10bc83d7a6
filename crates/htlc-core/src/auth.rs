//! Pluggable authorization for the claim and refund branches.
//!
//! The engine never interprets identities or credentials itself; it asks an
//! [`AuthorizationVerifier`] whether a presented [`Credential`] is valid for
//! the [`Identity`] bound into the contract. Two verifiers ship with the crate:
//!
//! - [`SharedSecretVerifier`]: credential must equal the identity bytes.
//!   This is the placeholder scheme used in simple demos.
//! - [`Ed25519Verifier`]: identity is an Ed25519 verifying key, credential a
//!   signature over [`AuthContext::challenge`].

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use subtle::ConstantTimeEq;

use crate::types::{ContractId, Credential, Identity, Party};

/// What an authorization is for: one branch of one contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub contract_id: ContractId,
    pub party: Party,
}

impl AuthContext {
    pub fn new(contract_id: ContractId, party: Party) -> Self {
        Self { contract_id, party }
    }

    /// Canonical bytes a signature-based credential must cover.
    ///
    /// Binds both the contract and the branch, so a refund signature can't be
    /// replayed as a claim or against another contract.
    pub fn challenge(&self) -> Vec<u8> {
        format!("htlc-auth:v1:{}:{}", self.contract_id, self.party).into_bytes()
    }
}

/// Decides whether a credential authorizes the holder of an identity.
///
/// Implementations must be pure: no side effects, no panics on malformed input.
pub trait AuthorizationVerifier: Send + Sync {
    fn verify(&self, ctx: &AuthContext, identity: &Identity, credential: &Credential) -> bool;
}

impl<F> AuthorizationVerifier for F
where
    F: Fn(&AuthContext, &Identity, &Credential) -> bool + Send + Sync,
{
    fn verify(&self, ctx: &AuthContext, identity: &Identity, credential: &Credential) -> bool {
        self(ctx, identity, credential)
    }
}

/// Exact (constant-time) equality between a pre-shared key and the credential.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedSecretVerifier;

impl AuthorizationVerifier for SharedSecretVerifier {
    fn verify(&self, _ctx: &AuthContext, identity: &Identity, credential: &Credential) -> bool {
        identity.as_bytes().ct_eq(credential.as_bytes()).into()
    }
}

/// Ed25519 signature verification over the context challenge.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl AuthorizationVerifier for Ed25519Verifier {
    fn verify(&self, ctx: &AuthContext, identity: &Identity, credential: &Credential) -> bool {
        let Ok(key_bytes) = <[u8; 32]>::try_from(identity.as_bytes()) else {
            tracing::debug!(len = identity.as_bytes().len(), "identity is not a 32-byte key");
            return false;
        };
        let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(credential.as_bytes()) else {
            tracing::debug!(len = credential.as_bytes().len(), "malformed signature");
            return false;
        };
        verifying_key.verify(&ctx.challenge(), &signature).is_ok()
    }
}

/// Identity for an Ed25519 key holder.
pub fn ed25519_identity(key: &VerifyingKey) -> Identity {
    Identity::from_bytes(key.to_bytes().to_vec())
}

/// Sign the challenge for `ctx`, producing a credential [`Ed25519Verifier`] accepts.
pub fn ed25519_credential(key: &SigningKey, ctx: &AuthContext) -> Credential {
    let sig = key.sign(&ctx.challenge());
    Credential::from_bytes(sig.to_bytes().to_vec())
}
