//! Two-stage hash lock: RIPEMD-160 over SHA-256 (HASH160).

use std::fmt;
use std::str::FromStr;

use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::HtlcError;

/// Length of a HASH160 digest in bytes.
pub const COMMITMENT_LEN: usize = 20;

/// HASH160 digest (20 bytes).
pub type Hash160 = [u8; COMMITMENT_LEN];

/// Compute `RIPEMD160(SHA256(data))`.
pub fn hash160(data: &[u8]) -> Hash160 {
    let sha = Sha256::digest(data);
    let digest = Ripemd160::digest(sha);

    let mut out = [0u8; COMMITMENT_LEN];
    out.copy_from_slice(&digest);
    out
}

/// The hash lock of a contract: HASH160 of the secret preimage.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(#[serde(with = "hex")] Hash160);

impl Commitment {
    /// Commit to a secret.
    pub fn from_secret(secret: &[u8]) -> Self {
        Self(hash160(secret))
    }

    /// Wrap an existing digest. Fails unless exactly 20 bytes are given.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, HtlcError> {
        let digest: Hash160 = bytes.try_into().map_err(|_| {
            HtlcError::InvalidParameter(format!(
                "commitment must be {} bytes, got {}",
                COMMITMENT_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(digest))
    }

    pub fn from_hex(s: &str) -> Result<Self, HtlcError> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| HtlcError::InvalidParameter(format!("invalid commitment hex: {}", e)))?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &Hash160 {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Whether `preimage` opens this commitment. Constant-time comparison.
    pub fn matches(&self, preimage: &[u8]) -> bool {
        hash160(preimage)[..].ct_eq(&self.0[..]).into()
    }
}

impl From<Hash160> for Commitment {
    fn from(digest: Hash160) -> Self {
        Self(digest)
    }
}

impl FromStr for Commitment {
    type Err = HtlcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", self.to_hex())
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
