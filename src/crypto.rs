//! Personalized Blake2b-256 hashing
//!
//! Every on-chain hash in this protocol is Blake2b with a 32-byte output
//! and the `ckb-default-hash` personalization.

use crate::types::{Byte32, Script};
use crate::witness;
use blake2::digest::consts::U32;
use blake2::digest::{FixedOutput, Update};
use blake2::Blake2bMac;

/// Personalization applied to every hash; fixed by the chain protocol.
pub const HASH_PERSONALIZATION: &[u8; 16] = b"ckb-default-hash";

/// Blake2b-256 hasher in the chain's personalized flavor
pub struct Blake2b256 {
    inner: Blake2bMac<U32>,
}

impl Blake2b256 {
    /// Create a new hasher
    pub fn new() -> Self {
        // A zero-length key selects plain (unkeyed) hashing
        let inner = Blake2bMac::new_with_salt_and_personal(&[], &[], HASH_PERSONALIZATION)
            .expect("personalization fits the blake2b parameter block");
        Self { inner }
    }

    /// Absorb more input
    pub fn update(&mut self, data: &[u8]) {
        Update::update(&mut self.inner, data);
    }

    /// Finish and return the 32-byte digest
    pub fn finalize(self) -> [u8; 32] {
        self.inner.finalize_fixed().into()
    }

    /// One-shot hash of a byte slice
    pub fn digest(data: &[u8]) -> [u8; 32] {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }
}

impl Default for Blake2b256 {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash of the serialized script, identifying a lock on chain
pub fn script_hash(script: &Script) -> Byte32 {
    Byte32::new(Blake2b256::digest(&witness::serialize_script(script)))
}
