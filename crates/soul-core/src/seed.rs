use std::fmt;

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{SoulError, SoulResult};

/// Size of a secret seed in bytes (256 bits).
pub const SEED_BYTES: usize = 32;
/// Length of the canonical seed representation: lowercase hex.
pub const SEED_HEX_LEN: usize = SEED_BYTES * 2;

/// True if `s` is exactly 64 lowercase hexadecimal characters.
pub fn is_valid_seed_hex(s: &str) -> bool {
    s.len() == SEED_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// A soul's 256-bit secret, held in canonical lowercase hex.
///
/// Deserialization does not validate the format so that corrupted records can
/// still be loaded and reported on; call [`SecretSeed::is_well_formed`] (or the
/// engine validators) before trusting one. The value is wiped on drop, its
/// `Debug` output is redacted, and equality is constant-time.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct SecretSeed(String);

impl SecretSeed {
    /// Build a seed from raw random bytes. The caller supplies the randomness.
    pub fn from_bytes(bytes: &[u8; SEED_BYTES]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Parse a seed from its canonical hex form.
    pub fn parse(s: &str) -> SoulResult<Self> {
        if is_valid_seed_hex(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(SoulError::invalid(format!(
                "secret seed must be {SEED_HEX_LEN} lowercase hex characters"
            )))
        }
    }

    /// The canonical hex string. Never log or export this outside encrypted payloads.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Whether the stored value has the canonical length and alphabet.
    pub fn is_well_formed(&self) -> bool {
        is_valid_seed_hex(&self.0)
    }

    /// Decode into raw key bytes, for use as a MAC key.
    pub fn to_key_bytes(&self) -> SoulResult<Zeroizing<[u8; SEED_BYTES]>> {
        if !self.is_well_formed() {
            return Err(SoulError::structural("secret seed is malformed"));
        }
        let mut key = Zeroizing::new([0u8; SEED_BYTES]);
        hex::decode_to_slice(&self.0, &mut key[..])
            .map_err(|e| SoulError::structural(format!("secret seed is malformed: {e}")))?;
        Ok(key)
    }
}

impl PartialEq for SecretSeed {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && bool::from(self.0.as_bytes().ct_eq(other.0.as_bytes()))
    }
}

impl Eq for SecretSeed {}

impl fmt::Debug for SecretSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretSeed(<redacted>)")
    }
}
