use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};

/// Salt length for key derivation (16 bytes).
pub const SALT_LEN: usize = 16;

/// Derived key length (32 bytes).
pub const KEY_LEN: usize = 32;

/// A derived 256-bit key, wiped when dropped.
pub type SecretKey = Zeroizing<[u8; KEY_LEN]>;

/// Argon2id cost parameters.
///
/// These travel inside every container, so opening never depends on local
/// configuration. [`KdfParams::validate`] bounds them in both directions: the
/// floor stops downgraded containers, the ceiling stops a hostile container
/// from demanding unbounded memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes over memory.
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    pub parallelism: u32,
}

impl KdfParams {
    /// Cheapest accepted parameters (8 MiB, 1 pass, 1 lane).
    pub const MINIMUM: Self = Self {
        memory_kib: 8 * 1024,
        iterations: 1,
        parallelism: 1,
    };

    /// Largest accepted memory cost (1 GiB).
    pub const MAX_MEMORY_KIB: u32 = 1024 * 1024;
    /// Largest accepted pass count.
    pub const MAX_ITERATIONS: u32 = 64;
    /// Largest accepted lane count.
    pub const MAX_PARALLELISM: u32 = 16;

    /// Set the memory cost in KiB.
    pub fn with_memory_kib(mut self, memory_kib: u32) -> Self {
        self.memory_kib = memory_kib;
        self
    }

    /// Set the number of passes.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the number of lanes.
    pub fn with_parallelism(mut self, parallelism: u32) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Check that every parameter is within the accepted range.
    pub fn validate(&self) -> CryptoResult<()> {
        if !(Self::MINIMUM.memory_kib..=Self::MAX_MEMORY_KIB).contains(&self.memory_kib) {
            return Err(CryptoError::InvalidInput(format!(
                "kdf memory {} KiB outside {}..={}",
                self.memory_kib,
                Self::MINIMUM.memory_kib,
                Self::MAX_MEMORY_KIB
            )));
        }
        if !(Self::MINIMUM.iterations..=Self::MAX_ITERATIONS).contains(&self.iterations) {
            return Err(CryptoError::InvalidInput(format!(
                "kdf iterations {} outside {}..={}",
                self.iterations,
                Self::MINIMUM.iterations,
                Self::MAX_ITERATIONS
            )));
        }
        if !(Self::MINIMUM.parallelism..=Self::MAX_PARALLELISM).contains(&self.parallelism) {
            return Err(CryptoError::InvalidInput(format!(
                "kdf parallelism {} outside {}..={}",
                self.parallelism,
                Self::MINIMUM.parallelism,
                Self::MAX_PARALLELISM
            )));
        }
        Ok(())
    }
}

impl Default for KdfParams {
    /// 19 MiB, 2 passes, 1 lane.
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Derive a 256-bit key from a password and salt with Argon2id.
///
/// Deliberately slow. Callers on latency-sensitive paths should run this on a
/// background thread.
///
/// # Errors
///
/// - [`CryptoError::InvalidInput`] for an empty password, a salt that is not
///   exactly [`SALT_LEN`] bytes, or out-of-range parameters.
/// - [`CryptoError::KeyDerivation`] if the Argon2 backend fails.
pub fn derive_key(password: &[u8], salt: &[u8], params: &KdfParams) -> CryptoResult<SecretKey> {
    if password.is_empty() {
        return Err(CryptoError::InvalidInput(
            "password must not be empty".into(),
        ));
    }
    if salt.len() != SALT_LEN {
        return Err(CryptoError::InvalidInput(format!(
            "salt must be {SALT_LEN} bytes, got {}",
            salt.len()
        )));
    }
    params.validate()?;

    let argon_params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| CryptoError::KeyDerivation(format!("invalid Argon2 params: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password, salt, &mut key[..])
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: [u8; SALT_LEN] = [7u8; SALT_LEN];

    #[test]
    fn same_inputs_same_key() {
        let a = derive_key(b"test-password-123", &SALT, &KdfParams::MINIMUM).unwrap();
        let b = derive_key(b"test-password-123", &SALT, &KdfParams::MINIMUM).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn different_password_or_salt_different_key() {
        let base = derive_key(b"password-one", &SALT, &KdfParams::MINIMUM).unwrap();
        let other_pw = derive_key(b"password-two", &SALT, &KdfParams::MINIMUM).unwrap();
        let salt = [8u8; SALT_LEN];
        let other_salt = derive_key(b"password-one", &salt, &KdfParams::MINIMUM).unwrap();
        assert_ne!(*base, *other_pw);
        assert_ne!(*base, *other_salt);
    }

    #[test]
    fn parameters_change_the_key() {
        let a = derive_key(b"pw", &SALT, &KdfParams::MINIMUM).unwrap();
        let b = derive_key(b"pw", &SALT, &KdfParams::MINIMUM.with_iterations(2)).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn rejects_malformed_salt() {
        for len in [0, 8, 15, 17, 32] {
            let salt = vec![0u8; len];
            let err = derive_key(b"pw", &salt, &KdfParams::MINIMUM).unwrap_err();
            assert!(matches!(err, CryptoError::InvalidInput(_)), "len {len}");
        }
    }

    #[test]
    fn rejects_empty_password() {
        let err = derive_key(b"", &SALT, &KdfParams::MINIMUM).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidInput(_)));
    }

    #[test]
    fn parameter_bounds() {
        assert!(KdfParams::default().validate().is_ok());
        assert!(KdfParams::MINIMUM.validate().is_ok());
        for params in [
            KdfParams::MINIMUM.with_memory_kib(1024),
            KdfParams::MINIMUM.with_memory_kib(u32::MAX),
            KdfParams::MINIMUM.with_iterations(0),
        ] {
            assert!(params.validate().is_err(), "{params:?}");
        }
        assert!(KdfParams::MINIMUM.with_iterations(65).validate().is_err());
        assert!(KdfParams::MINIMUM.with_parallelism(0).validate().is_err());
        assert!(KdfParams::MINIMUM.with_parallelism(17).validate().is_err());
    }

    #[test]
    fn params_serde_roundtrip() {
        let json = serde_json::to_string(&KdfParams::default()).unwrap();
        assert_eq!(
            json,
            r#"{"memory_kib":19456,"iterations":2,"parallelism":1}"#
        );
        let back: KdfParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, KdfParams::default());
    }
}
