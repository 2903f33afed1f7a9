//! Cryptographic primitives for soul containers.
//!
//! # Algorithms
//!
//! - **Key Derivation**: Argon2id (memory-hard, brute-force resistant)
//! - **Encryption**: ChaCha20-Poly1305 with a fixed domain-separation label as
//!   associated data
//! - **Signing**: HMAC-SHA256, verified in constant time
//! - **Hashing**: SHA-256, compared in constant time
//!
//! All functions are stateless. Randomness comes only from the operating
//! system's CSPRNG.

/// Authenticated encryption.
pub mod aead;
/// Error types for cryptographic operations.
pub mod error;
/// Password-based key derivation.
pub mod kdf;
/// Keyed MACs, digests, and constant-time comparison.
pub mod mac;
/// Operating-system randomness.
pub mod random;

/// Re-export AEAD types.
pub use aead::{AUTH_TAG_LEN, DOMAIN_LABEL, NONCE_LEN, Sealed, decrypt, encrypt};
/// Re-export error types.
pub use error::{CryptoError, CryptoResult};
/// Re-export key derivation types.
pub use kdf::{KEY_LEN, KdfParams, SALT_LEN, SecretKey, derive_key};
/// Re-export MAC and digest helpers.
pub use mac::{DIGEST_LEN, MAC_LEN, constant_time_eq, hash, sign, verify, verify_integrity};
/// Re-export randomness helpers.
pub use random::random_bytes;
