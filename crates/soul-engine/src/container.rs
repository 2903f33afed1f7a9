//! Encrypted, signed export format for souls.
//!
//! # Layout
//!
//! A container carries everything needed to open it except the password:
//! the KDF parameters and salt, the AEAD nonce and detached tag, a
//! HMAC-SHA256 signature over the plaintext keyed by the soul's own seed, and
//! a SHA-256 digest of the plaintext. The signature is an integrity check
//! only. Anyone able to decrypt also holds the key needed to re-sign.
//!
//! Opening is all or nothing. Any failed check yields
//! [`SoulError::Integrity`] without saying which check it was.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use soul_core::{SoulError, SoulResult};
use soul_crypto::{
    AUTH_TAG_LEN, DIGEST_LEN, KdfParams, MAC_LEN, NONCE_LEN, SALT_LEN, Sealed, SecretKey, decrypt,
    derive_key, encrypt, hash, random_bytes, sign, verify, verify_integrity,
};

use crate::soul::Soul;
use crate::validate::verification_report;

/// Current container format version.
pub const FORMAT_VERSION: u32 = 1;

/// Algorithm suite identifier stored in every container.
pub const ALGORITHM_ID: &str = "argon2id/chacha20poly1305/hmac-sha256";

/// Non-secret fields readable without the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerMetadata {
    /// Name of the sealed soul.
    pub soul_name: String,
    /// Number of epochs in the sealed soul.
    pub epoch_count: usize,
    /// Timestamp of the sealed soul's last epoch.
    pub last_epoch_at: Option<DateTime<Utc>>,
}

impl ContainerMetadata {
    fn of(soul: &Soul) -> Self {
        Self {
            soul_name: soul.name().to_string(),
            epoch_count: soul.epoch_count(),
            last_epoch_at: soul.last_epoch_at(),
        }
    }
}

/// The exportable, encrypted-at-rest form of a [`Soul`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecureContainer {
    /// Format version; must equal [`FORMAT_VERSION`].
    pub format_version: u32,
    /// Algorithm suite; must equal [`ALGORITHM_ID`].
    pub algorithm_id: String,
    /// Argon2id parameters used to derive the key.
    pub kdf: KdfParams,
    /// Random KDF salt.
    #[serde(with = "hex::serde")]
    pub salt: [u8; SALT_LEN],
    /// AEAD nonce.
    #[serde(with = "hex::serde")]
    pub nonce: [u8; NONCE_LEN],
    /// Encrypted canonical soul JSON.
    #[serde(with = "hex::serde")]
    pub ciphertext: Vec<u8>,
    /// Detached AEAD tag.
    #[serde(with = "hex::serde")]
    pub auth_tag: [u8; AUTH_TAG_LEN],
    /// HMAC-SHA256 of the plaintext, keyed by the soul's seed.
    #[serde(with = "hex::serde")]
    pub signature: [u8; MAC_LEN],
    /// SHA-256 of the plaintext.
    #[serde(with = "hex::serde")]
    pub plaintext_hash: [u8; DIGEST_LEN],
    /// When the container was sealed.
    pub created_at: DateTime<Utc>,
    /// Public summary of the sealed soul.
    pub metadata: ContainerMetadata,
}

impl SecureContainer {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> SoulResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SoulError::structural(format!("cannot serialize container: {e}")))
    }

    /// Parse a container from JSON. Nothing is decrypted or verified here.
    pub fn from_json(json: &str) -> SoulResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SoulError::structural(format!("malformed container: {e}")))
    }
}

/// Seal a soul under a password.
///
/// # Errors
///
/// - [`SoulError::InvalidInput`] for an empty password or out-of-range
///   KDF parameters.
/// - [`SoulError::Structural`] if the soul fails structural validation.
/// - [`SoulError::Crypto`] if the random source or a primitive fails.
pub fn create_container(
    soul: &Soul,
    password: &str,
    kdf: &KdfParams,
) -> SoulResult<SecureContainer> {
    if password.is_empty() {
        return Err(SoulError::invalid("password must not be empty"));
    }
    kdf.validate()?;
    let report = verification_report(soul);
    if !report.is_valid() {
        return Err(SoulError::structural(format!(
            "cannot seal an invalid soul: {}",
            report.issues.join("; ")
        )));
    }

    let plaintext = soul.to_canonical_json()?;
    let salt: [u8; SALT_LEN] = random_bytes()?;
    let key = derive_key(password.as_bytes(), &salt, kdf)?;
    let sealed = encrypt(&plaintext, &key)?;
    let seed_key = soul.secret_seed().to_key_bytes()?;
    let signature = sign(&plaintext, seed_key.as_slice())?;

    let container = SecureContainer {
        format_version: FORMAT_VERSION,
        algorithm_id: ALGORITHM_ID.to_string(),
        kdf: *kdf,
        salt,
        nonce: sealed.nonce,
        ciphertext: sealed.ciphertext,
        auth_tag: sealed.tag,
        signature,
        plaintext_hash: hash(&plaintext),
        created_at: Utc::now(),
        metadata: ContainerMetadata::of(soul),
    };
    info!(
        soul = %container.metadata.soul_name,
        epochs = container.metadata.epoch_count,
        "sealed soul"
    );
    Ok(container)
}

/// Open a container with its password.
///
/// # Errors
///
/// - [`SoulError::Structural`] for an unknown format version or algorithm,
///   or KDF parameters outside the accepted bounds. Checked before any key
///   derivation.
/// - [`SoulError::InvalidInput`] for an empty password.
/// - [`SoulError::Integrity`] for a wrong password or any tampering.
pub fn open_container(container: &SecureContainer, password: &str) -> SoulResult<Soul> {
    if container.format_version != FORMAT_VERSION {
        return Err(SoulError::structural(format!(
            "unsupported container format version {}",
            container.format_version
        )));
    }
    if container.algorithm_id != ALGORITHM_ID {
        return Err(SoulError::structural(format!(
            "unsupported container algorithm \"{}\"",
            container.algorithm_id
        )));
    }
    container
        .kdf
        .validate()
        .map_err(|e| SoulError::structural(format!("container kdf parameters rejected: {e}")))?;
    if password.is_empty() {
        return Err(SoulError::invalid("password must not be empty"));
    }

    let key = derive_key(password.as_bytes(), &container.salt, &container.kdf)?;
    let Some(soul) = unseal(container, &key) else {
        warn!("container failed to open");
        return Err(SoulError::Integrity);
    };
    info!(soul = %soul.name(), epochs = soul.epoch_count(), "opened container");
    Ok(soul)
}

/// Every check after key derivation. `None` on the first failure.
fn unseal(container: &SecureContainer, key: &SecretKey) -> Option<Soul> {
    let sealed = Sealed {
        ciphertext: container.ciphertext.clone(),
        nonce: container.nonce,
        tag: container.auth_tag,
    };
    let plaintext = decrypt(&sealed, key).ok()?;
    if !verify_integrity(&plaintext, &container.plaintext_hash) {
        return None;
    }
    let soul = Soul::from_json(&plaintext).ok()?;
    let seed_key = soul.secret_seed().to_key_bytes().ok()?;
    if !verify(&plaintext, &container.signature, seed_key.as_slice()) {
        return None;
    }
    if container.metadata != ContainerMetadata::of(&soul) {
        return None;
    }
    Some(soul)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "correct-password";

    fn sample_soul() -> Soul {
        let mut soul = Soul::new("Sealed Soul").unwrap();
        soul.consult("Q1", None).unwrap();
        soul.consult("Q2", None).unwrap();
        soul
    }

    fn is_structural(result: SoulResult<Soul>) -> bool {
        matches!(result, Err(SoulError::Structural(_)))
    }

    fn sample_container() -> (Soul, SecureContainer) {
        let soul = sample_soul();
        let container = create_container(&soul, PASSWORD, &KdfParams::MINIMUM).unwrap();
        (soul, container)
    }

    #[test]
    fn seal_and_open() {
        let (soul, container) = sample_container();
        assert_eq!(container.format_version, FORMAT_VERSION);
        assert_eq!(container.algorithm_id, ALGORITHM_ID);
        assert_eq!(container.kdf, KdfParams::MINIMUM);
        assert_eq!(container.metadata.soul_name, "Sealed Soul");
        assert_eq!(container.metadata.epoch_count, 2);
        assert_eq!(container.metadata.last_epoch_at, soul.last_epoch_at());
        assert_eq!(open_container(&container, PASSWORD).unwrap(), soul);
    }

    #[test]
    fn wrong_password_is_integrity_error() {
        let (_, container) = sample_container();
        let err = open_container(&container, "wrong-password").unwrap_err();
        assert_eq!(err, SoulError::Integrity);
        assert_eq!(
            err.to_string(),
            "cannot open: wrong password or corrupted data"
        );
    }

    #[test]
    fn empty_password_rejected() {
        let soul = sample_soul();
        assert!(matches!(
            create_container(&soul, "", &KdfParams::MINIMUM),
            Err(SoulError::InvalidInput(_))
        ));
        let (_, container) = sample_container();
        assert!(matches!(
            open_container(&container, ""),
            Err(SoulError::InvalidInput(_))
        ));
    }

    #[test]
    fn weak_kdf_rejected_when_sealing() {
        let soul = sample_soul();
        let weak = KdfParams::MINIMUM.with_memory_kib(1024);
        assert!(matches!(
            create_container(&soul, PASSWORD, &weak),
            Err(SoulError::InvalidInput(_))
        ));
    }

    #[test]
    fn invalid_soul_refused() {
        let mut value: serde_json::Value =
            serde_json::from_slice(&sample_soul().to_canonical_json().unwrap()).unwrap();
        value["epochs"][0]["reading"]["emergence"] = serde_json::json!(0);
        let soul: Soul = serde_json::from_value(value).unwrap();
        let err = create_container(&soul, PASSWORD, &KdfParams::MINIMUM).unwrap_err();
        assert!(matches!(err, SoulError::Structural(_)));
        assert!(err.to_string().contains("epoch[0]"));
    }

    #[test]
    fn ciphertext_hides_the_seed() {
        let (soul, container) = sample_container();
        let json = container.to_json().unwrap();
        assert!(!json.contains(soul.secret_seed().expose_secret()));
        assert!(!json.contains("Q1"));
    }

    #[test]
    fn envelope_checks_are_structural() {
        let (_, container) = sample_container();

        let mut c = container.clone();
        c.format_version = 2;
        assert!(is_structural(open_container(&c, PASSWORD)));

        let mut c = container.clone();
        c.algorithm_id = "aes-256-gcm".to_string();
        assert!(is_structural(open_container(&c, PASSWORD)));

        let mut c = container.clone();
        c.kdf.memory_kib = u32::MAX;
        assert!(is_structural(open_container(&c, PASSWORD)));

        let mut c = container;
        c.kdf.iterations = 0;
        assert!(is_structural(open_container(&c, PASSWORD)));
    }

    #[test]
    fn altered_metadata_is_integrity_error() {
        let (_, container) = sample_container();
        let mut c = container.clone();
        c.metadata.soul_name = "Someone Else".to_string();
        assert_eq!(open_container(&c, PASSWORD), Err(SoulError::Integrity));

        let mut c = container;
        c.metadata.epoch_count = 7;
        assert_eq!(open_container(&c, PASSWORD), Err(SoulError::Integrity));
    }

    #[test]
    fn altered_hash_or_salt_is_integrity_error() {
        let (_, container) = sample_container();
        let mut c = container.clone();
        c.plaintext_hash[0] ^= 1;
        assert_eq!(open_container(&c, PASSWORD), Err(SoulError::Integrity));

        let mut c = container;
        c.salt[15] ^= 0x40;
        assert_eq!(open_container(&c, PASSWORD), Err(SoulError::Integrity));
    }

    #[test]
    fn json_roundtrip() {
        let (soul, container) = sample_container();
        let json = container.to_json().unwrap();
        let algorithm = format!("\"algorithm_id\": \"{ALGORITHM_ID}\"");
        assert!(json.contains(&algorithm));
        let back = SecureContainer::from_json(&json).unwrap();
        assert_eq!(back, container);
        assert_eq!(open_container(&back, PASSWORD).unwrap(), soul);
    }

    #[test]
    fn malformed_json_is_structural() {
        assert!(matches!(
            SecureContainer::from_json("{\"format_version\": 1}"),
            Err(SoulError::Structural(_))
        ));
        let (_, container) = sample_container();
        let json = container.to_json().unwrap().replace(
            &hex::encode(container.salt),
            &hex::encode([0u8; 8]),
        );
        assert!(matches!(
            SecureContainer::from_json(&json),
            Err(SoulError::Structural(_))
        ));
    }
}
