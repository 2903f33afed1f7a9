use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};
use crate::kdf::KEY_LEN;
use crate::random::random_bytes;

/// Nonce length for ChaCha20-Poly1305 (12 bytes).
pub const NONCE_LEN: usize = 12;

/// Poly1305 authentication tag length (16 bytes).
pub const AUTH_TAG_LEN: usize = 16;

/// Associated data bound into every encryption.
///
/// Ciphertexts produced here fail to open under any other label, so they
/// cannot be replayed into a different context that shares the key.
pub const DOMAIN_LABEL: &[u8] = b"soul-engine/secure-container/v1";

/// Output of [`encrypt`]: ciphertext with its detached nonce and tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// Encrypted bytes, same length as the plaintext.
    pub ciphertext: Vec<u8>,
    /// Random per-call nonce.
    pub nonce: [u8; NONCE_LEN],
    /// Poly1305 tag over ciphertext and [`DOMAIN_LABEL`].
    pub tag: [u8; AUTH_TAG_LEN],
}

/// Encrypt `plaintext` under `key` with a fresh random nonce.
pub fn encrypt(plaintext: &[u8], key: &[u8; KEY_LEN]) -> CryptoResult<Sealed> {
    let nonce: [u8; NONCE_LEN] = random_bytes()?;
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    let mut ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: DOMAIN_LABEL,
            },
        )
        .map_err(|e| CryptoError::Cipher(e.to_string()))?;

    // The cipher appends the tag; store it detached.
    let tag_bytes = ciphertext.split_off(ciphertext.len() - AUTH_TAG_LEN);
    let tag: [u8; AUTH_TAG_LEN] = tag_bytes
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::Cipher("unexpected tag length".into()))?;

    Ok(Sealed {
        ciphertext,
        nonce,
        tag,
    })
}

/// Decrypt and authenticate a [`Sealed`] value.
///
/// # Errors
///
/// Returns [`CryptoError::Integrity`] if the tag does not verify (wrong key,
/// tampered ciphertext/nonce/tag, or a different domain label). No plaintext
/// is released in that case.
pub fn decrypt(sealed: &Sealed, key: &[u8; KEY_LEN]) -> CryptoResult<Zeroizing<Vec<u8>>> {
    let mut combined = Vec::with_capacity(sealed.ciphertext.len() + AUTH_TAG_LEN);
    combined.extend_from_slice(&sealed.ciphertext);
    combined.extend_from_slice(&sealed.tag);

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&sealed.nonce),
            Payload {
                msg: &combined,
                aad: DOMAIN_LABEL,
            },
        )
        .map_err(|_| CryptoError::Integrity)?;
    Ok(Zeroizing::new(plaintext))
}
