use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::{CryptoError, CryptoResult};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 tag length (32 bytes).
pub const MAC_LEN: usize = 32;

/// SHA-256 digest length (32 bytes).
pub const DIGEST_LEN: usize = 32;

/// Compute an HMAC-SHA256 tag over `data`.
///
/// This is a symmetric integrity tag: anyone holding `key` can produce it, so
/// it proves the data was not altered, not who authored it.
pub fn sign(data: &[u8], key: &[u8]) -> CryptoResult<[u8; MAC_LEN]> {
    if key.is_empty() {
        return Err(CryptoError::InvalidInput(
            "MAC key must not be empty".into(),
        ));
    }
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| CryptoError::InvalidInput(format!("MAC key rejected: {e}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

/// Check an HMAC-SHA256 tag in constant time. Any error counts as a mismatch.
pub fn verify(data: &[u8], tag: &[u8], key: &[u8]) -> bool {
    match sign(data, key) {
        Ok(expected) => constant_time_eq(&expected, tag),
        Err(_) => false,
    }
}

/// SHA-256 digest of `data`.
pub fn hash(data: &[u8]) -> [u8; DIGEST_LEN] {
    Sha256::digest(data).into()
}

/// Check `data` against a previously computed digest in constant time.
pub fn verify_integrity(data: &[u8], digest: &[u8]) -> bool {
    constant_time_eq(&hash(data), digest)
}

/// Constant-time equality of two byte slices.
///
/// Only the length comparison short-circuits; lengths are not secret here.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn rfc4231_case_2() {
        let tag = sign(b"what do ya want for nothing?", b"Jefe").unwrap();
        assert_eq!(
            hex::encode(tag),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn sha256_of_abc() {
        assert_eq!(
            hex::encode(hash(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sign_then_verify() {
        let tag = sign(b"payload", KEY).unwrap();
        assert!(verify(b"payload", &tag, KEY));
        assert!(!verify(b"payload!", &tag, KEY));
        assert!(!verify(b"payload", &tag, b"another key"));
        assert!(!verify(b"payload", &tag[..31], KEY));
    }

    #[test]
    fn empty_key_rejected() {
        assert!(matches!(sign(b"x", b""), Err(CryptoError::InvalidInput(_))));
        assert!(!verify(b"x", &[0u8; MAC_LEN], b""));
    }

    #[test]
    fn integrity_check() {
        let digest = hash(b"soul");
        assert!(verify_integrity(b"soul", &digest));
        assert!(!verify_integrity(b"Soul", &digest));
        assert!(!verify_integrity(b"soul", &digest[..16]));
    }

    #[test]
    fn constant_time_eq_basics() {
        assert!(constant_time_eq(b"", b""));
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }

    proptest! {
        #[test]
        fn flipped_tag_bit_never_verifies(
            data in prop::collection::vec(any::<u8>(), 0..256),
            byte in 0usize..MAC_LEN,
            bit in 0u8..8,
        ) {
            let mut tag = sign(&data, KEY).unwrap();
            tag[byte] ^= 1 << bit;
            prop_assert!(!verify(&data, &tag, KEY));
        }
    }
}
