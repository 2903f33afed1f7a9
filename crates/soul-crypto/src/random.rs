use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::error::{CryptoError, CryptoResult};

/// Fill an `N`-byte array from the operating system's CSPRNG.
///
/// Used for secret seeds, salts, and nonces. A failing OS source is reported
/// rather than papered over with a weaker generator.
pub fn random_bytes<const N: usize>() -> CryptoResult<[u8; N]> {
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::Random(e.to_string()))?;
    Ok(bytes)
}
