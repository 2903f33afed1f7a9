/// Alias for `Result<T, CryptoError>`.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors from key derivation, encryption, and authentication.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    /// A malformed argument: wrong salt length, empty password, bad parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An authentication tag, MAC, or digest did not verify.
    #[error("integrity check failed")]
    Integrity,

    /// The OS random source failed.
    #[error("random source unavailable: {0}")]
    Random(String),

    /// The KDF backend rejected otherwise validated input.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// The cipher failed while encrypting.
    #[error("encryption failed: {0}")]
    Cipher(String),
}

impl From<CryptoError> for soul_core::SoulError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidInput(msg) => Self::InvalidInput(msg),
            CryptoError::Integrity => Self::Integrity,
            other => Self::Crypto(other.to_string()),
        }
    }
}
