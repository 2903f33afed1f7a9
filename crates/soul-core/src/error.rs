/// Alias for `Result<T, SoulError>`.
pub type SoulResult<T> = Result<T, SoulError>;

/// Errors that can occur while generating, validating, or protecting souls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SoulError {
    /// A malformed or out-of-range argument. Fixing the call fixes the error.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Authentication, signature, or digest mismatch.
    ///
    /// Deliberately carries no detail about which check failed.
    #[error("cannot open: wrong password or corrupted data")]
    Integrity,

    /// A soul, epoch, reading, or container failed shape validation.
    #[error("structural error: {0}")]
    Structural(String),

    /// The cryptographic backend failed (e.g. the OS random source).
    #[error("crypto backend failure: {0}")]
    Crypto(String),
}

impl SoulError {
    /// Shorthand for [`SoulError::InvalidInput`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Shorthand for [`SoulError::Structural`].
    pub fn structural(msg: impl Into<String>) -> Self {
        Self::Structural(msg.into())
    }

    /// Whether this error signals tampering, a wrong password, or corruption.
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrity_message_is_generic() {
        let msg = SoulError::Integrity.to_string();
        assert_eq!(msg, "cannot open: wrong password or corrupted data");
        assert!(!msg.contains("signature"));
        assert!(!msg.contains("hash"));
    }

    #[test]
    fn helpers_build_variants() {
        assert_eq!(
            SoulError::invalid("empty name"),
            SoulError::InvalidInput("empty name".to_string())
        );
        assert!(SoulError::Integrity.is_integrity());
        assert!(!SoulError::structural("x").is_integrity());
    }
}
