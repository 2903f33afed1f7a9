//! Configuration for the soul engine.

use serde::{Deserialize, Serialize};

use soul_core::{SoulError, SoulResult};
use soul_crypto::KdfParams;

/// Engine configuration.
///
/// Deserializes from partial JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Key derivation cost for newly exported containers.
    pub kdf: KdfParams,
    /// Longest accepted soul name, in bytes.
    pub max_name_len: usize,
    /// Longest accepted question, in bytes.
    pub max_question_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kdf: KdfParams::default(),
            max_name_len: 256,
            max_question_len: 4096,
        }
    }
}

impl EngineConfig {
    /// Set the key derivation parameters.
    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    /// Set the maximum soul name length (at least 1).
    pub fn with_max_name_len(mut self, len: usize) -> Self {
        self.max_name_len = len.max(1);
        self
    }

    /// Set the maximum question length (at least 1).
    pub fn with_max_question_len(mut self, len: usize) -> Self {
        self.max_question_len = len.max(1);
        self
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> SoulResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SoulError::invalid(format!("invalid engine config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every setting is usable.
    pub fn validate(&self) -> SoulResult<()> {
        self.kdf.validate()?;
        if self.max_name_len == 0 || self.max_question_len == 0 {
            return Err(SoulError::invalid("length limits must be at least 1"));
        }
        Ok(())
    }
}
