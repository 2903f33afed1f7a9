//! Single entry point for callers that hold an [`EngineConfig`].
//!
//! `Oracle` owns no souls. Each method takes the soul it works on, so callers
//! keep exclusive ownership and can process independent souls concurrently.

use tracing::debug;

use soul_core::{SoulError, SoulResult};

use crate::config::EngineConfig;
use crate::container::{SecureContainer, create_container, open_container};
use crate::soul::{Consultation, Soul};
use crate::stats::{SoulStatistics, statistics};
use crate::validate::{VerificationReport, verify_replay};

/// Configured front door to the soul engine.
#[derive(Debug, Clone, Default)]
pub struct Oracle {
    config: EngineConfig,
}

impl Oracle {
    /// Create an oracle after validating its configuration.
    pub fn new(config: EngineConfig) -> SoulResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Create a soul, enforcing the configured name limit.
    pub fn create_soul(&self, name: &str) -> SoulResult<Soul> {
        check_len("soul name", name, self.config.max_name_len)?;
        Soul::new(name)
    }

    /// Consult the oracle on behalf of `soul`, enforcing the question limit.
    pub fn consult(
        &self,
        soul: &mut Soul,
        question: &str,
        counter: Option<u64>,
    ) -> SoulResult<Consultation> {
        check_len("question", question, self.config.max_question_len)?;
        soul.consult(question, counter)
    }

    /// Seal a soul with the configured KDF parameters.
    pub fn export(&self, soul: &Soul, password: &str) -> SoulResult<SecureContainer> {
        create_container(soul, password, &self.config.kdf)
    }

    /// Open a container. Its own KDF parameters are used, not the configured ones.
    pub fn import(&self, container: &SecureContainer, password: &str) -> SoulResult<Soul> {
        open_container(container, password)
    }

    /// Full audit: structure plus replay of every reading.
    pub fn verify(&self, soul: &Soul) -> VerificationReport {
        let report = verify_replay(soul);
        debug!(
            soul = %soul.name(),
            valid = report.is_valid(),
            issues = report.issues.len(),
            "verified soul"
        );
        report
    }

    /// Aggregate statistics, `None` for a soul with no epochs.
    pub fn statistics(&self, soul: &Soul) -> Option<SoulStatistics> {
        statistics(soul)
    }
}

fn check_len(what: &str, value: &str, max: usize) -> SoulResult<()> {
    if value.len() > max {
        return Err(SoulError::invalid(format!(
            "{what} is {} bytes, limit is {max}",
            value.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use soul_crypto::KdfParams;

    fn oracle() -> Oracle {
        Oracle::new(
            EngineConfig::default()
                .with_kdf(KdfParams::MINIMUM)
                .with_max_name_len(16)
                .with_max_question_len(32),
        )
        .unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = EngineConfig::default().with_kdf(KdfParams::MINIMUM.with_iterations(0));
        assert!(matches!(
            Oracle::new(config),
            Err(SoulError::InvalidInput(_))
        ));
    }

    #[test]
    fn default_oracle_uses_default_config() {
        assert_eq!(Oracle::default().config(), &EngineConfig::default());
    }

    #[test]
    fn enforces_length_limits() {
        let oracle = oracle();
        assert!(matches!(
            oracle.create_soul("A name far too long"),
            Err(SoulError::InvalidInput(_))
        ));
        let mut soul = oracle.create_soul("Short").unwrap();
        let long_question = "why".repeat(11);
        assert!(matches!(
            oracle.consult(&mut soul, &long_question, None),
            Err(SoulError::InvalidInput(_))
        ));
        assert!(soul.epochs().is_empty());
        assert!(oracle.consult(&mut soul, "why?", None).is_ok());
    }

    #[test]
    fn full_lifecycle() {
        let oracle = oracle();
        let mut soul = oracle.create_soul("Lifecycle").unwrap();
        assert_eq!(oracle.statistics(&soul), None);
        oracle.consult(&mut soul, "First", None).unwrap();
        oracle.consult(&mut soul, "Second", Some(5)).unwrap();
        assert!(oracle.verify(&soul).is_valid());

        let container = oracle.export(&soul, "hunter2").unwrap();
        assert_eq!(container.kdf, KdfParams::MINIMUM);
        let opened = oracle.import(&container, "hunter2").unwrap();
        assert_eq!(opened, soul);
        assert_eq!(oracle.statistics(&opened).unwrap().total_epochs, 2);
    }
}
