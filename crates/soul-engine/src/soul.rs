//! The soul aggregate and its epoch log.
//!
//! A [`Soul`] is an owned value with an append-only history. The only way to
//! change one after creation is [`Soul::consult`], which borrows it mutably,
//! appends an [`Epoch`], and hands back copies of what was produced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zeroize::Zeroizing;

use soul_core::{Reading, SEED_BYTES, SecretSeed, SoulError, SoulResult};
use soul_crypto::random_bytes;
use soul_oracle::{PersonalityProfile, analyze, generate_reading};

/// One oracle consultation recorded on a soul.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epoch {
    /// Counter fed to the reading generator. Strictly increasing within a soul.
    pub sequence_number: u64,
    /// The question as asked.
    pub question: String,
    /// When the consultation happened.
    pub timestamp: DateTime<Utc>,
    /// The resulting reading.
    pub reading: Reading,
}

/// Everything produced by a single [`Soul::consult`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consultation {
    /// The epoch appended to the soul.
    pub epoch: Epoch,
    /// The reading (same as `epoch.reading`).
    pub reading: Reading,
    /// The profile derived from the reading.
    pub profile: PersonalityProfile,
}

/// An identity record: a secret seed plus its consultation history.
///
/// Serialization is canonical: fields are written in declaration order, and
/// the seed travels in plaintext, so serialized souls belong inside
/// encrypted containers only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Soul {
    name: String,
    secret_seed: SecretSeed,
    created_at: DateTime<Utc>,
    last_epoch_at: Option<DateTime<Utc>>,
    epochs: Vec<Epoch>,
}

impl Soul {
    /// Create a soul with a fresh seed from the OS CSPRNG.
    pub fn new(name: &str) -> SoulResult<Self> {
        if name.trim().is_empty() {
            return Err(SoulError::invalid("soul name must not be empty"));
        }
        let bytes = Zeroizing::new(random_bytes::<SEED_BYTES>()?);
        let soul = Self {
            name: name.to_string(),
            secret_seed: SecretSeed::from_bytes(&bytes),
            created_at: Utc::now(),
            last_epoch_at: None,
            epochs: Vec::new(),
        };
        info!(soul = %soul.name, "created soul");
        Ok(soul)
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The secret seed.
    pub fn secret_seed(&self) -> &SecretSeed {
        &self.secret_seed
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the most recent epoch, if any.
    pub fn last_epoch_at(&self) -> Option<DateTime<Utc>> {
        self.last_epoch_at
    }

    /// Epochs in chronological order.
    pub fn epochs(&self) -> &[Epoch] {
        &self.epochs
    }

    /// Number of recorded epochs.
    pub fn epoch_count(&self) -> usize {
        self.epochs.len()
    }

    /// Sequence number of the latest epoch, or 0 for a fresh soul.
    pub fn last_sequence_number(&self) -> u64 {
        self.epochs.last().map_or(0, |e| e.sequence_number)
    }

    /// Consult the oracle and append the resulting epoch.
    ///
    /// `counter` defaults to the last sequence number plus one. An explicit
    /// counter must be strictly greater than the last one recorded.
    pub fn consult(&mut self, question: &str, counter: Option<u64>) -> SoulResult<Consultation> {
        let last = self.last_sequence_number();
        let sequence_number = match counter {
            Some(n) if n <= last => {
                return Err(SoulError::invalid(format!(
                    "sequence number {n} must be greater than {last}"
                )));
            }
            Some(n) => n,
            None => last
                .checked_add(1)
                .ok_or_else(|| SoulError::invalid("sequence numbers exhausted"))?,
        };

        let seed = self.secret_seed.expose_secret();
        let reading = generate_reading(question, seed, sequence_number)?;
        let profile = analyze(&reading);

        // Keep the log chronological even if the wall clock steps backwards.
        let floor = self.last_epoch_at.unwrap_or(self.created_at);
        let timestamp = Utc::now().max(floor);

        let epoch = Epoch {
            sequence_number,
            question: question.to_string(),
            timestamp,
            reading: reading.clone(),
        };
        self.epochs.push(epoch.clone());
        self.last_epoch_at = Some(timestamp);

        debug!(
            soul = %self.name,
            sequence_number,
            pattern = %reading.pattern,
            "recorded epoch"
        );
        Ok(Consultation {
            epoch,
            reading,
            profile,
        })
    }

    /// Canonical JSON encoding. Contains the seed; wiped when dropped.
    pub fn to_canonical_json(&self) -> SoulResult<Zeroizing<Vec<u8>>> {
        serde_json::to_vec(self)
            .map(Zeroizing::new)
            .map_err(|e| SoulError::structural(format!("cannot serialize soul: {e}")))
    }

    /// Decode a soul from JSON. Shape is checked; contents are not validated.
    pub fn from_json(bytes: &[u8]) -> SoulResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| SoulError::structural(format!("malformed soul document: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_soul_is_empty() {
        let soul = Soul::new("Test Soul").unwrap();
        assert_eq!(soul.name(), "Test Soul");
        assert!(soul.secret_seed().is_well_formed());
        assert!(soul.epochs().is_empty());
        assert_eq!(soul.last_epoch_at(), None);
        assert_eq!(soul.last_sequence_number(), 0);
    }

    #[test]
    fn blank_name_rejected() {
        for name in ["", "  ", "\n"] {
            assert!(matches!(Soul::new(name), Err(SoulError::InvalidInput(_))));
        }
    }

    #[test]
    fn seeds_are_independent_of_name() {
        let a = Soul::new("Twin").unwrap();
        let b = Soul::new("Twin").unwrap();
        assert_ne!(a.secret_seed(), b.secret_seed());
    }

    #[test]
    fn consult_appends_epochs() {
        let mut soul = Soul::new("Test Soul").unwrap();
        let first = soul.consult("Q1", None).unwrap();
        let second = soul.consult("Q2", None).unwrap();
        assert_eq!(first.epoch.sequence_number, 1);
        assert_eq!(second.epoch.sequence_number, 2);
        assert_eq!(soul.epoch_count(), 2);
        assert_eq!(soul.last_epoch_at(), Some(second.epoch.timestamp));
        assert_eq!(first.reading, first.epoch.reading);
        assert_eq!(soul.epochs()[1], second.epoch);
        assert!(second.epoch.timestamp >= first.epoch.timestamp);
    }

    #[test]
    fn consult_uses_the_soul_seed() {
        let mut soul = Soul::new("Seeded").unwrap();
        let c = soul.consult("What now?", Some(5)).unwrap();
        let expected =
            generate_reading("What now?", soul.secret_seed().expose_secret(), 5).unwrap();
        assert_eq!(c.reading, expected);
        assert_eq!(c.profile, analyze(&expected));
    }

    #[test]
    fn explicit_counter_must_increase() {
        let mut soul = Soul::new("Strict").unwrap();
        soul.consult("first", Some(3)).unwrap();
        assert!(matches!(
            soul.consult("again", Some(3)),
            Err(SoulError::InvalidInput(_))
        ));
        assert!(matches!(
            soul.consult("back", Some(2)),
            Err(SoulError::InvalidInput(_))
        ));
        assert_eq!(soul.consult("next", None).unwrap().epoch.sequence_number, 4);
        assert_eq!(soul.epoch_count(), 2);
    }

    #[test]
    fn zero_counter_rejected() {
        let mut soul = Soul::new("Zero").unwrap();
        assert!(matches!(
            soul.consult("q", Some(0)),
            Err(SoulError::InvalidInput(_))
        ));
        assert!(soul.epochs().is_empty());
    }

    #[test]
    fn blank_question_leaves_soul_untouched() {
        let mut soul = Soul::new("Quiet").unwrap();
        assert!(matches!(
            soul.consult("   ", None),
            Err(SoulError::InvalidInput(_))
        ));
        assert!(soul.epochs().is_empty());
        assert_eq!(soul.last_epoch_at(), None);
    }

    #[test]
    fn canonical_json_roundtrip() {
        let mut soul = Soul::new("Round Trip").unwrap();
        soul.consult("Q1", None).unwrap();
        let bytes = soul.to_canonical_json().unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.starts_with(r#"{"name":"Round Trip","secret_seed":""#));
        let back = Soul::from_json(&bytes).unwrap();
        assert_eq!(back, soul);
        assert_eq!(back.to_canonical_json().unwrap(), bytes);
    }

    #[test]
    fn malformed_document_is_structural() {
        let err = Soul::from_json(br#"{"name": "x"}"#).unwrap_err();
        assert!(matches!(err, SoulError::Structural(_)));
    }

    #[test]
    fn debug_output_hides_seed() {
        let soul = Soul::new("Hidden").unwrap();
        let dbg = format!("{soul:?}");
        assert!(!dbg.contains(soul.secret_seed().expose_secret()));
    }
}
