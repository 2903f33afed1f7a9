//! Soul lifecycle engine.
//!
//! Creates souls with CSPRNG seeds, records oracle consultations as an
//! append-only epoch log, audits souls structurally and by replay, computes
//! statistics, and seals souls into password-protected containers.
//!
//! ```no_run
//! use soul_engine::{EngineConfig, Oracle};
//!
//! # fn main() -> soul_core::SoulResult<()> {
//! let oracle = Oracle::new(EngineConfig::default())?;
//! let mut soul = oracle.create_soul("Wanderer")?;
//! let consultation = oracle.consult(&mut soul, "What lies ahead?", None)?;
//! println!("{}", consultation.reading);
//!
//! let container = oracle.export(&soul, "correct horse battery staple")?;
//! let reopened = oracle.import(&container, "correct horse battery staple")?;
//! assert_eq!(reopened, soul);
//! # Ok(())
//! # }
//! ```

/// Engine configuration.
pub mod config;
/// Encrypted, signed soul containers.
pub mod container;
/// The configured entry point.
pub mod facade;
/// The soul aggregate and epochs.
pub mod soul;
/// Aggregate statistics.
pub mod stats;
/// Tracing subscriber setup.
pub mod telemetry;
/// Structural and replay validation.
pub mod validate;

/// Re-export configuration.
pub use config::EngineConfig;
/// Re-export container types.
pub use container::{
    ALGORITHM_ID, ContainerMetadata, FORMAT_VERSION, SecureContainer, create_container,
    open_container,
};
/// Re-export the facade.
pub use facade::Oracle;
/// Re-export soul types.
pub use soul::{Consultation, Epoch, Soul};
/// Re-export statistics.
pub use stats::{SoulStatistics, statistics};
/// Re-export the tracing helper.
pub use telemetry::init_tracing;
/// Re-export validators.
pub use validate::{
    VerificationReport, epoch_issues, verification_report, verification_report_json,
    verify_epoch_structure, verify_replay, verify_soul_structure,
};
