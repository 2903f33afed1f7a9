//! Core types for the soul oracle: readings, archetypes, and secret seeds.
//!
//! This crate defines the vocabulary shared by the reading generator, the
//! profile analyzer, and the soul engine. It performs no I/O and draws no
//! randomness; seeds are built from bytes supplied by the caller.

/// The sixteen fixed archetypes a reading is classified into.
pub mod archetype;
/// Error types used throughout the workspace.
pub mod error;
/// Reading values and the four numeric axes.
pub mod reading;
/// The per-soul 256-bit secret seed.
pub mod seed;

/// Re-export archetype table types.
pub use archetype::{ARCHETYPES, Archetype};
/// Re-export error types.
pub use error::{SoulError, SoulResult};
/// Re-export reading types.
pub use reading::{AXIS_MAX, AXIS_MIN, Axis, PROOF_FRAGMENT_LEN, Reading};
/// Re-export seed types.
pub use seed::{SEED_BYTES, SEED_HEX_LEN, SecretSeed, is_valid_seed_hex};
