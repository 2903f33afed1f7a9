//! Deterministic oracle readings and the personality profiles derived from them.
//!
//! Both halves are pure functions: the same `(seed, question, counter)` always
//! yields the same [`Reading`](soul_core::Reading), and the same reading always
//! yields the same [`PersonalityProfile`].

pub mod generator;
pub mod profile;

pub use generator::{generate_reading, reading_digest, verify_reading};
pub use profile::{Element, ElementalAffinity, Intensity, PersonalityProfile, analyze};
