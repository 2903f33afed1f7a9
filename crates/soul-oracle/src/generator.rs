//! Reading generator.
//!
//! Builds a length-prefixed byte string from the seed, question, and counter,
//! hashes it with SHA-256, and slices the digest into the reading's fields:
//!
//! | digest bytes | field                       |
//! |--------------|-----------------------------|
//! | 0-1          | resonance (`u16 % 100 + 1`) |
//! | 2-3          | clarity                     |
//! | 4-5          | flux                        |
//! | 6-7          | emergence                   |
//! | 8            | archetype index (`% 16`)    |
//! | 0-7          | proof fragment (hex)        |

use sha2::{Digest, Sha256};

use soul_core::{ARCHETYPES, PROOF_FRAGMENT_LEN, Reading, SoulError, SoulResult, is_valid_seed_hex};

/// Domain tag prepended to every reading input.
pub const READING_DOMAIN_TAG: &[u8] = b"soul-oracle/reading/v1";

/// Generate the reading for one consultation.
///
/// Fails with [`SoulError::InvalidInput`] if the question is blank, the seed
/// is not 64 lowercase hex characters, or the counter is zero.
pub fn generate_reading(question: &str, seed: &str, counter: u64) -> SoulResult<Reading> {
    let digest = reading_digest(question, seed, counter)?;
    Ok(reading_from_digest(&digest))
}

/// Recompute a reading and compare it with one previously produced.
pub fn verify_reading(
    question: &str,
    seed: &str,
    counter: u64,
    reading: &Reading,
) -> SoulResult<bool> {
    Ok(generate_reading(question, seed, counter)? == *reading)
}

/// SHA-256 of the canonical input, after validating the arguments.
pub fn reading_digest(question: &str, seed: &str, counter: u64) -> SoulResult<[u8; 32]> {
    if question.trim().is_empty() {
        return Err(SoulError::invalid("question must not be empty"));
    }
    if !is_valid_seed_hex(seed) {
        return Err(SoulError::invalid(
            "seed must be 64 lowercase hex characters",
        ));
    }
    if counter < 1 {
        return Err(SoulError::invalid("counter must be at least 1"));
    }
    let digest = Sha256::digest(canonical_input(question, seed, counter));
    Ok(digest.into())
}

/// Length-prefixed encoding of the reading input.
///
/// Every variable-length field carries a big-endian `u32` length, and the
/// counter is a fixed-width big-endian `u64`, so no two distinct inputs share
/// an encoding.
pub fn canonical_input(question: &str, seed: &str, counter: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(READING_DOMAIN_TAG.len() + seed.len() + question.len() + 20);
    push_field(&mut buf, READING_DOMAIN_TAG);
    push_field(&mut buf, seed.as_bytes());
    push_field(&mut buf, question.as_bytes());
    buf.extend_from_slice(&counter.to_be_bytes());
    buf
}

fn push_field(buf: &mut Vec<u8>, field: &[u8]) {
    // Questions are bounded far below 4 GiB by callers; saturate rather than wrap.
    let len = u32::try_from(field.len()).unwrap_or(u32::MAX);
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(field);
}

fn reading_from_digest(digest: &[u8; 32]) -> Reading {
    let archetype = &ARCHETYPES[usize::from(digest[8]) % ARCHETYPES.len()];
    Reading {
        resonance: axis_window(digest, 0),
        clarity: axis_window(digest, 2),
        flux: axis_window(digest, 4),
        emergence: axis_window(digest, 6),
        pattern: archetype.name.to_string(),
        message: archetype.message.to_string(),
        proof_fragment: hex::encode(&digest[..PROOF_FRAGMENT_LEN / 2]),
    }
}

fn axis_window(digest: &[u8; 32], offset: usize) -> u8 {
    let window = u16::from_be_bytes([digest[offset], digest[offset + 1]]);
    // Always in 1..=100.
    (window % 100 + 1) as u8
}
