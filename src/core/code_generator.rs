//! Seed to digit-code mapping.
//!
//! A seed is hashed with SHA-256, each hex byte of the digest is blended with
//! the matching Fibonacci term, and the result is reduced to a decimal digit.
//! Codes that use three or fewer distinct digits get their last digit nudged
//! by a golden-ratio offset, once.

use crate::core::numeric::{fib_residues, golden_ratio};
use crate::domain::model::Code;
use crate::utils::error::{LoreError, Result};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

pub const DEFAULT_CODE_LENGTH: usize = 10;

/// Hex characters produced by one SHA-256 block.
pub const DIGEST_HEX_LEN: usize = 64;

/// Longest code a single digest block can cover.
pub const SINGLE_BLOCK_MAX_LENGTH: usize = DIGEST_HEX_LEN / 2;

/// Extra Fibonacci terms generated beyond the code length.
const FIB_HEADROOM: usize = 5;

/// Codes with this many distinct digits or fewer are nudged.
const UNIFORMITY_THRESHOLD: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestMode {
    /// One SHA-256 block; lengths above 32 are rejected.
    #[default]
    Single,
    /// Append `sha256(seed + "#" + k)` blocks for k = 1, 2, ... as needed.
    Extended,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CodeGenerator {
    mode: DigestMode,
}

impl CodeGenerator {
    pub fn new(mode: DigestMode) -> Self {
        Self { mode }
    }

    pub fn with_digest_extension() -> Self {
        Self::new(DigestMode::Extended)
    }

    pub fn mode(&self) -> DigestMode {
        self.mode
    }

    /// Longest code this generator accepts, `None` when unbounded.
    pub fn max_length(&self) -> Option<usize> {
        match self.mode {
            DigestMode::Single => Some(SINGLE_BLOCK_MAX_LENGTH),
            DigestMode::Extended => None,
        }
    }

    pub fn generate(&self, seed: &str, length: usize) -> Result<Code> {
        let mut digits = self.candidate_digits(seed, length)?;
        if apply_uniformity_guard(&mut digits) {
            tracing::debug!("Uniformity guard nudged last digit of code for seed {:?}", seed);
        }
        Ok(Code::from_digits(&digits))
    }

    /// Digits before the uniformity guard runs.
    pub fn candidate_digits(&self, seed: &str, length: usize) -> Result<Vec<u8>> {
        if seed.is_empty() {
            return Err(LoreError::InvalidSeed {
                reason: "seed cannot be empty".to_string(),
            });
        }
        if length == 0 {
            return Err(LoreError::InvalidLength {
                length,
                reason: "code length must be at least 1".to_string(),
            });
        }

        let digest = self.digest_bytes(seed, length)?;
        tracing::trace!("Digest for seed {:?}: {}", seed, hex::encode(&digest));
        let fibs = fib_residues(length + FIB_HEADROOM, 10);

        // byte i of the digest is the hex pair at offset 2i
        let digits = digest
            .iter()
            .zip(fibs.iter())
            .take(length)
            .map(|(v, fib)| ((u16::from(*v) + u16::from(*fib)) % 10) as u8)
            .collect();
        Ok(digits)
    }

    fn digest_bytes(&self, seed: &str, length: usize) -> Result<Vec<u8>> {
        let mut digest = Sha256::digest(seed.as_bytes()).to_vec();

        match self.mode {
            DigestMode::Single => {
                if digest.len() < length {
                    return Err(LoreError::DigestTooShort {
                        required: length * 2,
                        available: digest.len() * 2,
                    });
                }
            }
            DigestMode::Extended => {
                let mut block = 1usize;
                while digest.len() < length {
                    let salted = format!("{}#{}", seed, block);
                    digest.extend_from_slice(&Sha256::digest(salted.as_bytes()));
                    block += 1;
                }
            }
        }
        Ok(digest)
    }
}

/// `floor(φ · 100) mod 10`
pub fn phi_nudge() -> u8 {
    ((golden_ratio() * 100.0).floor() as u64 % 10) as u8
}

/// Nudges the last digit when the code uses too few distinct digits.
/// Runs once; the nudged code is not re-checked. Returns whether it fired.
pub fn apply_uniformity_guard(digits: &mut [u8]) -> bool {
    let distinct: HashSet<u8> = digits.iter().copied().collect();
    if distinct.len() > UNIFORMITY_THRESHOLD {
        return false;
    }
    match digits.last_mut() {
        Some(last) => {
            *last = (*last + phi_nudge()) % 10;
            true
        }
        None => false,
    }
}

/// Code for `seed` using a single digest block.
pub fn generate_code(seed: &str, length: usize) -> Result<Code> {
    CodeGenerator::default().generate(seed, length)
}
