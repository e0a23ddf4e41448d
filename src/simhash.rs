// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! 128-bit SimHash fingerprinting for near-duplicate rejection (§4.3).
//!
//! Bit-voting over per-token MD5 hashes. Documents with Hamming similarity at
//! or above the configured threshold against any already-accepted document
//! are treated as duplicates.

use md5::{Digest, Md5};
use std::collections::HashMap;

pub const SIMHASH_BITS: usize = 128;

/// A 128-bit fingerprint, stored as the low 128 bits of hash accumulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fingerprint(pub u128);

impl Fingerprint {
    pub fn to_binary_string(self) -> String {
        format!("{:0128b}", self.0)
    }

    pub fn from_binary_string(s: &str) -> Option<Self> {
        if s.len() != SIMHASH_BITS {
            return None;
        }
        u128::from_str_radix(s, 2).ok().map(Fingerprint)
    }

    pub fn hamming_distance(self, other: Fingerprint) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    pub fn similarity(self, other: Fingerprint) -> f64 {
        1.0 - self.hamming_distance(other) as f64 / SIMHASH_BITS as f64
    }
}

/// Low 128 bits of the MD5 digest of `token`.
fn hash_token(token: &str) -> u128 {
    let digest = Md5::digest(token.as_bytes());
    let bytes: [u8; 16] = digest.into();
    u128::from_be_bytes(bytes)
}

/// Compute the SimHash fingerprint of a token sequence.
///
/// For each unique token, its per-bit sign vote is weighted by its occurrence
/// frequency in `tokens`. Identical token multisets always produce identical
/// fingerprints (similarity 1.0 against each other).
pub fn fingerprint(tokens: &[String]) -> Fingerprint {
    let mut freq: HashMap<&str, i64> = HashMap::new();
    for t in tokens {
        *freq.entry(t.as_str()).or_insert(0) += 1;
    }

    let mut bit_sums = [0i64; SIMHASH_BITS];
    for (token, count) in freq {
        let hash = hash_token(token);
        for (i, sum) in bit_sums.iter_mut().enumerate() {
            let bit_set = (hash >> i) & 1 == 1;
            if bit_set {
                *sum += count;
            } else {
                *sum -= count;
            }
        }
    }

    let mut value: u128 = 0;
    for (i, &sum) in bit_sums.iter().enumerate() {
        if sum > 0 {
            value |= 1u128 << i;
        }
    }
    Fingerprint(value)
}

/// Near-duplicate rejection: accepted so far vs. a candidate fingerprint.
pub fn is_near_duplicate(
    candidate: Fingerprint,
    accepted: impl IntoIterator<Item = Fingerprint>,
    threshold: f64,
) -> bool {
    accepted
        .into_iter()
        .any(|existing| candidate.similarity(existing) >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn identical_token_bags_produce_identical_fingerprints() {
        let a = fingerprint(&toks(&["the", "quick", "brown", "fox"]));
        let b = fingerprint(&toks(&["the", "quick", "brown", "fox"]));
        assert_eq!(a, b);
        assert_eq!(a.similarity(b), 1.0);
    }

    #[test]
    fn very_different_documents_have_low_similarity() {
        let a = fingerprint(&toks(&["alpha", "beta", "gamma", "delta"]));
        let b = fingerprint(&toks(&["zephyr", "quasar", "nebula", "photon"]));
        assert!(a.similarity(b) < 0.85);
    }

    #[test]
    fn near_duplicate_detection_respects_threshold() {
        let a = fingerprint(&toks(&["the", "quick", "brown", "fox", "jumps"]));
        let b = fingerprint(&toks(&["the", "quick", "brown", "fox", "leaps"]));
        // one token differs out of five; should be highly similar, not necessarily identical
        assert!(a.similarity(b) > 0.5);
        assert!(is_near_duplicate(a, [a], 0.85));
    }

    #[test]
    fn binary_string_round_trip() {
        let fp = fingerprint(&toks(&["hello", "world"]));
        let s = fp.to_binary_string();
        assert_eq!(s.len(), 128);
        assert_eq!(Fingerprint::from_binary_string(&s), Some(fp));
    }

    #[test]
    fn empty_token_stream_has_zero_fingerprint() {
        let fp = fingerprint(&[]);
        assert_eq!(fp.0, 0);
    }
}
