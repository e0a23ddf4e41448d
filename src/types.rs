// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Core data types shared across the ingestion, build, and query layers.
//!
//! Everything here is a plain data carrier. The interesting behavior lives in
//! the modules that operate on these types (`tokenizer`, `html`, `simhash`,
//! `build`, `search`).

use serde::{Deserialize, Serialize};

/// Dense document handle assigned in ingestion order. Opaque past assignment:
/// downstream code never relies on any particular doc_id ordering across workers.
pub type DocId = usize;

/// A single crawled page as read from the corpus directory.
///
/// Matches the external interface in the specification's input contract: one
/// JSON file per page, `{url, content, encoding}`.
#[derive(Deserialize, Clone, Debug)]
pub struct InputRecord {
    pub url: String,
    pub content: String,
    pub encoding: String,
}

/// Metadata retained for every accepted (non-duplicate) document.
///
/// `token_count` is set once at ingestion and never mutated afterward.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Document {
    pub url: String,
    pub simhash: String,
    pub token_count: usize,
    pub outgoing_links: Vec<String>,
}

/// One occurrence record for a (term, document) pair.
///
/// Invariant: `positions.len() == frequency` and `positions` is strictly
/// non-decreasing. At most one `Posting` exists per (term, doc_id).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Posting {
    pub doc_id: DocId,
    pub frequency: u32,
    pub importance: f64,
    pub tf_idf: f64,
    pub positions: Vec<u32>,
}

impl Posting {
    pub fn new(doc_id: DocId) -> Self {
        Posting {
            doc_id,
            frequency: 0,
            importance: 0.0,
            tf_idf: 0.0,
            positions: Vec::new(),
        }
    }

    /// Record one token occurrence at `position`, accumulating `importance`.
    pub fn record_occurrence(&mut self, position: u32, importance: f64) {
        self.positions.push(position);
        self.frequency += 1;
        self.importance += importance;
    }
}

/// Tag weights applied during weighted-text extraction (§4.2).
pub const TAG_WEIGHTS: &[(&str, f64)] = &[
    ("title", 2.0),
    ("h1", 1.5),
    ("h2", 1.0),
    ("h3", 0.75),
    ("b", 0.5),
    ("strong", 0.5),
];

/// Ranking weights applied by the query engine (§4.9 step 6).
#[derive(Clone, Copy, Debug)]
pub struct RankingWeights {
    pub tfidf: f64,
    pub cosine: f64,
    pub coverage: f64,
    pub authority: f64,
    pub hub: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        RankingWeights {
            tfidf: 0.15,
            cosine: 0.15,
            coverage: 0.40,
            authority: 0.15,
            hub: 0.15,
        }
    }
}

/// Top-level tunables named in the specification's Configuration table (§6).
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct IndexerConfig {
    pub similarity_threshold: f64,
    pub max_index_size: u64,
    pub simhash_bits: usize,
    pub hits_max_iterations: usize,
    pub hits_threshold: f64,
    pub pagerank_damping: f64,
    pub pagerank_iterations: usize,
    pub pagerank_threshold: f64,
    pub ranking_weights: (f64, f64, f64, f64, f64),
    pub workers: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        IndexerConfig {
            similarity_threshold: 0.85,
            max_index_size: 32 * 1024 * 1024,
            simhash_bits: 128,
            hits_max_iterations: 20,
            hits_threshold: 1e-4,
            pagerank_damping: 0.85,
            pagerank_iterations: 100,
            pagerank_threshold: 1e-4,
            ranking_weights: (0.15, 0.15, 0.40, 0.15, 0.15),
            workers: default_workers(),
        }
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl IndexerConfig {
    /// Load from a TOML file, falling back to defaults for absent fields, then validate.
    pub fn from_toml_str(s: &str) -> Result<Self, String> {
        let config: IndexerConfig =
            toml::from_str(s).map_err(|e| format!("invalid config TOML: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(format!(
                "similarity_threshold must be in [0,1], got {}",
                self.similarity_threshold
            ));
        }
        if self.max_index_size == 0 {
            return Err("max_index_size must be > 0".to_string());
        }
        if self.workers < 1 {
            return Err("workers must be >= 1".to_string());
        }
        Ok(())
    }

    pub fn ranking_weights(&self) -> RankingWeights {
        let (tfidf, cosine, coverage, authority, hub) = self.ranking_weights;
        RankingWeights {
            tfidf,
            cosine,
            coverage,
            authority,
            hub,
        }
    }
}

/// Alphabet bucket a term is routed to during range partitioning (§4.5, §6).
///
/// 26 individual letters plus `misc` for anything that doesn't start with
/// `a`-`z` (including the empty string, which cannot occur for a real term
/// but is handled defensively).
pub fn bucket_for_term(term: &str) -> &'static str {
    const LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";
    match term.chars().next() {
        Some(c) if c.is_ascii_lowercase() => {
            let idx = (c as u8 - b'a') as usize;
            &LETTERS[idx..idx + 1]
        }
        _ => "misc",
    }
}

pub const ALPHABET_BUCKETS: &[&str] = &[
    "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s",
    "t", "u", "v", "w", "x", "y", "z", "misc",
];
