// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Token extraction, stop-word filtering, and Porter stemming.
//!
//! One pipeline serves both the ingestion path (index mode: stop words kept,
//! since stemming already collapses most low-value forms) and the query path
//! (query mode: stop words dropped, matching the reference stop-word list).

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Whether stop words are stripped from the token stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Index,
    Query,
}

fn stemmer() -> &'static Stemmer {
    static STEMMER: OnceLock<Stemmer> = OnceLock::new();
    STEMMER.get_or_init(|| Stemmer::create(Algorithm::English))
}

fn stop_words() -> &'static HashSet<&'static str> {
    static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STOP_WORDS.get_or_init(|| STOP_WORD_LIST.iter().copied().collect())
}

/// Tokenize `text` according to §4.1: lowercase, extract `[a-zA-Z0-9]+` runs,
/// optionally drop stop words, stem, drop single-character tokens.
///
/// Order is preserved — callers that need position information index directly
/// into the returned `Vec`.
pub fn tokenize(text: &str, mode: Mode) -> Vec<String> {
    let lower = text.to_lowercase();
    let stemmer = stemmer();
    let stops = stop_words();

    raw_runs(&lower)
        .filter(|tok| mode != Mode::Query || !stops.contains(tok))
        .map(|tok| stemmer.stem(tok).into_owned())
        .filter(|tok| tok.chars().count() > 1)
        .collect()
}

/// Maximal runs of ASCII letters/digits, in occurrence order.
fn raw_runs(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
}

/// The ~160-word stop-word list, matched exactly against the reference
/// implementation's table for reproducibility.
pub const STOP_WORD_LIST: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't", "do",
    "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few", "for",
    "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't", "having", "he",
    "her", "here", "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "i",
    "i'm", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "let's", "me",
    "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of", "off", "on", "once",
    "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over", "own", "same",
    "shan't", "she", "she'd", "she'll", "she's", "should", "shouldn't", "so", "some", "such",
    "than", "that", "that's", "the", "their", "theirs", "them", "themselves", "then", "there",
    "there's", "these", "they", "they'd", "they'll", "they're", "they've", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "wasn't", "we", "we'd",
    "we'll", "we're", "we've", "were", "weren't", "what", "what's", "when", "when's", "where",
    "where's", "which", "while", "who", "who's", "whom", "why", "why's", "with", "won't",
    "would", "wouldn't", "you", "you'd", "you'll", "you're", "you've", "your", "yours",
    "yourself", "yourselves",
];
