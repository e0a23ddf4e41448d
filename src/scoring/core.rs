// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scorer (P8, §4.6): TF·IDF over a single range shard.
//!
//! Each shard is scored independently once the global document count `N` is
//! known; the shard's own posting lists give `df` directly, so no
//! cross-shard coordination is needed.

use crate::types::{DocId, Document, Posting};
use std::collections::HashMap;

/// Mutate `tf_idf` in place for every posting in `shard`. `N` is the global
/// accepted-document count; `documents` supplies each doc's `token_count`.
pub fn score_shard(shard: &mut HashMap<String, Vec<Posting>>, documents: &HashMap<DocId, Document>, n: usize) {
    for postings in shard.values_mut() {
        let df = postings.len();
        if df == 0 || n == 0 {
            continue;
        }
        let idf = (n as f64 / df as f64).log10();

        for posting in postings.iter_mut() {
            let token_count = documents.get(&posting.doc_id).map_or(0, |d| d.token_count);
            let tf = if token_count == 0 {
                0.0
            } else {
                posting.frequency as f64 / token_count as f64
            };
            let weighted_tf = tf * (1.0 + posting.importance);
            posting.tf_idf = weighted_tf * idf;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(token_count: usize) -> Document {
        Document {
            url: "https://example.com".to_string(),
            simhash: "0".repeat(128),
            token_count,
            outgoing_links: vec![],
        }
    }

    #[test]
    fn tf_idf_matches_the_spec_formula() {
        let mut shard = HashMap::new();
        let mut p = Posting::new(0);
        p.frequency = 2;
        p.importance = 1.0;
        shard.insert("rust".to_string(), vec![p]);

        let mut documents = HashMap::new();
        documents.insert(0, doc(4));

        score_shard(&mut shard, &documents, 10);

        let tf = 2.0 / 4.0;
        let weighted_tf = tf * (1.0 + 1.0);
        let idf = (10.0_f64 / 1.0).log10();
        let expected = weighted_tf * idf;
        assert!((shard["rust"][0].tf_idf - expected).abs() < 1e-12);
    }

    #[test]
    fn zero_token_count_gives_zero_tf() {
        let mut shard = HashMap::new();
        shard.insert("rust".to_string(), vec![Posting::new(0)]);
        let mut documents = HashMap::new();
        documents.insert(0, doc(0));

        score_shard(&mut shard, &documents, 5);
        assert_eq!(shard["rust"][0].tf_idf, 0.0);
    }

    #[test]
    fn higher_document_frequency_lowers_idf() {
        let mut shard = HashMap::new();
        let mut p0 = Posting::new(0);
        p0.frequency = 1;
        let mut p1 = Posting::new(1);
        p1.frequency = 1;
        shard.insert("common".to_string(), vec![p0, p1]);

        let mut documents = HashMap::new();
        documents.insert(0, doc(1));
        documents.insert(1, doc(1));

        score_shard(&mut shard, &documents, 2);
        // df == N means idf == 0
        assert_eq!(shard["common"][0].tf_idf, 0.0);
    }
}
