// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! PostingBuilder (P5, §4.4): per-document term frequency/importance/positions.

use crate::tokenizer::{tokenize, Mode};
use crate::types::{DocId, Posting};
use std::collections::HashMap;

/// Build one document's term -> Posting mapping from its extracted body text
/// and weighted-tag text map. Returns the mapping and the document's
/// token_count (`|B|`, the body-token count only, per §4.4 step 6).
pub fn build_postings(
    doc_id: DocId,
    body_text: &str,
    weighted_text: &HashMap<String, f64>,
) -> (HashMap<String, Posting>, usize) {
    let body_tokens = tokenize(body_text, Mode::Index);
    let token_count = body_tokens.len();

    let mut postings: HashMap<String, Posting> = HashMap::new();

    for (position, token) in body_tokens.iter().enumerate() {
        postings
            .entry(token.clone())
            .or_insert_with(|| Posting::new(doc_id))
            .record_occurrence(position as u32, 0.0);
    }

    let mut offset = token_count;
    for (text, &weight) in weighted_text {
        let tag_tokens = tokenize(text, Mode::Index);
        for (i, token) in tag_tokens.iter().enumerate() {
            postings
                .entry(token.clone())
                .or_insert_with(|| Posting::new(doc_id))
                .record_occurrence((offset + i) as u32, weight);
        }
        offset += tag_tokens.len();
    }

    (postings, token_count)
}
