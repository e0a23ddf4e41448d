// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! QueryEngine (P11, §4.9): seek-load postings for a query's terms, rank the
//! documents they touch, and return the top k.

use crate::binary::{read_header, read_record_at};
use crate::linkanalysis::{self, LinkScores};
use crate::tokenizer::{tokenize, Mode};
use crate::types::{DocId, Document, RankingWeights};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Mutex;

/// One ranked hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub url: String,
    pub score: f64,
    pub matched_terms: Vec<String>,
}

/// Loaded index artifacts, ready to serve queries (the "ready" state of the
/// §4.9 state machine; there is no separate "uninitialized" value in this API
/// since `open` either succeeds fully or fails).
pub struct QueryEngine {
    documents: HashMap<DocId, Document>,
    link_scores: LinkScores,
    seek_map: HashMap<String, u64>,
    index_file: Mutex<File>,
    weights: RankingWeights,
}

impl QueryEngine {
    /// Load document metadata, the seek map, and link scores from
    /// `index_dir`, opening the binary index file for later random-access
    /// reads. Link scores are computed and persisted on first use if absent.
    pub fn open(index_dir: &Path, weights: RankingWeights, config: &crate::types::IndexerConfig) -> Result<Self, String> {
        let documents_path = index_dir.join("documents.json");
        let documents_bytes = std::fs::read(&documents_path)
            .map_err(|e| format!("failed to read {}: {e}", documents_path.display()))?;
        let raw: HashMap<String, Document> = serde_json::from_slice(&documents_bytes)
            .map_err(|e| format!("failed to decode {}: {e}", documents_path.display()))?;
        let documents: HashMap<DocId, Document> = raw
            .into_iter()
            .map(|(id, doc)| {
                id.parse::<DocId>()
                    .map(|id| (id, doc))
                    .map_err(|e| format!("invalid doc_id key {id:?} in documents.json: {e}"))
            })
            .collect::<Result<_, String>>()?;

        let seek_map_path = index_dir.join("full_analytics/index_map_position.json");
        let seek_map_bytes = std::fs::read(&seek_map_path)
            .map_err(|e| format!("failed to read {}: {e}", seek_map_path.display()))?;
        let seek_map = crate::binary::read_seek_map(seek_map_bytes.as_slice())
            .map_err(|e| format!("failed to decode {}: {e}", seek_map_path.display()))?;

        let link_scores_path = index_dir.join("full_analytics/link_scores.json");
        let link_scores = linkanalysis::load_or_compute(&link_scores_path, &documents, config)?;

        let index_path = index_dir.join("full_analytics/index");
        let mut index_file = File::open(&index_path)
            .map_err(|e| format!("failed to open {}: {e}", index_path.display()))?;
        read_header(&mut BufReader::new(&mut index_file))
            .map_err(|e| format!("invalid index header in {}: {e}", index_path.display()))?;

        Ok(QueryEngine {
            documents,
            link_scores,
            seek_map,
            index_file: Mutex::new(index_file),
            weights,
        })
    }

    /// Run `query_text` and return up to `k` ranked results (§4.9).
    pub fn search(&self, query_text: &str, k: usize) -> Result<Vec<SearchResult>, String> {
        let tokens = tokenize(query_text, Mode::Query);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let query_len = tokens.len() as f64;
        let mut query_counts: HashMap<String, f64> = HashMap::new();
        for t in &tokens {
            *query_counts.entry(t.clone()).or_insert(0.0) += 1.0;
        }
        let q_unique = query_counts.len();

        let mut partial_score: HashMap<DocId, f64> = HashMap::new();
        let mut matched_terms: HashMap<DocId, HashSet<String>> = HashMap::new();
        let mut doc_term_tfidf: HashMap<DocId, HashMap<String, f64>> = HashMap::new();

        for (term, &count) in &query_counts {
            let Some(&offset) = self.seek_map.get(term) else {
                continue;
            };
            let (_term, postings) = {
                let mut file = self.index_file.lock().expect("index file mutex poisoned");
                match read_record_at(&mut *file, offset) {
                    Ok(record) => record,
                    Err(_) => continue,
                }
            };

            let qv = count / query_len;
            for p in &postings {
                *partial_score.entry(p.doc_id).or_insert(0.0) += p.tf_idf * qv;
                matched_terms.entry(p.doc_id).or_default().insert(term.clone());
                doc_term_tfidf.entry(p.doc_id).or_default().insert(term.clone(), p.tf_idf);
            }
        }

        if partial_score.is_empty() {
            return Ok(Vec::new());
        }

        let query_norm = (query_counts.values().map(|c| c * c).sum::<f64>()).sqrt();

        let mut results = Vec::with_capacity(partial_score.len());
        for (doc_id, s) in &partial_score {
            let doc = self
                .documents
                .get(doc_id)
                .ok_or_else(|| format!("posting references unknown doc_id {doc_id}"))?;

            let term_tfidf = &doc_term_tfidf[doc_id];
            let dot: f64 = term_tfidf
                .iter()
                .map(|(t, tfidf)| query_counts.get(t).copied().unwrap_or(0.0) * tfidf)
                .sum();
            let doc_norm = (term_tfidf.values().map(|v| v * v).sum::<f64>()).sqrt();
            let cosine = if doc_norm > 0.0 && query_norm > 0.0 {
                dot / (doc_norm * query_norm)
            } else {
                0.0
            };

            let matched = &matched_terms[doc_id];
            let term_match_boost = matched.len() as f64 / q_unique as f64;
            let auth = self.link_scores.authority.get(&doc.url).copied().unwrap_or(0.0);
            let hub = self.link_scores.hub.get(&doc.url).copied().unwrap_or(0.0);

            let final_score = self.weights.tfidf * s
                + self.weights.cosine * cosine
                + self.weights.coverage * term_match_boost
                + self.weights.authority * auth
                + self.weights.hub * hub;

            let mut matched_terms_sorted: Vec<String> = matched.iter().cloned().collect();
            matched_terms_sorted.sort();

            results.push((*doc_id, final_score, strip_fragment(&doc.url), matched_terms_sorted));
        }

        results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));
        results.truncate(k);

        Ok(results
            .into_iter()
            .map(|(_, score, url, matched_terms)| SearchResult { url, score, matched_terms })
            .collect())
    }
}

fn strip_fragment(url: &str) -> String {
    match url.find('#') {
        Some(idx) => url[..idx].to_string(),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::{encode_index, write_seek_map};
    use crate::types::{IndexerConfig, Posting};
    use std::io::Write;

    fn write_fixture(dir: &Path) {
        std::fs::create_dir_all(dir.join("full_analytics")).unwrap();

        let mut documents = HashMap::new();
        documents.insert(
            0,
            Document {
                url: "https://a.example/#section".to_string(),
                simhash: "0".repeat(128),
                token_count: 10,
                outgoing_links: vec![],
            },
        );
        documents.insert(
            1,
            Document {
                url: "https://b.example".to_string(),
                simhash: "0".repeat(128),
                token_count: 10,
                outgoing_links: vec![],
            },
        );
        let documents_json: HashMap<String, &Document> =
            documents.iter().map(|(id, d)| (id.to_string(), d)).collect();
        std::fs::write(dir.join("documents.json"), serde_json::to_vec(&documents_json).unwrap()).unwrap();

        let mut p0 = Posting::new(0);
        p0.frequency = 3;
        p0.tf_idf = 0.9;
        p0.positions = vec![0, 2, 4];
        let mut p1 = Posting::new(1);
        p1.frequency = 1;
        p1.tf_idf = 0.2;
        p1.positions = vec![1];

        let postings = vec![p0, p1];
        let shard: HashMap<&str, &[Posting]> = HashMap::from([("rust", postings.as_slice())]);
        let (bytes, seek_map) = encode_index(shard.into_iter()).unwrap();
        std::fs::write(dir.join("full_analytics/index"), &bytes).unwrap();

        let mut f = std::fs::File::create(dir.join("full_analytics/index_map_position.json")).unwrap();
        write_seek_map(&mut f, &seek_map).unwrap();
        f.flush().unwrap();
    }

    #[test]
    fn search_ranks_higher_tfidf_posting_first_and_strips_fragment() {
        let dir = tempfile::TempDir::new().unwrap();
        write_fixture(dir.path());

        let engine = QueryEngine::open(dir.path(), RankingWeights::default(), &IndexerConfig::default()).unwrap();
        let results = engine.search("rust", 10).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://a.example");
        assert_eq!(results[1].url, "https://b.example");
    }

    #[test]
    fn empty_query_returns_no_results() {
        let dir = tempfile::TempDir::new().unwrap();
        write_fixture(dir.path());

        let engine = QueryEngine::open(dir.path(), RankingWeights::default(), &IndexerConfig::default()).unwrap();
        let results = engine.search("the of and", 10).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn unknown_term_yields_no_results() {
        let dir = tempfile::TempDir::new().unwrap();
        write_fixture(dir.path());

        let engine = QueryEngine::open(dir.path(), RankingWeights::default(), &IndexerConfig::default()).unwrap();
        let results = engine.search("nonexistentword", 10).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn k_limits_the_result_count() {
        let dir = tempfile::TempDir::new().unwrap();
        write_fixture(dir.path());

        let engine = QueryEngine::open(dir.path(), RankingWeights::default(), &IndexerConfig::default()).unwrap();
        let results = engine.search("rust", 1).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://a.example");
    }
}
