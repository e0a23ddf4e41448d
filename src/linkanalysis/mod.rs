// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! LinkAnalyzer (P9, §4.7): HITS and PageRank over the outgoing-link graph.
//!
//! Sparse by construction: every document contributes only the out-edges it
//! actually has, rather than a dense N×N matrix. `doc_id` is used directly as
//! the vector index since accepted doc_ids are already contiguous over
//! `[0, N)`.

use crate::types::{DocId, Document, IndexerConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Authority, hub, and PageRank scores keyed by URL, ready to serialize as
/// `full_analytics/link_scores.json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkScores {
    pub authority: HashMap<String, f64>,
    pub hub: HashMap<String, f64>,
    pub pagerank: HashMap<String, f64>,
}

/// Out-edges per doc_id, restricted to targets that are themselves in the
/// accepted corpus. Links to URLs outside the corpus are dropped: they have
/// no node to attach to.
fn build_out_edges(documents: &HashMap<DocId, Document>) -> Vec<Vec<DocId>> {
    let n = documents.len();
    let url_to_doc: HashMap<&str, DocId> =
        documents.iter().map(|(&id, doc)| (doc.url.as_str(), id)).collect();

    let mut out_edges = vec![Vec::new(); n];
    for (&doc_id, doc) in documents {
        for link in &doc.outgoing_links {
            if let Some(&target) = url_to_doc.get(link.as_str()) {
                out_edges[doc_id].push(target);
            }
        }
    }
    out_edges
}

fn l1_normalize(v: &mut [f64]) {
    let norm: f64 = v.iter().map(|x| x.abs()).sum();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

fn max_abs_delta(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max)
}

/// HITS: `auth ← Aᵀ·hub` then `hub ← A·auth`, each L1-normalized, repeated up
/// to `max_iterations` times or until both vectors stop moving by more than
/// `threshold` per component. Final vectors are scaled ×10 (§4.7, cosmetic).
fn hits(out_edges: &[Vec<DocId>], config: &IndexerConfig) -> (Vec<f64>, Vec<f64>) {
    let n = out_edges.len();
    if n == 0 {
        return (Vec::new(), Vec::new());
    }

    let init = 1.0 / n as f64;
    let mut hub = vec![init; n];
    let mut auth = vec![init; n];

    for _ in 0..config.hits_max_iterations {
        let mut new_auth = vec![0.0; n];
        for (i, targets) in out_edges.iter().enumerate() {
            for &j in targets {
                new_auth[j] += hub[i];
            }
        }
        l1_normalize(&mut new_auth);

        let mut new_hub = vec![0.0; n];
        for (i, targets) in out_edges.iter().enumerate() {
            let mut s = 0.0;
            for &j in targets {
                s += new_auth[j];
            }
            new_hub[i] = s;
        }
        l1_normalize(&mut new_hub);

        let converged = max_abs_delta(&new_auth, &auth) < config.hits_threshold
            && max_abs_delta(&new_hub, &hub) < config.hits_threshold;

        auth = new_auth;
        hub = new_hub;

        if converged {
            break;
        }
    }

    for x in auth.iter_mut() {
        *x *= 10.0;
    }
    for x in hub.iter_mut() {
        *x *= 10.0;
    }
    (auth, hub)
}

/// PageRank: `score ← (1−d)/N + d·B·score`, `B[i][j] = 1/out-degree(j)` when
/// `j` links to `i`. Iterated up to `pagerank_iterations` times or until the
/// L1 delta drops below `pagerank_threshold`. Final scores scaled ×1000.
fn pagerank(out_edges: &[Vec<DocId>], config: &IndexerConfig) -> Vec<f64> {
    let n = out_edges.len();
    if n == 0 {
        return Vec::new();
    }

    let d = config.pagerank_damping;
    let base = (1.0 - d) / n as f64;
    let mut scores = vec![1.0 / n as f64; n];

    for _ in 0..config.pagerank_iterations {
        let mut new_scores = vec![base; n];
        for (j, targets) in out_edges.iter().enumerate() {
            let out_degree = targets.len();
            if out_degree == 0 {
                continue;
            }
            let share = d * scores[j] / out_degree as f64;
            for &i in targets {
                new_scores[i] += share;
            }
        }

        let delta: f64 = new_scores.iter().zip(&scores).map(|(a, b)| (a - b).abs()).sum();
        scores = new_scores;
        if delta < config.pagerank_threshold {
            break;
        }
    }

    for x in scores.iter_mut() {
        *x *= 1000.0;
    }
    scores
}

/// Run both algorithms over the accepted corpus and map results back to URLs.
pub fn analyze_links(documents: &HashMap<DocId, Document>, config: &IndexerConfig) -> LinkScores {
    let out_edges = build_out_edges(documents);
    let (auth, hub) = hits(&out_edges, config);
    let rank = pagerank(&out_edges, config);

    let mut scores = LinkScores::default();
    for (&doc_id, doc) in documents {
        scores.authority.insert(doc.url.clone(), auth.get(doc_id).copied().unwrap_or(0.0));
        scores.hub.insert(doc.url.clone(), hub.get(doc_id).copied().unwrap_or(0.0));
        scores.pagerank.insert(doc.url.clone(), rank.get(doc_id).copied().unwrap_or(0.0));
    }
    scores
}

/// On-disk shape of `full_analytics/link_scores.json` (§6): nested under
/// `hits` rather than flat, unlike the in-memory `LinkScores`.
#[derive(Serialize, Deserialize)]
struct HitsSection {
    authority: HashMap<String, f64>,
    hub: HashMap<String, f64>,
}

#[derive(Serialize, Deserialize)]
struct LinkScoresFile {
    hits: HitsSection,
    pagerank: HashMap<String, f64>,
}

impl From<&LinkScores> for LinkScoresFile {
    fn from(scores: &LinkScores) -> Self {
        LinkScoresFile {
            hits: HitsSection {
                authority: scores.authority.clone(),
                hub: scores.hub.clone(),
            },
            pagerank: scores.pagerank.clone(),
        }
    }
}

impl From<LinkScoresFile> for LinkScores {
    fn from(file: LinkScoresFile) -> Self {
        LinkScores {
            authority: file.hits.authority,
            hub: file.hits.hub,
            pagerank: file.pagerank,
        }
    }
}

/// Load `full_analytics/link_scores.json` if present; otherwise compute it
/// from `documents` and persist it for next time (§7: "File-not-found for
/// link-score files: compute on demand and persist").
pub fn load_or_compute(
    path: &Path,
    documents: &HashMap<DocId, Document>,
    config: &IndexerConfig,
) -> Result<LinkScores, String> {
    if let Ok(bytes) = fs::read(path) {
        let file: LinkScoresFile =
            serde_json::from_slice(&bytes).map_err(|e| format!("failed to decode {}: {e}", path.display()))?;
        return Ok(file.into());
    }

    let scores = analyze_links(documents, config);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
    }
    let file: LinkScoresFile = (&scores).into();
    let bytes = serde_json::to_vec(&file).map_err(|e| format!("failed to encode link scores: {e}"))?;
    fs::write(path, bytes).map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(url: &str, links: &[&str]) -> Document {
        Document {
            url: url.to_string(),
            simhash: "0".repeat(128),
            token_count: 10,
            outgoing_links: links.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn pagerank_on_four_node_cycle_converges_to_uniform() {
        let mut documents = HashMap::new();
        documents.insert(0, doc("a", &["b"]));
        documents.insert(1, doc("b", &["c"]));
        documents.insert(2, doc("c", &["d"]));
        documents.insert(3, doc("d", &["a"]));

        let config = IndexerConfig::default();
        let scores = analyze_links(&documents, &config);

        for url in ["a", "b", "c", "d"] {
            let s = scores.pagerank[url] / 1000.0;
            assert!((s - 0.25).abs() < 1e-3, "expected ~0.25 for {url}, got {s}");
        }
    }

    #[test]
    fn links_to_urls_outside_the_corpus_are_dropped() {
        let mut documents = HashMap::new();
        documents.insert(0, doc("a", &["https://not-in-corpus.example"]));
        let config = IndexerConfig::default();
        let scores = analyze_links(&documents, &config);
        assert_eq!(scores.pagerank.len(), 1);
    }

    #[test]
    fn hits_favors_the_node_everyone_links_to() {
        let mut documents = HashMap::new();
        documents.insert(0, doc("a", &["c"]));
        documents.insert(1, doc("b", &["c"]));
        documents.insert(2, doc("c", &[]));

        let config = IndexerConfig::default();
        let scores = analyze_links(&documents, &config);
        assert!(scores.authority["c"] > scores.authority["a"]);
        assert!(scores.authority["c"] > scores.authority["b"]);
    }

    #[test]
    fn empty_corpus_produces_empty_scores() {
        let documents = HashMap::new();
        let config = IndexerConfig::default();
        let scores = analyze_links(&documents, &config);
        assert!(scores.authority.is_empty());
        assert!(scores.hub.is_empty());
        assert!(scores.pagerank.is_empty());
    }

    #[test]
    fn load_or_compute_persists_scores_for_next_call() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("full_analytics/link_scores.json");

        let mut documents = HashMap::new();
        documents.insert(0, doc("a", &["b"]));
        documents.insert(1, doc("b", &[]));
        let config = IndexerConfig::default();

        let computed = load_or_compute(&path, &documents, &config).unwrap();
        assert!(path.exists());

        let reloaded = load_or_compute(&path, &documents, &config).unwrap();
        assert_eq!(computed.pagerank["a"], reloaded.pagerank["a"]);
    }
}
