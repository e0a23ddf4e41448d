// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! End-to-end pipeline scenarios: a real corpus directory in, a built index
//! out, queries run against it.

use invidx::types::IndexerConfig;
use invidx::{run_build, QueryEngine};
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn write_record(dir: &Path, name: &str, url: &str, content: &str) {
    let path = dir.join(name);
    let json = serde_json::json!({ "url": url, "content": content, "encoding": "utf-8" });
    File::create(&path).unwrap().write_all(json.to_string().as_bytes()).unwrap();
}

fn build(input: &Path, output: &Path, config: &IndexerConfig) {
    run_build(input, output, config).unwrap();
}

#[test]
fn duplicate_document_is_rejected_and_query_ranks_by_coverage() {
    let input = tempfile::TempDir::new().unwrap();
    let output = tempfile::TempDir::new().unwrap();

    write_record(input.path(), "a.json", "https://a.example", "the quick brown fox");
    write_record(input.path(), "b.json", "https://b.example", "the lazy brown dog");
    write_record(input.path(), "c.json", "https://c.example", "the quick brown fox");

    let config = IndexerConfig::default();
    build(input.path(), output.path(), &config);

    let documents_bytes = std::fs::read(output.path().join("documents.json")).unwrap();
    let documents: std::collections::HashMap<String, serde_json::Value> =
        serde_json::from_slice(&documents_bytes).unwrap();
    assert_eq!(documents.len(), 2, "the third document duplicates the first and must be rejected");

    let engine = QueryEngine::open(output.path(), config.ranking_weights(), &config).unwrap();
    let results = engine.search("quick fox", 10).unwrap();

    assert_eq!(results.len(), 1, "only the fox document matches both terms");
    assert_eq!(results[0].url, "https://a.example");
}

#[test]
fn title_weighted_document_outranks_plain_body_mention() {
    let input = tempfile::TempDir::new().unwrap();
    let output = tempfile::TempDir::new().unwrap();

    write_record(input.path(), "a.json", "https://a.example", "<title>rust</title><p>hello world</p>");
    write_record(input.path(), "b.json", "https://b.example", "<p>rust is a language</p>");

    let config = IndexerConfig::default();
    build(input.path(), output.path(), &config);

    let engine = QueryEngine::open(output.path(), config.ranking_weights(), &config).unwrap();
    let results = engine.search("rust", 10).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].url, "https://a.example", "title occurrence should outweigh a single body mention");
}

#[test]
fn stop_word_only_query_returns_no_results() {
    let input = tempfile::TempDir::new().unwrap();
    let output = tempfile::TempDir::new().unwrap();

    write_record(input.path(), "a.json", "https://a.example", "the quick brown fox jumps");

    let config = IndexerConfig::default();
    build(input.path(), output.path(), &config);

    let engine = QueryEngine::open(output.path(), config.ranking_weights(), &config).unwrap();
    let results = engine.search("the of and", 10).unwrap();
    assert!(results.is_empty());
}

#[test]
fn spilling_is_observationally_invisible() {
    let input = tempfile::TempDir::new().unwrap();
    for i in 0..64 {
        write_record(input.path(), &format!("doc{i}.json"), &format!("https://site.example/{i}"), &format!("document number {i} about rust programming"));
    }

    let mut spilling_config = IndexerConfig::default();
    spilling_config.workers = 1;
    spilling_config.max_index_size = 1024;
    let spilling_output = tempfile::TempDir::new().unwrap();
    build(input.path(), spilling_output.path(), &spilling_config);

    let mut unbounded_config = IndexerConfig::default();
    unbounded_config.workers = 1;
    unbounded_config.max_index_size = u64::MAX;
    let unbounded_output = tempfile::TempDir::new().unwrap();
    build(input.path(), unbounded_output.path(), &unbounded_config);

    let spilling_engine =
        QueryEngine::open(spilling_output.path(), spilling_config.ranking_weights(), &spilling_config).unwrap();
    let unbounded_engine =
        QueryEngine::open(unbounded_output.path(), unbounded_config.ranking_weights(), &unbounded_config).unwrap();

    let spilling_results = spilling_engine.search("rust programming", 64).unwrap();
    let unbounded_results = unbounded_engine.search("rust programming", 64).unwrap();

    assert_eq!(spilling_results.len(), unbounded_results.len());
    let mut spilling_urls: Vec<&str> = spilling_results.iter().map(|r| r.url.as_str()).collect();
    let mut unbounded_urls: Vec<&str> = unbounded_results.iter().map(|r| r.url.as_str()).collect();
    spilling_urls.sort();
    unbounded_urls.sort();
    assert_eq!(spilling_urls, unbounded_urls, "spilling must not change which documents are found");
}

#[test]
fn pagerank_on_a_four_node_cycle_converges_to_uniform_scores() {
    let input = tempfile::TempDir::new().unwrap();
    let output = tempfile::TempDir::new().unwrap();

    write_record(input.path(), "a.json", "https://a.example", "<a href=\"https://b.example\">b</a> content a");
    write_record(input.path(), "b.json", "https://b.example", "<a href=\"https://c.example\">c</a> content b");
    write_record(input.path(), "c.json", "https://c.example", "<a href=\"https://d.example\">d</a> content c");
    write_record(input.path(), "d.json", "https://d.example", "<a href=\"https://a.example\">a</a> content d");

    let config = IndexerConfig::default();
    build(input.path(), output.path(), &config);

    let scores_bytes = std::fs::read(output.path().join("full_analytics/link_scores.json")).unwrap();
    let scores: serde_json::Value = serde_json::from_slice(&scores_bytes).unwrap();
    let pagerank = scores["pagerank"].as_object().unwrap();

    assert_eq!(pagerank.len(), 4);
    let values: Vec<f64> = pagerank.values().map(|v| v.as_f64().unwrap()).collect();
    let expected = 250.0; // 0.25 uniform share, cosmetically scaled x1000 -> 250
    for v in values {
        assert!((v - expected).abs() < 1.0, "expected ~{expected}, got {v}");
    }
}

#[test]
fn seek_map_round_trips_every_term_in_the_built_index() {
    let input = tempfile::TempDir::new().unwrap();
    let output = tempfile::TempDir::new().unwrap();

    write_record(
        input.path(),
        "a.json",
        "https://a.example",
        "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima",
    );
    write_record(input.path(), "b.json", "https://b.example", "mike november oscar papa quebec romeo sierra tango");

    let config = IndexerConfig::default();
    build(input.path(), output.path(), &config);

    let seek_map_bytes = std::fs::read(output.path().join("full_analytics/index_map_position.json")).unwrap();
    let seek_map = invidx::binary::read_seek_map(seek_map_bytes.as_slice()).unwrap();
    assert!(seek_map.len() >= 10);

    let index_bytes = std::fs::read(output.path().join("full_analytics/index")).unwrap();
    let mut cursor = std::io::Cursor::new(&index_bytes);

    for (term, &offset) in seek_map.iter().take(10) {
        let (decoded_term, postings) = invidx::binary::read_record_at(&mut cursor, offset).unwrap();
        assert_eq!(&decoded_term, term);
        assert!(!postings.is_empty());
    }
}
