// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Build pipeline (P1-P10): read a corpus directory, ingest it concurrently,
//! merge into alphabet-range shards, score, analyze link structure, and
//! serialize the final binary index plus its seek map.

pub mod corpus;
pub mod merge;
pub mod parallel;
pub mod posting;

use crate::types::{DocId, Document, IndexerConfig};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

#[cfg(feature = "parallel")]
fn create_progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}")
        .unwrap()
        .progress_chars("━━╸")
}

/// Run the full build pipeline: `input_dir` is a directory of per-page JSON
/// records (§6); results are written under `output_dir` matching the
/// persisted-artifact table.
pub fn run_build(input_dir: &Path, output_dir: &Path, config: &IndexerConfig) -> Result<(), String> {
    let files = corpus::list_input_files(input_dir)?;
    if files.is_empty() {
        eprintln!("no input files found under {}; skipping build", input_dir.display());
        return Ok(());
    }

    #[cfg(feature = "parallel")]
    let ingest_pb = {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(create_progress_style());
        pb.set_prefix("Ingesting");
        pb
    };

    let partial_dir = output_dir.join("partial_indexes");
    let outcome = parallel::ingest_corpus(
        files,
        config,
        &partial_dir,
        #[cfg(feature = "parallel")]
        Some(&ingest_pb),
    )?;

    #[cfg(feature = "parallel")]
    ingest_pb.finish_with_message(format!("{} accepted", outcome.documents.len()));

    eprintln!(
        "ingest: {} accepted, {} duplicates, {} skipped, {} errors",
        outcome.stats.accepted, outcome.stats.duplicates, outcome.stats.skipped, outcome.stats.errors
    );

    let documents = outcome.documents;
    write_documents(output_dir, &documents)?;

    let mut shards = merge::partition_into_shards(&outcome.partial_paths)?;
    let n = documents.len();
    for shard in shards.values_mut() {
        crate::scoring::score_shard(shard, &documents, n);
    }

    let range_dir = output_dir.join("range_indexes");
    merge::write_shards(&shards, &range_dir)?;

    write_binary_index(output_dir, &shards)?;

    let link_scores_path = output_dir.join("full_analytics/link_scores.json");
    crate::linkanalysis::load_or_compute(&link_scores_path, &documents, config)?;

    eprintln!("build complete: {} documents, {} shards", documents.len(), shards.len());
    Ok(())
}

fn write_documents(output_dir: &Path, documents: &HashMap<DocId, Document>) -> Result<(), String> {
    fs::create_dir_all(output_dir).map_err(|e| format!("failed to create {}: {e}", output_dir.display()))?;
    let keyed: HashMap<String, &Document> = documents.iter().map(|(id, doc)| (id.to_string(), doc)).collect();
    let bytes = serde_json::to_vec(&keyed).map_err(|e| format!("failed to encode documents.json: {e}"))?;
    let path = output_dir.join("documents.json");
    fs::write(&path, bytes).map_err(|e| format!("failed to write {}: {e}", path.display()))
}

fn write_binary_index(output_dir: &Path, shards: &HashMap<&'static str, merge::Shard>) -> Result<(), String> {
    let mut buckets: Vec<&&'static str> = shards.keys().collect();
    buckets.sort();

    let mut entries = Vec::new();
    for &&bucket in &buckets {
        let shard = &shards[bucket];
        let mut terms: Vec<&String> = shard.keys().collect();
        terms.sort();
        for term in terms {
            entries.push((term.as_str(), shard[term].as_slice()));
        }
    }

    let (bytes, seek_map) =
        crate::binary::encode_index(entries.into_iter()).map_err(|e| format!("failed to encode index: {e}"))?;

    let analytics_dir = output_dir.join("full_analytics");
    fs::create_dir_all(&analytics_dir).map_err(|e| format!("failed to create {}: {e}", analytics_dir.display()))?;

    fs::write(analytics_dir.join("index"), &bytes).map_err(|e| format!("failed to write index: {e}"))?;

    let seek_map_path = analytics_dir.join("index_map_position.json");
    let seek_map_file =
        fs::File::create(&seek_map_path).map_err(|e| format!("failed to create {}: {e}", seek_map_path.display()))?;
    crate::binary::write_seek_map(seek_map_file, &seek_map)
        .map_err(|e| format!("failed to write {}: {e}", seek_map_path.display()))
}
