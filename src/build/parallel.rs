// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Concurrent ingestion (§5): W worker threads, each owning a disjoint slice
//! of input files and a private local index. The only shared mutable state
//! is the doc_id counter and the accepted-document map, each behind its own
//! mutex; the near-duplicate check and the insert into the accepted map are
//! one atomic critical section so two near-duplicates can never both be
//! admitted.
//!
//! Grounded on `original_source/multithread_indexer.py`'s `SharedResources`
//! / `IndexWorker` (`threading.Thread` + `Lock`), translated to
//! `std::thread::scope` + `std::sync::Mutex`.

use super::posting::build_postings;
use crate::html;
use crate::simhash::{self, Fingerprint};
use crate::tokenizer::{tokenize, Mode};
use crate::types::{Document, DocId, IndexerConfig, InputRecord, Posting};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;

#[cfg(feature = "parallel")]
use indicatif::ProgressBar;

struct SharedState {
    next_doc_id: Mutex<DocId>,
    accepted: Mutex<AcceptedDocs>,
}

struct AcceptedDocs {
    documents: HashMap<DocId, Document>,
    fingerprints: Vec<Fingerprint>,
}

#[derive(Default, Debug, Clone, Copy)]
pub struct IngestStats {
    pub accepted: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub errors: usize,
}

pub struct IngestOutcome {
    pub documents: HashMap<DocId, Document>,
    pub partial_paths: Vec<PathBuf>,
    pub stats: IngestStats,
}

/// Run P1-P6 (DocReader through Spiller) over `files` using `config.workers`
/// worker threads, writing spilled partial indexes under `partial_dir`.
pub fn ingest_corpus(
    files: Vec<PathBuf>,
    config: &IndexerConfig,
    partial_dir: &Path,
    #[cfg(feature = "parallel")] progress: Option<&ProgressBar>,
) -> Result<IngestOutcome, String> {
    fs::create_dir_all(partial_dir)
        .map_err(|e| format!("failed to create {}: {e}", partial_dir.display()))?;

    let shared = SharedState {
        next_doc_id: Mutex::new(0),
        accepted: Mutex::new(AcceptedDocs {
            documents: HashMap::new(),
            fingerprints: Vec::new(),
        }),
    };

    let worker_count = config.workers.max(1);
    let chunks = divide_work(files, worker_count);

    let errors = Mutex::new(0usize);
    let duplicates = Mutex::new(0usize);
    let skipped = Mutex::new(0usize);
    let partial_paths = Mutex::new(Vec::new());

    thread::scope(|scope| -> Result<(), String> {
        let mut handles = Vec::new();
        for (worker_id, chunk) in chunks.into_iter().enumerate() {
            let shared = &shared;
            let config = config;
            let errors = &errors;
            let duplicates = &duplicates;
            let skipped = &skipped;
            let partial_paths = &partial_paths;
            #[cfg(feature = "parallel")]
            let progress = progress;
            handles.push(scope.spawn(move || {
                run_worker(
                    worker_id,
                    chunk,
                    shared,
                    config,
                    partial_dir,
                    errors,
                    duplicates,
                    skipped,
                    partial_paths,
                    #[cfg(feature = "parallel")]
                    progress,
                )
            }));
        }
        for handle in handles {
            handle.join().map_err(|_| "worker thread panicked".to_string())??;
        }
        Ok(())
    })?;

    let accepted = shared
        .accepted
        .into_inner()
        .map_err(|_| "accepted-document mutex poisoned".to_string())?;

    let stats = IngestStats {
        accepted: accepted.documents.len(),
        duplicates: *duplicates.lock().unwrap(),
        skipped: *skipped.lock().unwrap(),
        errors: *errors.lock().unwrap(),
    };

    Ok(IngestOutcome {
        documents: accepted.documents,
        partial_paths: partial_paths.into_inner().unwrap(),
        stats,
    })
}

/// Deterministic pseudo-shuffle by path hash, so no single worker is biased
/// toward whatever directory-listing order the filesystem happened to return.
fn divide_work(mut files: Vec<PathBuf>, workers: usize) -> Vec<Vec<PathBuf>> {
    files.sort_by_key(|p| fnv1a(p.to_string_lossy().as_bytes()));
    let mut chunks = vec![Vec::new(); workers];
    for (i, file) in files.into_iter().enumerate() {
        chunks[i % workers].push(file);
    }
    chunks
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

#[allow(clippy::too_many_arguments)]
fn run_worker(
    worker_id: usize,
    files: Vec<PathBuf>,
    shared: &SharedState,
    config: &IndexerConfig,
    partial_dir: &Path,
    errors: &Mutex<usize>,
    duplicates: &Mutex<usize>,
    skipped: &Mutex<usize>,
    partial_paths: &Mutex<Vec<PathBuf>>,
    #[cfg(feature = "parallel")] progress: Option<&ProgressBar>,
) -> Result<(), String> {
    let mut local_index: HashMap<String, Vec<Posting>> = HashMap::new();
    let mut local_size: u64 = 0;
    let mut partial_count = 0usize;

    for path in files {
        match ingest_one_file(&path, shared, config) {
            Ok(IngestResult::Accepted(postings)) => {
                for (term, posting) in postings {
                    local_size += estimate_size(&term, &posting);
                    local_index.entry(term).or_default().push(posting);
                }
            }
            Ok(IngestResult::Duplicate) => *duplicates.lock().unwrap() += 1,
            Ok(IngestResult::Skipped) => *skipped.lock().unwrap() += 1,
            Err(e) => {
                eprintln!("worker {worker_id}: {e}");
                *errors.lock().unwrap() += 1;
            }
        }

        if local_size > config.max_index_size {
            if let Some(p) = spill(&local_index, partial_dir, worker_id, &mut partial_count)? {
                partial_paths.lock().unwrap().push(p);
            }
            local_index.clear();
            local_size = 0;
        }

        #[cfg(feature = "parallel")]
        if let Some(p) = progress {
            p.inc(1);
        }
    }

    if !local_index.is_empty() {
        if let Some(p) = spill(&local_index, partial_dir, worker_id, &mut partial_count)? {
            partial_paths.lock().unwrap().push(p);
        }
    }

    Ok(())
}

enum IngestResult {
    Accepted(HashMap<String, Posting>),
    Duplicate,
    Skipped,
}

fn ingest_one_file(
    path: &Path,
    shared: &SharedState,
    config: &IndexerConfig,
) -> Result<IngestResult, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let record: InputRecord = serde_json::from_str(&content)
        .map_err(|e| format!("invalid record JSON in {}: {e}", path.display()))?;

    if record.url.to_lowercase().ends_with(".txt") {
        return Ok(IngestResult::Skipped);
    }

    let extracted = html::extract(&record.content, &record.encoding, &record.url);
    let body_tokens = tokenize(&extracted.body_text, Mode::Index);
    let fingerprint = simhash::fingerprint(&body_tokens);

    // Build postings before touching shared state; doc_id is a placeholder
    // here and patched in once the document is confirmed accepted, so the
    // accepted-map lock is held only across the check-and-insert pair.
    let (mut postings, token_count) =
        build_postings(0, &extracted.body_text, &extracted.weighted_text);

    let mut accepted = shared
        .accepted
        .lock()
        .map_err(|_| "accepted-document mutex poisoned".to_string())?;

    if simhash::is_near_duplicate(
        fingerprint,
        accepted.fingerprints.iter().copied(),
        config.similarity_threshold,
    ) {
        return Ok(IngestResult::Duplicate);
    }

    let doc_id = {
        let mut next = shared
            .next_doc_id
            .lock()
            .map_err(|_| "doc_id mutex poisoned".to_string())?;
        let id = *next;
        *next += 1;
        id
    };

    for posting in postings.values_mut() {
        posting.doc_id = doc_id;
    }

    let doc = Document {
        url: record.url,
        simhash: fingerprint.to_binary_string(),
        token_count,
        outgoing_links: extracted.links,
    };
    accepted.documents.insert(doc_id, doc);
    accepted.fingerprints.push(fingerprint);
    drop(accepted);

    Ok(IngestResult::Accepted(postings))
}

fn estimate_size(term: &str, posting: &Posting) -> u64 {
    (term.len() + 32 + posting.positions.len() * 4) as u64
}

/// Spill the local index to `partial_w{worker_id}_{k}` (§5, §6). I/O failure
/// here is fatal per §7 and aborts the build.
fn spill(
    local_index: &HashMap<String, Vec<Posting>>,
    partial_dir: &Path,
    worker_id: usize,
    partial_count: &mut usize,
) -> Result<Option<PathBuf>, String> {
    if local_index.is_empty() {
        return Ok(None);
    }

    let path = partial_dir.join(format!("partial_w{worker_id}_{partial_count}"));
    *partial_count += 1;

    let bytes = serde_json::to_vec(local_index)
        .map_err(|e| format!("failed to encode partial index {}: {e}", path.display()))?;
    fs::write(&path, bytes).map_err(|e| format!("failed to write {}: {e}", path.display()))?;

    Ok(Some(path))
}
