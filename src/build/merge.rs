// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! RangePartitioner (P7, §4.5): external merge of partial indexes into
//! alphabet-range shards.

use crate::types::{bucket_for_term, ALPHABET_BUCKETS, Posting};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub type Shard = HashMap<String, Vec<Posting>>;

/// Stream every partial index file, routing each (term, postings) entry into
/// the shard keyed by `term[0]`. I/O or decode failure here is fatal (§7).
pub fn partition_into_shards(partial_paths: &[PathBuf]) -> Result<HashMap<&'static str, Shard>, String> {
    let mut shards: HashMap<&'static str, Shard> = ALPHABET_BUCKETS
        .iter()
        .map(|&bucket| (bucket, HashMap::new()))
        .collect();

    for path in partial_paths {
        let bytes = fs::read(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        let partial: HashMap<String, Vec<Posting>> = serde_json::from_slice(&bytes)
            .map_err(|e| format!("failed to decode partial index {}: {e}", path.display()))?;

        for (term, postings) in partial {
            let bucket = bucket_for_term(&term);
            shards
                .get_mut(bucket)
                .expect("bucket_for_term always returns a known bucket")
                .entry(term)
                .or_default()
                .extend(postings);
        }
    }

    Ok(shards)
}

/// Write each shard to `range_indexes/index_{bucket}` (§6). Empty shards are
/// still written so downstream tooling can assume all 27 files exist.
pub fn write_shards(shards: &HashMap<&'static str, Shard>, range_dir: &Path) -> Result<(), String> {
    fs::create_dir_all(range_dir).map_err(|e| format!("failed to create {}: {e}", range_dir.display()))?;

    for (&bucket, shard) in shards {
        let path = range_dir.join(format!("index_{bucket}"));
        let bytes = serde_json::to_vec(shard)
            .map_err(|e| format!("failed to encode shard {bucket}: {e}"))?;
        fs::write(&path, bytes).map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    }

    Ok(())
}

pub fn read_shard(range_dir: &Path, bucket: &str) -> Result<Shard, String> {
    let path = range_dir.join(format!("index_{bucket}"));
    let bytes = fs::read(&path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    serde_json::from_slice(&bytes).map_err(|e| format!("failed to decode {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Posting;
    use tempfile::TempDir;

    fn write_partial(dir: &Path, name: &str, entries: &[(&str, Posting)]) -> PathBuf {
        let mut map: HashMap<String, Vec<Posting>> = HashMap::new();
        for (term, posting) in entries {
            map.entry((*term).to_string()).or_default().push(posting.clone());
        }
        let path = dir.join(name);
        fs::write(&path, serde_json::to_vec(&map).unwrap()).unwrap();
        path
    }

    #[test]
    fn terms_route_to_first_letter_bucket() {
        let dir = TempDir::new().unwrap();
        let partial = write_partial(
            dir.path(),
            "partial_w0_0",
            &[("rust", Posting::new(0)), ("zebra", Posting::new(1))],
        );

        let shards = partition_into_shards(&[partial]).unwrap();
        assert!(shards["r"].contains_key("rust"));
        assert!(shards["z"].contains_key("zebra"));
        assert!(!shards["r"].contains_key("zebra"));
    }

    #[test]
    fn postings_for_same_term_across_partials_are_merged() {
        let dir = TempDir::new().unwrap();
        let p1 = write_partial(dir.path(), "partial_w0_0", &[("rust", Posting::new(0))]);
        let p2 = write_partial(dir.path(), "partial_w1_0", &[("rust", Posting::new(1))]);

        let shards = partition_into_shards(&[p1, p2]).unwrap();
        assert_eq!(shards["r"]["rust"].len(), 2);
    }

    #[test]
    fn write_and_read_shard_round_trips() {
        let dir = TempDir::new().unwrap();
        let partial = write_partial(dir.path(), "partial_w0_0", &[("rust", Posting::new(0))]);
        let shards = partition_into_shards(&[partial]).unwrap();

        let range_dir = dir.path().join("range_indexes");
        write_shards(&shards, &range_dir).unwrap();

        let r_shard = read_shard(&range_dir, "r").unwrap();
        assert_eq!(r_shard["rust"].len(), 1);

        let misc_shard = read_shard(&range_dir, "misc").unwrap();
        assert!(misc_shard.is_empty());
    }
}
