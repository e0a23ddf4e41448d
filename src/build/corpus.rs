// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Corpus directory scanning (P1, DocReader half).
//!
//! The input corpus is a plain directory of per-page JSON records (§6), one
//! file per crawled page, optionally grouped into subdirectories the way a
//! crawler naturally shards its output. No manifest file is required.

use std::fs;
use std::path::{Path, PathBuf};

/// Collect every `*.json` file under `root`, one directory level deep if
/// `root` itself contains subdirectories, flat otherwise.
pub fn list_input_files(root: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = fs::read_dir(root).map_err(|e| format!("failed to read {}: {e}", root.display()))?;

    let mut files = Vec::new();
    let mut subdirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("failed to read entry in {}: {e}", root.display()))?;
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }

    for dir in subdirs {
        for entry in fs::read_dir(&dir).map_err(|e| format!("failed to read {}: {e}", dir.display()))? {
            let entry = entry.map_err(|e| format!("failed to read entry in {}: {e}", dir.display()))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
    }

    Ok(files)
}
