// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions.
//!
//! Four subcommands: `index` to build an index from a corpus directory,
//! `search` to run one query against a built index, `interactive` for a
//! REPL-style query loop (§4.10), and `inspect` to print summary statistics
//! about a built index without loading postings.

pub mod display;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "invidx", about = "Batch-built inverted-index web search engine", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a search index from a directory of per-page JSON records
    Index {
        /// Input directory of crawled-page JSON records
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the built index and its persisted artifacts
        #[arg(short, long)]
        output: PathBuf,

        /// Override the number of ingestion worker threads
        #[arg(long)]
        workers: Option<usize>,

        /// Override the in-memory spill threshold, in bytes
        #[arg(long)]
        max_index_size: Option<u64>,
    },

    /// Search a built index and print the ranked results
    Search {
        /// Directory containing a built index
        index_dir: PathBuf,

        /// Search query text
        query: String,

        /// Maximum number of results to return
        #[arg(short, long, default_value = "10")]
        k: usize,
    },

    /// Interactive REPL: read a query per line, print ranked results, until EOF
    Interactive {
        /// Directory containing a built index
        index_dir: PathBuf,
    },

    /// Print summary statistics about a built index
    Inspect {
        /// Directory containing a built index
        index_dir: PathBuf,
    },
}
