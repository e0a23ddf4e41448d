// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI entry point: build, search, and inspect inverted-index search indexes.
//!
//! ```bash
//! # Build an index from a corpus directory
//! invidx index --input ./corpus --output ./search
//!
//! # Run one query
//! invidx search ./search "rust programming" --k 10
//!
//! # Interactive REPL
//! invidx interactive ./search
//!
//! # Summary statistics without loading postings
//! invidx inspect ./search
//! ```

use clap::Parser;
use invidx::cli::display::{
    double_divider, double_footer, double_header, format_size, pad_left, pad_right, row,
    row_double, score_value, section_bot, section_top, styled, themed, timing_ms, title,
    truncate_path, BOLD, GRAY, GREEN, WHITE,
};
use invidx::cli::{Cli, Commands};
use invidx::types::IndexerConfig;
use invidx::{run_build, QueryEngine, SearchResult};
use std::io::{self, BufRead, Write};
use std::time::Instant;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Index { input, output, workers, max_index_size } => {
            let mut config = IndexerConfig::default();
            if let Some(w) = workers {
                config.workers = w;
            }
            if let Some(m) = max_index_size {
                config.max_index_size = m;
            }
            config.validate().and_then(|_| run_build(&input, &output, &config))
        }
        Commands::Search { index_dir, query, k } => run_search(&index_dir, &query, k),
        Commands::Interactive { index_dir } => run_interactive(&index_dir),
        Commands::Inspect { index_dir } => run_inspect(&index_dir),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run_search(index_dir: &std::path::Path, query: &str, k: usize) -> Result<(), String> {
    let config = IndexerConfig::default();
    let load_start = Instant::now();
    let engine = QueryEngine::open(index_dir, config.ranking_weights(), &config)?;
    let load_time = load_start.elapsed();

    let search_start = Instant::now();
    let results = engine.search(query, k)?;
    let search_time = search_start.elapsed();

    println!();
    double_header();
    title("SEARCH");
    double_divider();
    row_double(&format!("  Index:  {}", truncate_path(&index_dir.display().to_string(), 57)));
    row_double(&format!("  Query:  \"{}\"", query));
    row_double(&format!("  k:      {}", k));
    double_footer();
    println!();

    section_top("PERFORMANCE");
    row(&format!("  Index load:  {} ms", timing_ms(load_time.as_secs_f64() * 1000.0)));
    row(&format!("  Search:      {} ms", timing_ms(search_time.as_secs_f64() * 1000.0)));
    section_bot();
    println!();

    print_results(&results);
    Ok(())
}

fn run_interactive(index_dir: &std::path::Path) -> Result<(), String> {
    let config = IndexerConfig::default();
    let engine = QueryEngine::open(index_dir, config.ranking_weights(), &config)?;

    println!("{}", themed(GREEN, &[BOLD], "Interactive query mode. Empty line or EOF to quit."));

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        let mut line = String::new();
        let bytes_read = stdin.lock().read_line(&mut line).map_err(|e| e.to_string())?;
        if bytes_read == 0 || line.trim().is_empty() {
            break;
        }

        match engine.search(line.trim(), 10) {
            Ok(results) => print_results(&results),
            Err(e) => eprintln!("error: {e}"),
        }
    }
    Ok(())
}

fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        section_top("RESULTS (0)");
        row("  No results found.");
        section_bot();
        println!();
        return;
    }

    section_top(&format!("RESULTS ({})", results.len()));
    row("");
    row(&format!("  {:<3} {:>7}  {}", "#", "SCORE", "URL"));
    row(&format!(
        "  {:<3} {:>7}  {}",
        styled(&[], "───"),
        styled(&[], "──────"),
        styled(&[], &"─".repeat(40))
    ));

    for (i, r) in results.iter().enumerate() {
        let score = score_value(r.score * 100.0);
        row(&format!("  {:<3} {}  {}", i + 1, score, r.url));
        if !r.matched_terms.is_empty() {
            row(&format!("      └─ matched: {}", r.matched_terms.join(", ")));
        }
    }

    row("");
    section_bot();
    println!();
}

fn run_inspect(index_dir: &std::path::Path) -> Result<(), String> {
    let documents_path = index_dir.join("documents.json");
    let documents_bytes =
        std::fs::read(&documents_path).map_err(|e| format!("failed to read {}: {e}", documents_path.display()))?;
    let documents: std::collections::HashMap<String, serde_json::Value> = serde_json::from_slice(&documents_bytes)
        .map_err(|e| format!("failed to decode {}: {e}", documents_path.display()))?;

    let seek_map_path = index_dir.join("full_analytics/index_map_position.json");
    let seek_map_bytes =
        std::fs::read(&seek_map_path).map_err(|e| format!("failed to read {}: {e}", seek_map_path.display()))?;
    let seek_map = invidx::binary::read_seek_map(seek_map_bytes.as_slice())
        .map_err(|e| format!("failed to decode {}: {e}", seek_map_path.display()))?;

    let index_path = index_dir.join("full_analytics/index");
    let index_bytes = std::fs::read(&index_path).map_err(|e| format!("failed to read {}: {e}", index_path.display()))?;
    let version = invidx::binary::read_header(&mut index_bytes.as_slice())
        .map_err(|e| format!("invalid index header: {e}"))?;

    println!();
    double_header();
    title("INSPECT");
    double_divider();
    row_double(&format!("  Index:  {}", truncate_path(&index_dir.display().to_string(), 57)));
    double_footer();
    println!();

    section_top("SUMMARY");
    row(&format!("  {}  {}", pad_right(&themed(WHITE, &[], "documents"), 14), documents.len()));
    row(&format!("  {}  {}", pad_right(&themed(WHITE, &[], "terms"), 14), seek_map.len()));
    row(&format!("  {}  {}", pad_right(&themed(WHITE, &[], "index size"), 14), format_size(index_bytes.len())));
    row(&format!("  {}  v{}", pad_right(&themed(WHITE, &[], "format version"), 14), version));
    section_bot();
    println!();

    for bucket in invidx::types::ALPHABET_BUCKETS {
        let path = index_dir.join(format!("range_indexes/index_{bucket}"));
        if let Ok(bytes) = std::fs::read(&path) {
            let label = pad_left(&themed(GRAY, &[], bucket), 6);
            row(&format!("  {}  {}", label, format_size(bytes.len())));
        }
    }
    println!();

    Ok(())
}
