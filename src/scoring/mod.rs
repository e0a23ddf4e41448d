// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring: the Scorer phase (P8) that computes TF·IDF for every posting.

mod core;

pub use core::score_shard;
