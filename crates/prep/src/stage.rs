// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::path::PathBuf;

use crate::error::PrepError;
use crate::store::Artifact;

/// Pipeline stages in dependency order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Tuples,
    TransactionCounts,
    SingleThread,
    LatVsTp,
    Scaling,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Tuples,
        Stage::TransactionCounts,
        Stage::SingleThread,
        Stage::LatVsTp,
        Stage::Scaling,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Tuples => "tuples",
            Stage::TransactionCounts => "tc",
            Stage::SingleThread => "st",
            Stage::LatVsTp => "lat-vs-tp",
            Stage::Scaling => "scaling",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A file a stage wrote
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutput {
    pub artifact: Artifact,
    pub path: PathBuf,
    pub rows: usize,
}

/// One (stage, target) that did not produce its output
#[derive(Debug)]
pub struct Failure {
    pub stage: Stage,
    /// The artifact that was not written
    pub target: Artifact,
    pub error: PrepError,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.target, self.error)
    }
}
