// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! File naming and I/O for the raw input directory and the prepped output
//! directory.
//!
//! Every file is named by an [`Artifact`], keyed on (workers, size), so no
//! two (stage, pair) combinations ever write the same file.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use diagnostics::log_debug;
use tabular::{Column, Keyed, Record};
use wax::Glob;

use crate::error::{PrepError, Result, TableContext};

/// Field separator of raw benchmark files
pub const RAW_DELIMITER: char = '|';

/// Field separator of every prepped file
pub const OUTPUT_DELIMITER: char = ' ';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Artifact {
    Tuples { workers: u32, size: u32 },
    TransactionCounts { workers: u32, size: u32 },
    SingleThread { workers: u32, size: u32 },
    LatVsTp { workers: u32, size: u32 },
    ScalingLatency { workers: u32 },
    ScalingThroughput { workers: u32 },
}

impl Artifact {
    /// Raw file name, or glob for sharded inputs. Derived artifacts have none.
    pub fn raw_name(&self) -> Option<String> {
        match self {
            Artifact::Tuples { workers, size } => Some(format!("tuples_{workers}_{size}_*")),
            Artifact::TransactionCounts { workers, size } => Some(format!("tc_{workers}_{size}.csv")),
            Artifact::SingleThread { workers, size } => Some(format!("st_{workers}_{size}.csv")),
            _ => None,
        }
    }

    pub fn prepped_name(&self) -> String {
        match self {
            Artifact::Tuples { workers, size } => format!("prepped_tuples_{workers}_{size}.csv"),
            Artifact::TransactionCounts { workers, size } => {
                format!("prepped_tc_{workers}_{size}.csv")
            }
            Artifact::SingleThread { workers, size } => format!("prepped_st_{workers}_{size}.csv"),
            Artifact::LatVsTp { workers, size } => {
                format!("prepped_lat_vs_tp_{workers}_{size}.csv")
            }
            Artifact::ScalingLatency { workers } => format!("prepped_scaling_lat_{workers}.csv"),
            Artifact::ScalingThroughput { workers } => format!("prepped_scaling_tp_{workers}.csv"),
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prepped_name())
    }
}

/// Read-only directory of raw benchmark output
#[derive(Debug, Clone)]
pub struct RawStore {
    dir: PathBuf,
}

impl RawStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a single-file raw input
    pub fn path(&self, artifact: Artifact) -> Option<PathBuf> {
        match artifact {
            Artifact::Tuples { .. } => None,
            _ => artifact.raw_name().map(|name| self.dir.join(name)),
        }
    }

    /// Read a single-file raw input
    pub fn read(&self, artifact: Artifact) -> Result<(PathBuf, String)> {
        let path = self
            .path(artifact)
            .ok_or_else(|| PrepError::invalid_config(format!("{artifact} has no single raw file")))?;
        let text = std::fs::read_to_string(&path).map_err(|e| PrepError::io(&path, e))?;
        Ok((path, text))
    }

    /// Shards of a tuples run, in name order. No match is a missing input.
    pub fn tuple_shards(&self, workers: u32, size: u32) -> Result<Vec<PathBuf>> {
        let pattern = Artifact::Tuples { workers, size }
            .raw_name()
            .unwrap_or_default();
        if !self.dir.is_dir() {
            return Err(PrepError::missing_input(&self.dir));
        }
        let glob = Glob::new(&pattern).map_err(|e| PrepError::Glob {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        let mut shards = Vec::new();
        for entry in glob.walk(&self.dir) {
            let entry = entry.map_err(|e| PrepError::Glob {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            if entry.path().is_file() {
                shards.push(entry.path().to_path_buf());
            }
        }
        if shards.is_empty() {
            return Err(PrepError::missing_input(self.dir.join(&pattern)));
        }
        shards.sort();
        log_debug!("Found {count} shards for {pattern}", count: shards.len(), pattern: pattern);
        Ok(shards)
    }
}

/// Directory the stages write to and later stages read back from
#[derive(Debug, Clone)]
pub struct PreppedStore {
    dir: PathBuf,
}

impl PreppedStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, artifact: Artifact) -> PathBuf {
        self.dir.join(artifact.prepped_name())
    }

    /// Truncate and rewrite an artifact
    pub fn write(&self, artifact: Artifact, rows: &[Record]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| PrepError::io(&self.dir, e))?;
        let path = self.path(artifact);
        let file = File::create(&path).map_err(|e| PrepError::io(&path, e))?;
        let mut out = BufWriter::new(file);
        for row in rows {
            writeln!(out, "{}", row.to_line(OUTPUT_DELIMITER)).map_err(|e| PrepError::io(&path, e))?;
        }
        out.flush().map_err(|e| PrepError::io(&path, e))?;
        Ok(path)
    }

    /// Every row of an artifact written by an earlier stage
    pub fn read_rows(&self, artifact: Artifact) -> Result<Vec<Record>> {
        let path = self.path(artifact);
        let text = std::fs::read_to_string(&path).map_err(|e| PrepError::io(&path, e))?;
        text.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                Record::parse_whitespace(line).map_err(|e| PrepError::malformed(&path, i + 1, e.to_string()))
            })
            .collect()
    }

    /// Rows of an artifact, verified to be in order of `key`
    pub fn read_keyed(&self, artifact: Artifact, key: Column) -> Result<Keyed> {
        let rows = self.read_rows(artifact)?;
        Keyed::check(rows, key).in_file(self.path(artifact))
    }
}
