// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The parameter grid every stage iterates.
//!
//! One `PrepConfig` is passed to every stage, so payload sizes, worker counts
//! and the size-to-dataset mapping cannot drift apart between loops. It loads
//! from YAML; every field defaults to the reference benchmark grid.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use diagnostics::log_warn;
use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// What to do with a raw row that does not fit its file's layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Skip the row and count it
    #[default]
    Lenient,
    /// Fail the stage for this file
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrepConfig {
    /// Payload sizes to iterate, in output order
    pub payload_sizes: Vec<u32>,
    /// Worker counts to iterate
    pub worker_counts: Vec<u32>,
    /// Worker count of the tuples and transaction-count runs
    pub reference_workers: u32,
    /// Logical dataset size reported for each payload size
    pub dataset_sizes: BTreeMap<u32, u64>,
    pub parse_policy: ParsePolicy,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            payload_sizes: vec![5, 50, 200],
            worker_counts: vec![1, 2, 4, 8, 16, 32],
            reference_workers: 32,
            dataset_sizes: BTreeMap::from([
                (5, 100_000),
                (50, 250_000),
                (200, 500_000),
                (500, 1_000_000),
            ]),
            parse_policy: ParsePolicy::Lenient,
        }
    }
}

impl PrepConfig {
    /// Load and validate a YAML configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|e| PrepError::io(&path, e))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: PrepConfig = serde_yaml_ng::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.payload_sizes.is_empty() {
            return Err(PrepError::invalid_config("payload_sizes cannot be empty"));
        }
        if self.worker_counts.is_empty() {
            return Err(PrepError::invalid_config("worker_counts cannot be empty"));
        }
        if self.reference_workers == 0 || self.worker_counts.contains(&0) {
            return Err(PrepError::invalid_config("worker counts must be greater than 0"));
        }
        if let Some(dup) = first_duplicate(&self.payload_sizes) {
            return Err(PrepError::invalid_config(format!(
                "payload size {dup} listed twice"
            )));
        }
        if let Some(dup) = first_duplicate(&self.worker_counts) {
            return Err(PrepError::invalid_config(format!(
                "worker count {dup} listed twice"
            )));
        }
        for size in &self.payload_sizes {
            self.dataset_size(*size)?;
        }
        Ok(())
    }

    pub fn dataset_size(&self, payload_size: u32) -> Result<u64> {
        self.dataset_sizes
            .get(&payload_size)
            .copied()
            .ok_or(PrepError::UnmappedPayloadSize { size: payload_size })
    }

    /// Sizes with a dataset mapping that no loop iterates
    pub fn unused_dataset_sizes(&self) -> Vec<u32> {
        self.dataset_sizes
            .keys()
            .filter(|size| !self.payload_sizes.contains(size))
            .copied()
            .collect()
    }

    /// Tell the operator about mapped sizes that are never processed.
    /// They are kept as declared, not dropped and not added to the loop.
    pub fn warn_unused(&self) {
        for size in self.unused_dataset_sizes() {
            let dataset = self.dataset_sizes.get(&size).copied().unwrap_or_default();
            log_warn!(
                "Payload size {size} maps to dataset size {dataset} but is not in payload_sizes",
                size: size,
                dataset: dataset
            );
        }
    }

    /// Restrict the grid to the given sizes and worker counts
    pub fn restrict(&mut self, sizes: Option<Vec<u32>>, workers: Option<Vec<u32>>) -> Result<()> {
        if let Some(sizes) = sizes {
            self.payload_sizes = sizes;
        }
        if let Some(workers) = workers {
            self.worker_counts = workers;
        }
        self.validate()
    }
}

fn first_duplicate(values: &[u32]) -> Option<u32> {
    let mut seen = BTreeSet::new();
    values.iter().copied().find(|v| !seen.insert(*v))
}
