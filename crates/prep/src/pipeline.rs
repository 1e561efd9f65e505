// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Runs stages over the configured grid.
//!
//! Every (stage, pair) is attempted on its own. A failure is recorded in the
//! [`RunReport`] and never stops its siblings. Work that depends on an
//! artifact that failed earlier in the same run is skipped with
//! `UpstreamFailed` so stale files from a previous run are not read.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use diagnostics::{log_error, log_info};

use crate::compose::compose_lat_vs_tp;
use crate::config::PrepConfig;
use crate::error::{PrepError, Result};
use crate::measurements::{prep_single_thread, prep_transaction_counts};
use crate::scaling::aggregate_scaling;
use crate::stage::{Failure, Stage, StageOutput};
use crate::store::{Artifact, PreppedStore, RawStore};
use crate::tuples::prep_tuples;

#[derive(Debug, Default)]
pub struct RunReport {
    pub outputs: Vec<StageOutput>,
    pub failures: Vec<Failure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Outputs written by one stage
    pub fn outputs_of(&self, stage: Stage) -> impl Iterator<Item = &StageOutput> {
        self.outputs.iter().filter(move |o| stage_of(o.artifact) == stage)
    }

    fn record(&mut self, stage: Stage, target: Artifact, result: Result<StageOutput>) {
        match result {
            Ok(output) => self.outputs.push(output),
            Err(error) => self.fail(Failure {
                stage,
                target,
                error,
            }),
        }
    }

    fn fail(&mut self, failure: Failure) {
        log_error!("{failure}", failure: failure.to_string());
        self.failures.push(failure);
    }

    fn failed(&self, artifact: Artifact) -> bool {
        self.failures.iter().any(|f| f.target == artifact)
    }

    /// The first of `upstream` that failed in this run
    fn blocked_by(&self, upstream: &[Artifact]) -> Option<Artifact> {
        upstream.iter().copied().find(|a| self.failed(*a))
    }
}

/// A raw input the grid reads
#[derive(Debug, Clone, PartialEq)]
pub struct RequiredInput {
    pub artifact: Artifact,
    /// File path, or the shard pattern for tuples
    pub path: PathBuf,
    pub present: bool,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PrepConfig,
    raw: RawStore,
    prepped: PreppedStore,
}

impl Pipeline {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(config: PrepConfig, input_dir: P, output_dir: Q) -> Result<Self> {
        config.validate()?;
        config.warn_unused();
        Ok(Self {
            config,
            raw: RawStore::new(input_dir),
            prepped: PreppedStore::new(output_dir),
        })
    }

    pub fn config(&self) -> &PrepConfig {
        &self.config
    }

    pub fn raw(&self) -> &RawStore {
        &self.raw
    }

    pub fn prepped(&self) -> &PreppedStore {
        &self.prepped
    }

    /// Run the given stages in dependency order, each at most once
    pub fn run(&self, stages: &[Stage]) -> RunReport {
        let stages: BTreeSet<Stage> = stages.iter().copied().collect();
        let mut report = RunReport::default();

        for stage in stages {
            log_info!("Running stage {stage}", stage: stage.name());
            match stage {
                Stage::Tuples => self.run_tuples(&mut report),
                Stage::TransactionCounts => self.run_transaction_counts(&mut report),
                Stage::SingleThread => self.run_single_thread(&mut report),
                Stage::LatVsTp => self.run_lat_vs_tp(&mut report),
                Stage::Scaling => self.run_scaling(&mut report),
            }
        }

        log_info!("Run finished: {outputs} files written, {failures} failures",
                  outputs: report.outputs.len(),
                  failures: report.failures.len());
        report
    }

    fn run_tuples(&self, report: &mut RunReport) {
        for &size in &self.config.payload_sizes {
            let target = Artifact::Tuples {
                workers: self.config.reference_workers,
                size,
            };
            let result = prep_tuples(&self.config, &self.raw, &self.prepped, size);
            report.record(Stage::Tuples, target, result);
        }
    }

    fn run_transaction_counts(&self, report: &mut RunReport) {
        for &size in &self.config.payload_sizes {
            let target = self.tc_artifact(size);
            let result = prep_transaction_counts(&self.config, &self.raw, &self.prepped, size);
            report.record(Stage::TransactionCounts, target, result);
        }
    }

    fn run_single_thread(&self, report: &mut RunReport) {
        for &workers in &self.config.worker_counts {
            for &size in &self.config.payload_sizes {
                let target = Artifact::SingleThread { workers, size };
                let result = prep_single_thread(&self.config, &self.raw, &self.prepped, workers, size);
                report.record(Stage::SingleThread, target, result);
            }
        }
    }

    fn run_lat_vs_tp(&self, report: &mut RunReport) {
        for &workers in &self.config.worker_counts {
            for &size in &self.config.payload_sizes {
                let target = Artifact::LatVsTp { workers, size };
                let upstream = [
                    Artifact::SingleThread { workers, size },
                    self.tc_artifact(size),
                ];
                let result = match report.blocked_by(&upstream) {
                    Some(failed) => Err(PrepError::upstream(failed.to_string())),
                    None => compose_lat_vs_tp(&self.config, &self.prepped, workers, size),
                };
                report.record(Stage::LatVsTp, target, result);
            }
        }
    }

    fn run_scaling(&self, report: &mut RunReport) {
        for &workers in &self.config.worker_counts {
            let blocked: BTreeMap<u32, Artifact> = self
                .config
                .payload_sizes
                .iter()
                .filter_map(|&size| {
                    let upstream = [
                        Artifact::SingleThread { workers, size },
                        Artifact::LatVsTp { workers, size },
                    ];
                    report.blocked_by(&upstream).map(|failed| (size, failed))
                })
                .collect();

            let outcome = aggregate_scaling(&self.config, &self.prepped, workers, &blocked);
            for failure in outcome.failures {
                report.fail(failure);
            }
            report.record(Stage::Scaling, Artifact::ScalingLatency { workers }, outcome.latency);
            report.record(Stage::Scaling, Artifact::ScalingThroughput { workers }, outcome.throughput);
        }
    }

    fn tc_artifact(&self, size: u32) -> Artifact {
        Artifact::TransactionCounts {
            workers: self.config.reference_workers,
            size,
        }
    }

    /// Raw inputs the given stages read, in grid order
    pub fn required_inputs(&self, stages: &[Stage]) -> Vec<RequiredInput> {
        let stages: BTreeSet<Stage> = stages.iter().copied().collect();
        let mut inputs = Vec::new();

        if stages.contains(&Stage::Tuples) {
            for &size in &self.config.payload_sizes {
                let workers = self.config.reference_workers;
                let artifact = Artifact::Tuples { workers, size };
                inputs.push(RequiredInput {
                    artifact,
                    path: self.raw.dir().join(artifact.raw_name().unwrap_or_default()),
                    present: self.raw.tuple_shards(workers, size).is_ok(),
                });
            }
        }
        if stages.contains(&Stage::TransactionCounts) {
            for &size in &self.config.payload_sizes {
                inputs.extend(self.single_file_input(self.tc_artifact(size)));
            }
        }
        if stages.contains(&Stage::SingleThread) {
            for &workers in &self.config.worker_counts {
                for &size in &self.config.payload_sizes {
                    inputs.extend(self.single_file_input(Artifact::SingleThread { workers, size }));
                }
            }
        }
        inputs
    }

    pub fn missing_inputs(&self, stages: &[Stage]) -> Vec<RequiredInput> {
        self.required_inputs(stages)
            .into_iter()
            .filter(|input| !input.present)
            .collect()
    }

    fn single_file_input(&self, artifact: Artifact) -> Option<RequiredInput> {
        let path = self.raw.path(artifact)?;
        Some(RequiredInput {
            artifact,
            present: path.is_file(),
            path,
        })
    }
}

fn stage_of(artifact: Artifact) -> Stage {
    match artifact {
        Artifact::Tuples { .. } => Stage::Tuples,
        Artifact::TransactionCounts { .. } => Stage::TransactionCounts,
        Artifact::SingleThread { .. } => Stage::SingleThread,
        Artifact::LatVsTp { .. } => Stage::LatVsTp,
        Artifact::ScalingLatency { .. } | Artifact::ScalingThroughput { .. } => Stage::Scaling,
    }
}
