// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Scaling curves: one latency point and one throughput point per payload
//! size for a worker count, labelled with the size's dataset size.
//!
//! Both files are rebuilt from scratch on every run, so running the stage
//! twice over the same inputs gives byte-identical output.

use std::collections::BTreeMap;

use diagnostics::{log_info, log_warn};
use tabular::{Record, Value, mean, ratio_of_sums};

use crate::compose::{LATENCY, THROUGHPUT_COUNT, THROUGHPUT_VOLUME};
use crate::config::PrepConfig;
use crate::error::{PrepError, Result, TableContext};
use crate::stage::{Failure, Stage, StageOutput};
use crate::store::{Artifact, PreppedStore};

/// What one worker count's aggregation produced. Each file is written on
/// its own, so one failed write leaves the other result intact.
#[derive(Debug)]
pub struct ScalingOutcome {
    pub latency: Result<StageOutput>,
    pub throughput: Result<StageOutput>,
    /// Sizes that could not contribute a point
    pub failures: Vec<Failure>,
}

/// Aggregate every configured payload size for `workers`.
///
/// `blocked` maps payload sizes to the upstream artifact that failed in this
/// run; those sizes are skipped instead of reading stale files.
pub fn aggregate_scaling(
    config: &PrepConfig,
    prepped: &PreppedStore,
    workers: u32,
    blocked: &BTreeMap<u32, Artifact>,
) -> ScalingOutcome {
    let lat_artifact = Artifact::ScalingLatency { workers };
    let tp_artifact = Artifact::ScalingThroughput { workers };

    let mut latency_rows = Vec::new();
    let mut throughput_rows = Vec::new();
    let mut failures = Vec::new();

    for &size in &config.payload_sizes {
        if let Some(upstream) = blocked.get(&size) {
            for target in [lat_artifact, tp_artifact] {
                failures.push(Failure {
                    stage: Stage::Scaling,
                    target,
                    error: PrepError::upstream(upstream.to_string()),
                });
            }
            continue;
        }
        let Some(dataset) = config.dataset_sizes.get(&size).copied().map(Value::from) else {
            for target in [lat_artifact, tp_artifact] {
                failures.push(Failure {
                    stage: Stage::Scaling,
                    target,
                    error: PrepError::UnmappedPayloadSize { size },
                });
            }
            continue;
        };

        match latency_point(prepped, workers, size) {
            Ok(Some(point)) => latency_rows.push(Record::new(vec![dataset, point])),
            Ok(None) => log_warn!("No latency samples for {workers} workers, size {size}",
                                  workers: workers, size: size),
            Err(error) => failures.push(Failure {
                stage: Stage::Scaling,
                target: lat_artifact,
                error,
            }),
        }

        match throughput_point(prepped, workers, size) {
            Ok(Some(point)) => throughput_rows.push(Record::new(vec![dataset, point])),
            Ok(None) => log_warn!("No throughput samples for {workers} workers, size {size}",
                                  workers: workers, size: size),
            Err(error) => failures.push(Failure {
                stage: Stage::Scaling,
                target: tp_artifact,
                error,
            }),
        }
    }

    let latency = write_curve(prepped, lat_artifact, &latency_rows);
    let throughput = write_curve(prepped, tp_artifact, &throughput_rows);
    log_info!("Scaling for {workers} workers: {lat} latency and {tp} throughput points",
              workers: workers,
              lat: latency_rows.len(),
              tp: throughput_rows.len());

    ScalingOutcome {
        latency,
        throughput,
        failures,
    }
}

fn write_curve(prepped: &PreppedStore, artifact: Artifact, rows: &[Record]) -> Result<StageOutput> {
    let path = prepped.write(artifact, rows)?;
    Ok(StageOutput {
        artifact,
        path,
        rows: rows.len(),
    })
}

/// Mean of the prepped st latencies
fn latency_point(prepped: &PreppedStore, workers: u32, size: u32) -> Result<Option<Value>> {
    let artifact = Artifact::SingleThread { workers, size };
    let rows = prepped.read_rows(artifact)?;
    mean(&rows, LATENCY).in_file(prepped.path(artifact))
}

/// Σ volume / Σ count over the composed file, rounded
fn throughput_point(prepped: &PreppedStore, workers: u32, size: u32) -> Result<Option<Value>> {
    let artifact = Artifact::LatVsTp { workers, size };
    let rows = prepped.read_rows(artifact)?;
    ratio_of_sums(&rows, THROUGHPUT_VOLUME, THROUGHPUT_COUNT).in_file(prepped.path(artifact))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn seed(prepped: &PreppedStore, workers: u32, size: u32, st: &str, lat_vs_tp: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(prepped.dir())?;
        std::fs::write(prepped.path(Artifact::SingleThread { workers, size }), st)?;
        std::fs::write(prepped.path(Artifact::LatVsTp { workers, size }), lat_vs_tp)
    }

    #[test]
    fn test_points_per_size() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let prepped = PreppedStore::new(tmp.path());
        seed(&prepped, 1, 5, "1 10\n2 20\n", "0 10 1 10 2 20\n1 20 1 20 8 160\n")?;
        seed(&prepped, 1, 50, "1 3\n", "0 3 1 4 1 4\n")?;
        seed(&prepped, 1, 200, "1 7\n", "")?;

        let out = aggregate_scaling(&PrepConfig::default(), &prepped, 1, &BTreeMap::new());
        assert!(out.failures.is_empty());

        let lat = std::fs::read_to_string(&out.latency?.path)?;
        assert_eq!(lat, "100000 15\n250000 3\n500000 7\n");

        // size 5: (20 + 160) / (2 + 8) = 18; size 200 has no samples
        let tp = std::fs::read_to_string(&out.throughput?.path)?;
        assert_eq!(tp, "100000 18\n250000 4\n");
        Ok(())
    }

    #[test]
    fn test_rerun_is_byte_identical() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let prepped = PreppedStore::new(tmp.path());
        for size in [5, 50, 200] {
            seed(&prepped, 2, size, "1 4\n3 8\n", "0 4 1 6 1 6\n1 8 1 9 1 9\n")?;
        }
        let config = PrepConfig::default();

        let first = aggregate_scaling(&config, &prepped, 2, &BTreeMap::new());
        let lat_once = std::fs::read(&first.latency?.path)?;
        let tp_once = std::fs::read(&first.throughput?.path)?;

        let second = aggregate_scaling(&config, &prepped, 2, &BTreeMap::new());
        let latency = second.latency?;
        assert_eq!(std::fs::read(&latency.path)?, lat_once);
        assert_eq!(std::fs::read(&second.throughput?.path)?, tp_once);
        assert_eq!(latency.rows, 3);
        Ok(())
    }

    #[test]
    fn test_missing_size_does_not_stop_others() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let prepped = PreppedStore::new(tmp.path());
        seed(&prepped, 4, 5, "1 2\n", "0 2 1 2 1 2\n")?;
        seed(&prepped, 4, 200, "1 6\n", "0 6 1 6 1 6\n")?;

        let mut blocked = BTreeMap::new();
        blocked.insert(200, Artifact::SingleThread { workers: 4, size: 200 });

        let out = aggregate_scaling(&PrepConfig::default(), &prepped, 4, &blocked);
        assert_eq!(std::fs::read_to_string(&out.latency?.path)?, "100000 2\n");

        // size 50 is missing on disk, size 200 is blocked upstream
        assert_eq!(out.failures.len(), 4);
        assert!(out.failures.iter().any(|f| f.error.is_missing_input()));
        assert!(
            out.failures
                .iter()
                .any(|f| matches!(f.error, PrepError::UpstreamFailed { .. }))
        );
        Ok(())
    }

    #[test]
    fn test_failed_write_names_its_own_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let prepped = PreppedStore::new(tmp.path());
        let config = PrepConfig {
            payload_sizes: vec![5],
            ..PrepConfig::default()
        };
        seed(&prepped, 1, 5, "1 10\n", "0 10 1 2 1 2\n")?;
        // A directory where the throughput curve goes cannot be written
        std::fs::create_dir_all(prepped.path(Artifact::ScalingThroughput { workers: 1 }))?;

        let out = aggregate_scaling(&config, &prepped, 1, &BTreeMap::new());
        assert!(out.failures.is_empty());

        let latency = out.latency?;
        assert_eq!(latency.artifact, Artifact::ScalingLatency { workers: 1 });
        assert_eq!(std::fs::read_to_string(&latency.path)?, "100000 10\n");

        let err = out.throughput.expect_err("directory in the way");
        assert!(matches!(err, PrepError::Io { ref path, .. } if path.ends_with("prepped_scaling_tp_1.csv")));
        Ok(())
    }
}
