// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use prep::{Artifact, Pipeline, PrepConfig, PrepError, Stage};
use tabular::{Record, Sorted};
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Raw files for one worker count over the default payload sizes
fn write_raw_grid(dir: &Path) -> std::io::Result<()> {
    for size in [5, 50, 200] {
        std::fs::write(dir.join(format!("tc_32_{size}.csv")), "3|96\n1|32\n2|64\n")?;
        std::fs::write(dir.join(format!("st_1_{size}.csv")), "2|20\n1|10\n3|30\n4|0\n")?;
        std::fs::write(dir.join(format!("tuples_32_{size}_0")), "2|7|100\n1|0|101\n")?;
        std::fs::write(dir.join(format!("tuples_32_{size}_1")), "1|5|102\n")?;
    }
    Ok(())
}

fn one_worker() -> PrepConfig {
    PrepConfig {
        worker_counts: vec![1],
        ..PrepConfig::default()
    }
}

fn read(dir: &Path, name: &str) -> std::io::Result<String> {
    std::fs::read_to_string(dir.join(name))
}

#[test]
fn test_full_run_over_grid() -> TestResult {
    let tmp = tempdir()?;
    let raw = tmp.path().join("raw");
    let out = tmp.path().join("prepped");
    std::fs::create_dir_all(&raw)?;
    write_raw_grid(&raw)?;

    let pipeline = Pipeline::new(one_worker(), &raw, &out)?;
    let report = pipeline.run(&Stage::ALL);
    assert!(report.is_success(), "{:?}", report.failures);

    assert_eq!(read(&out, "prepped_tc_32_5.csv")?, "1 1\n2 2\n3 3\n");
    assert_eq!(read(&out, "prepped_st_1_50.csv")?, "1 10\n2 20\n3 30\n");
    assert_eq!(read(&out, "prepped_tuples_32_200.csv")?, "1 0\n1 5\n2 7\n");

    // Every key gives throughput 1, so the whole throughput side is one bucket
    assert_eq!(read(&out, "prepped_lat_vs_tp_1_5.csv")?, "0 10 1 1 3 3\n");

    assert_eq!(
        read(&out, "prepped_scaling_lat_1.csv")?,
        "100000 20\n250000 20\n500000 20\n"
    );
    assert_eq!(
        read(&out, "prepped_scaling_tp_1.csv")?,
        "100000 1\n250000 1\n500000 1\n"
    );
    Ok(())
}

#[test]
fn test_rerun_is_byte_identical() -> TestResult {
    let tmp = tempdir()?;
    let raw = tmp.path().join("raw");
    let out = tmp.path().join("prepped");
    std::fs::create_dir_all(&raw)?;
    write_raw_grid(&raw)?;

    let pipeline = Pipeline::new(one_worker(), &raw, &out)?;
    let first = pipeline.run(&Stage::ALL);
    let snapshot: Vec<(String, Vec<u8>)> = first
        .outputs
        .iter()
        .map(|o| -> std::io::Result<(String, Vec<u8>)> {
            Ok((o.artifact.to_string(), std::fs::read(&o.path)?))
        })
        .collect::<std::io::Result<_>>()?;

    let second = pipeline.run(&Stage::ALL);
    assert_eq!(second.outputs.len(), first.outputs.len());
    for (name, bytes) in snapshot {
        assert_eq!(std::fs::read(out.join(&name))?, bytes, "{name} changed");
    }
    Ok(())
}

#[test]
fn test_missing_pair_does_not_stop_siblings() -> TestResult {
    let tmp = tempdir()?;
    let raw = tmp.path().join("raw");
    let out = tmp.path().join("prepped");
    std::fs::create_dir_all(&raw)?;
    write_raw_grid(&raw)?;
    std::fs::remove_file(raw.join("st_1_50.csv"))?;

    let pipeline = Pipeline::new(one_worker(), &raw, &out)?;
    let report = pipeline.run(&Stage::ALL);

    // st itself, the composed file, and both scaling points for size 50
    assert_eq!(report.failures.len(), 4, "{:?}", report.failures);
    assert!(report.failures[0].error.is_missing_input());
    assert_eq!(report.failures[0].target, Artifact::SingleThread { workers: 1, size: 50 });
    assert!(
        report.failures[1..]
            .iter()
            .all(|f| matches!(f.error, PrepError::UpstreamFailed { .. }))
    );

    assert!(out.join("prepped_lat_vs_tp_1_5.csv").exists());
    assert!(out.join("prepped_lat_vs_tp_1_200.csv").exists());
    assert!(!out.join("prepped_lat_vs_tp_1_50.csv").exists());
    assert_eq!(read(&out, "prepped_scaling_lat_1.csv")?, "100000 20\n500000 20\n");
    Ok(())
}

#[test]
fn test_normalized_outputs_are_sorted_and_zero_free() -> TestResult {
    let tmp = tempdir()?;
    std::fs::write(
        tmp.path().join("st_2_5.csv"),
        "10|4\n2|8\n2|6\n7|0\n1|14\nnot|a row\n3|2\n",
    )?;
    let config = PrepConfig {
        payload_sizes: vec![5],
        worker_counts: vec![2],
        ..PrepConfig::default()
    };

    let pipeline = Pipeline::new(config, tmp.path(), tmp.path())?;
    let report = pipeline.run(&[Stage::SingleThread]);
    assert!(report.is_success());

    let rows = pipeline
        .prepped()
        .read_rows(Artifact::SingleThread { workers: 2, size: 5 })?;
    assert_eq!(rows.len(), 5);
    assert!(Sorted::try_from_sorted(rows.clone()).is_ok());
    assert!(rows.iter().all(|r| r.values().iter().all(|v| !v.is_zero())));
    assert_eq!(rows[1], Record::from([2.0, 3.0]));
    Ok(())
}

#[test]
fn test_scaling_reads_files_from_an_earlier_run() -> TestResult {
    let tmp = tempdir()?;
    let raw = tmp.path().join("raw");
    let out = tmp.path().join("prepped");
    std::fs::create_dir_all(&raw)?;
    write_raw_grid(&raw)?;

    let pipeline = Pipeline::new(one_worker(), &raw, &out)?;
    let first = pipeline.run(&[Stage::TransactionCounts, Stage::SingleThread, Stage::LatVsTp]);
    assert!(first.is_success());

    let second = pipeline.run(&[Stage::Scaling]);
    assert!(second.is_success());
    assert_eq!(second.outputs.len(), 2);
    assert_eq!(
        read(&out, "prepped_scaling_tp_1.csv")?,
        "100000 1\n250000 1\n500000 1\n"
    );
    Ok(())
}

#[test]
fn test_scaling_write_failure_is_reported_per_file() -> TestResult {
    let tmp = tempdir()?;
    let raw = tmp.path().join("raw");
    let out = tmp.path().join("prepped");
    std::fs::create_dir_all(&raw)?;
    write_raw_grid(&raw)?;

    let pipeline = Pipeline::new(one_worker(), &raw, &out)?;
    assert!(pipeline.run(&Stage::ALL).is_success());

    let tp_path = out.join("prepped_scaling_tp_1.csv");
    std::fs::remove_file(&tp_path)?;
    std::fs::create_dir(&tp_path)?;

    let report = pipeline.run(&[Stage::Scaling]);
    let targets: Vec<Artifact> = report.failures.iter().map(|f| f.target).collect();
    assert_eq!(targets, vec![Artifact::ScalingThroughput { workers: 1 }]);

    let written: Vec<Artifact> = report.outputs.iter().map(|o| o.artifact).collect();
    assert_eq!(written, vec![Artifact::ScalingLatency { workers: 1 }]);
    assert_eq!(
        read(&out, "prepped_scaling_lat_1.csv")?,
        "100000 20\n250000 20\n500000 20\n"
    );
    Ok(())
}
