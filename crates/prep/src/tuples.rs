// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Tuples: concatenate every shard of a run, project, sort.
//!
//! Unlike tc and st files there is no worker division and no zero filter.

use diagnostics::log_info;

use crate::config::PrepConfig;
use crate::error::{PrepError, Result};
use crate::normalize::{Normalizer, RawKind};
use crate::stage::StageOutput;
use crate::store::{Artifact, PreppedStore, RawStore};

pub fn prep_tuples(
    config: &PrepConfig,
    raw: &RawStore,
    prepped: &PreppedStore,
    size: u32,
) -> Result<StageOutput> {
    let workers = config.reference_workers;
    let artifact = Artifact::Tuples { workers, size };

    let shards = raw.tuple_shards(workers, size)?;
    let texts = shards
        .iter()
        .map(|path| std::fs::read_to_string(path).map_err(|e| PrepError::io(path, e)))
        .collect::<Result<Vec<_>>>()?;

    let normalized = Normalizer::new(RawKind::Tuples, config.parse_policy).normalize_all(
        shards
            .iter()
            .zip(&texts)
            .map(|(path, text)| (path.as_path(), text.as_str())),
    )?;

    let path = prepped.write(artifact, &normalized.rows)?;
    log_info!("Wrote {rows} rows from {shards} shards to {path} ({skipped} malformed dropped)",
              rows: normalized.rows.len(),
              shards: shards.len(),
              path: path.display().to_string(),
              skipped: normalized.skipped);

    Ok(StageOutput {
        artifact,
        path,
        rows: normalized.rows.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_shards_are_merged_and_zeros_kept() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let raw_dir = tmp.path().join("raw");
        std::fs::create_dir_all(&raw_dir)?;
        std::fs::write(raw_dir.join("tuples_32_5_0"), "4|0|10\n2|9|11\n")?;
        std::fs::write(raw_dir.join("tuples_32_5_1"), "3|1|12\nbad row\n")?;

        let config = PrepConfig::default();
        let prepped = PreppedStore::new(tmp.path().join("out"));
        let out = prep_tuples(&config, &RawStore::new(&raw_dir), &prepped, 5)?;

        assert_eq!(out.rows, 3);
        let text = std::fs::read_to_string(prepped.path(out.artifact))?;
        assert_eq!(text, "2 9\n3 1\n4 0\n");
        assert!(out.path.ends_with("prepped_tuples_32_5.csv"));
        Ok(())
    }

    #[test]
    fn test_no_shards_is_missing_input() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        let err = prep_tuples(
            &PrepConfig::default(),
            &RawStore::new(tmp.path()),
            &PreppedStore::new(tmp.path()),
            50,
        )
        .expect_err("no shards");
        assert!(err.is_missing_input());
        Ok(())
    }
}
