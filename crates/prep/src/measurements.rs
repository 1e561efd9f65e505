// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Transaction-count and single-thread files: per-worker normalization with
//! the zero filter.

use diagnostics::log_info;

use crate::config::PrepConfig;
use crate::error::Result;
use crate::normalize::{Normalizer, RawKind};
use crate::stage::StageOutput;
use crate::store::{Artifact, PreppedStore, RawStore};

/// `tc_<reference>_<size>.csv` to `prepped_tc_<reference>_<size>.csv`
pub fn prep_transaction_counts(
    config: &PrepConfig,
    raw: &RawStore,
    prepped: &PreppedStore,
    size: u32,
) -> Result<StageOutput> {
    let workers = config.reference_workers;
    prep_measurement(
        config,
        raw,
        prepped,
        RawKind::TransactionCounts,
        Artifact::TransactionCounts { workers, size },
        workers,
    )
}

/// `st_<workers>_<size>.csv` to `prepped_st_<workers>_<size>.csv`
pub fn prep_single_thread(
    config: &PrepConfig,
    raw: &RawStore,
    prepped: &PreppedStore,
    workers: u32,
    size: u32,
) -> Result<StageOutput> {
    prep_measurement(
        config,
        raw,
        prepped,
        RawKind::SingleThread,
        Artifact::SingleThread { workers, size },
        workers,
    )
}

fn prep_measurement(
    config: &PrepConfig,
    raw: &RawStore,
    prepped: &PreppedStore,
    kind: RawKind,
    artifact: Artifact,
    workers: u32,
) -> Result<StageOutput> {
    let (source, text) = raw.read(artifact)?;
    let normalized = Normalizer::new(kind, config.parse_policy)
        .with_workers(workers)
        .normalize(&source, &text)?;

    let path = prepped.write(artifact, &normalized.rows)?;
    log_info!("Wrote {rows} rows to {path} ({zero} zero, {skipped} malformed dropped)",
              rows: normalized.rows.len(),
              path: path.display().to_string(),
              zero: normalized.zero,
              skipped: normalized.skipped);

    Ok(StageOutput {
        artifact,
        path,
        rows: normalized.rows.len(),
    })
}
