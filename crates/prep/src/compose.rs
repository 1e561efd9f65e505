// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Latency against throughput for one (workers, size) pair.
//!
//! Latency comes from column 2 of the prepped st file. Throughput samples
//! come from joining the st file with the prepped tc file on the key and
//! taking `round(tc / key)` per row. Each side is summarized into a
//! distribution, and the two distributions are joined on their running
//! count, which lines up equal percentiles.
//!
//! Output columns:
//! `rank latency latency_count throughput throughput_count throughput_volume`

use diagnostics::{log_debug, log_info, log_warn};
use tabular::{Column, Distribution, Keyed, Record, Sorted, Value, merge_join, ratio};

use crate::config::PrepConfig;
use crate::error::{Result, TableContext};
use crate::stage::StageOutput;
use crate::store::{Artifact, PreppedStore};

/// Count column of prepped tc rows
const TC_COUNT: Column = Column::nth(2);

/// Latency column of prepped st rows
pub const LATENCY: Column = Column::nth(2);
/// Transaction count column of the st/tc join
pub const JOINED_COUNT: Column = Column::nth(3);

/// `throughput` in the composed file
pub const THROUGHPUT: Column = Column::nth(4);
/// `throughput_count` in the composed file
pub const THROUGHPUT_COUNT: Column = Column::nth(5);
/// `throughput_volume` (throughput × count) in the composed file
pub const THROUGHPUT_VOLUME: Column = Column::nth(6);

pub fn compose_lat_vs_tp(
    config: &PrepConfig,
    prepped: &PreppedStore,
    workers: u32,
    size: u32,
) -> Result<StageOutput> {
    let st_artifact = Artifact::SingleThread { workers, size };
    let tc_artifact = Artifact::TransactionCounts {
        workers: config.reference_workers,
        size,
    };
    let artifact = Artifact::LatVsTp { workers, size };

    let st = prepped.read_keyed(st_artifact, Column::KEY)?;
    let tc = prepped.read_keyed(tc_artifact, Column::KEY)?;
    require_column(&tc, TC_COUNT).in_file(prepped.path(tc_artifact))?;

    // With tc rows complete, any remaining shortfall is in the st rows
    let rows = lat_vs_tp(&st, &tc).in_file(prepped.path(st_artifact))?;
    if rows.is_empty() {
        log_warn!("No matching samples for {artifact}, writing an empty file",
                  artifact: artifact.to_string());
    }

    let path = prepped.write(artifact, &rows)?;
    log_info!("Wrote {rows} rows to {path}",
              rows: rows.len(),
              path: path.display().to_string());

    Ok(StageOutput {
        artifact,
        path,
        rows: rows.len(),
    })
}

fn require_column(table: &Keyed, column: Column) -> tabular::Result<()> {
    for (i, row) in table.rows().iter().enumerate() {
        row.require(column, i)?;
    }
    Ok(())
}

/// Compose in memory from key-ordered st and tc rows
pub fn lat_vs_tp(st: &Keyed, tc: &Keyed) -> tabular::Result<Vec<Record>> {
    let latencies = st
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| row.require(LATENCY, i))
        .collect::<tabular::Result<Vec<Value>>>()?;
    let latency = Distribution::summarize(&Sorted::sort(latencies));

    let joined = merge_join(st, tc);
    let rates = ratio(&joined, JOINED_COUNT, Column::KEY)?;
    log_debug!("Joined {joined} st/tc rows, {undefined} without a defined rate",
               joined: joined.len(),
               undefined: rates.undefined);
    let throughput = Distribution::summarize(&Sorted::sort(rates.values));

    log_debug!("{latencies} latency and {rates} throughput samples",
               latencies: latency.samples(),
               rates: throughput.samples());

    let aligned = merge_join(&latency.keyed_by_rank(), &throughput.keyed_by_rank());
    Ok(aligned
        .into_iter()
        .map(|mut row| {
            let volume = match (row.get(THROUGHPUT), row.get(THROUGHPUT_COUNT)) {
                (Some(tp), Some(count)) => Value::new(tp.get() * count.get()),
                _ => Value::ZERO,
            };
            row.push(volume);
            row
        })
        .collect())
}
