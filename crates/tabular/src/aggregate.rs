// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Column aggregates used for scaling curves.

use crate::error::Result;
use crate::record::{Column, Record, Value};

/// Arithmetic mean of one column; `None` when there are no rows
pub fn mean(rows: &[Record], column: Column) -> Result<Option<Value>> {
    if rows.is_empty() {
        return Ok(None);
    }
    let mut sum = 0.0;
    for (i, row) in rows.iter().enumerate() {
        sum += row.require(column, i)?.get();
    }
    Ok(Some(Value::new(sum / rows.len() as f64)))
}

/// `round(Σ numerator / Σ denominator)`.
///
/// This weights every row by its denominator, which is what a rate over
/// several samples means. It is not the mean of the per-row ratios.
/// `None` when the denominators sum to zero.
pub fn ratio_of_sums(rows: &[Record], numerator: Column, denominator: Column) -> Result<Option<Value>> {
    let mut num = 0.0;
    let mut den = 0.0;
    for (i, row) in rows.iter().enumerate() {
        num += row.require(numerator, i)?.get();
        den += row.require(denominator, i)?.get();
    }
    if den == 0.0 {
        return Ok(None);
    }
    Ok(Some(Value::new(num / den).round()))
}
