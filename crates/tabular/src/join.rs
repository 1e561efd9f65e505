// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Sorted merge join and the projections applied to its output.

use std::cmp::Ordering;

use crate::error::Result;
use crate::record::{Column, Record, Value};
use crate::sorted::Keyed;

/// Inner equi-join of two key-ordered inputs.
///
/// Each output row is the key, then the left row's other columns, then the
/// right row's other columns. Rows that share a key produce the full cross
/// product: every left row of the run (in input order) paired with every
/// right row of the run (in input order). Runs in O(n + m + output).
pub fn merge_join(left: &Keyed, right: &Keyed) -> Vec<Record> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < left.len() && j < right.len() {
        let lk = left.key_at(i);
        let rk = right.key_at(j);
        match lk.cmp(&rk) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                let i_end = run_end(left, i, lk);
                let j_end = run_end(right, j, rk);
                for l in &left.rows()[i..i_end] {
                    for r in &right.rows()[j..j_end] {
                        out.push(combine(lk, l, left.key(), r, right.key()));
                    }
                }
                i = i_end;
                j = j_end;
            }
        }
    }
    out
}

fn run_end(side: &Keyed, start: usize, key: Value) -> usize {
    let mut end = start + 1;
    while end < side.len() && side.key_at(end) == key {
        end += 1;
    }
    end
}

fn combine(key: Value, left: &Record, lkey: Column, right: &Record, rkey: Column) -> Record {
    let mut row = Record::new(Vec::with_capacity(left.width() + right.width() - 1));
    row.push(key);
    for (c, v) in left.values().iter().enumerate() {
        if c != lkey.index() {
            row.push(*v);
        }
    }
    for (c, v) in right.values().iter().enumerate() {
        if c != rkey.index() {
            row.push(*v);
        }
    }
    row
}

/// Select and reorder columns of every row
pub fn project(rows: &[Record], columns: &[Column]) -> Result<Vec<Record>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| columns.iter().map(|c| row.require(*c, i)).collect::<Result<Record>>())
        .collect()
}

/// Per-row `round(numerator / denominator)`
#[derive(Debug, Clone, PartialEq)]
pub struct Ratios {
    pub values: Vec<Value>,
    /// Rows dropped because the denominator was zero
    pub undefined: usize,
}

pub fn ratio(rows: &[Record], numerator: Column, denominator: Column) -> Result<Ratios> {
    let mut values = Vec::with_capacity(rows.len());
    let mut undefined = 0;
    for (i, row) in rows.iter().enumerate() {
        let num = row.require(numerator, i)?;
        let den = row.require(denominator, i)?;
        if den.is_zero() {
            undefined += 1;
            continue;
        }
        values.push(Value::new(num.get() / den.get()).round());
    }
    Ok(Ratios { values, undefined })
}
