// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Frequency distributions with an exclusive running count.
//!
//! Each distinct value gets one [`Bucket`] holding how often it occurred and
//! how many observations were strictly smaller. That running count works as
//! a rank, so two distributions over the same number of samples can be
//! joined on it to line up equal percentiles.

use crate::record::{Column, Record, Value};
use crate::sorted::{Keyed, Sorted};

/// One distinct value of a distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub value: Value,
    pub count: u64,
    /// Observations strictly smaller than `value`
    pub before: u64,
}

impl Bucket {
    pub fn to_record(&self) -> Record {
        Record::new(vec![
            self.value,
            Value::from(self.count),
            Value::from(self.before),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    buckets: Vec<Bucket>,
}

impl Distribution {
    /// Column of [`Bucket::to_record`] rows holding `before`
    pub const RANK: Column = Column::nth(3);

    /// Group equal neighbours and count them, ascending by value
    pub fn summarize(values: &Sorted<Value>) -> Self {
        let mut buckets: Vec<Bucket> = Vec::new();
        let mut seen = 0u64;
        for value in values {
            match buckets.last_mut() {
                Some(last) if last.value == *value => last.count += 1,
                _ => buckets.push(Bucket {
                    value: *value,
                    count: 1,
                    before: seen,
                }),
            }
            seen += 1;
        }
        Distribution { buckets }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of observations
    pub fn samples(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// `(value, count, before)` rows
    pub fn to_records(&self) -> Vec<Record> {
        self.buckets.iter().map(Bucket::to_record).collect()
    }

    /// Rows keyed on the running count, ready to join with another
    /// distribution. `before` strictly increases, so no sort is needed.
    pub fn keyed_by_rank(&self) -> Keyed {
        Keyed::built_in_order(self.to_records(), Self::RANK)
    }
}
