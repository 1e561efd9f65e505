// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Row filter and normalizer: raw `|`-delimited rows in, sorted numeric
//! records out.
//!
//! | kind              | raw fields              | output                | zero rows |
//! |-------------------|-------------------------|-----------------------|-----------|
//! | Tuples            | `key\|value\|timestamp` | `key value`           | kept      |
//! | TransactionCounts | `key\|count`           | `key count/workers`   | dropped   |
//! | SingleThread      | `key\|latency`         | `key latency/workers` | dropped   |
//!
//! Output is sorted by whole-row numeric order; later merge joins rely on it.

use std::path::Path;

use diagnostics::{log_debug, log_warn};
use tabular::{Column, Record, Sorted, Value};

use crate::config::ParsePolicy;
use crate::error::{PrepError, Result};
use crate::store::RAW_DELIMITER;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    Tuples,
    TransactionCounts,
    SingleThread,
}

impl RawKind {
    pub fn field_count(self) -> usize {
        match self {
            RawKind::Tuples => 3,
            RawKind::TransactionCounts | RawKind::SingleThread => 2,
        }
    }

    /// tc and st rows with a zero measurement carry no observation
    pub fn drops_zero_values(self) -> bool {
        !matches!(self, RawKind::Tuples)
    }

    pub fn needs_workers(self) -> bool {
        !matches!(self, RawKind::Tuples)
    }
}

/// Sorted output plus what was thrown away
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub rows: Sorted<Record>,
    /// Malformed rows skipped under the lenient policy
    pub skipped: usize,
    /// Rows removed by the zero filter
    pub zero: usize,
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    kind: RawKind,
    workers: Option<u32>,
    policy: ParsePolicy,
}

impl Normalizer {
    pub fn new(kind: RawKind, policy: ParsePolicy) -> Self {
        Self {
            kind,
            workers: None,
            policy,
        }
    }

    #[must_use]
    pub fn with_workers(mut self, workers: u32) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn normalize(&self, source: &Path, text: &str) -> Result<Normalized> {
        self.normalize_all([(source, text)])
    }

    /// Normalize several inputs as if they were one concatenated file
    pub fn normalize_all<'a, I>(&self, sources: I) -> Result<Normalized>
    where
        I: IntoIterator<Item = (&'a Path, &'a str)>,
    {
        let mut rows = Vec::new();
        let mut skipped = 0;
        let mut zero = 0;

        for (source, text) in sources {
            let divisor = self.divisor(source)?;
            let mut file_skipped = 0;
            for (i, line) in text.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let raw = match self.parse(line) {
                    Ok(raw) => raw,
                    Err(reason) => {
                        if self.policy == ParsePolicy::Strict {
                            return Err(PrepError::malformed(source, i + 1, reason));
                        }
                        log_debug!("Skipping {path}:{line}: {reason}",
                                   path: source.display().to_string(),
                                   line: i + 1,
                                   reason: reason);
                        file_skipped += 1;
                        continue;
                    }
                };
                let row = self.derive(&raw, divisor);
                if self.kind.drops_zero_values()
                    && row.get(Column::nth(2)).is_some_and(Value::is_zero)
                {
                    zero += 1;
                    continue;
                }
                rows.push(row);
            }
            if file_skipped > 0 {
                log_warn!("Skipped {count} malformed rows in {path}",
                          count: file_skipped,
                          path: source.display().to_string());
            }
            skipped += file_skipped;
        }

        Ok(Normalized {
            rows: Sorted::sort(rows),
            skipped,
            zero,
        })
    }

    fn divisor(&self, source: &Path) -> Result<f64> {
        if !self.kind.needs_workers() {
            return Ok(1.0);
        }
        match self.workers {
            Some(workers) if workers > 0 => Ok(f64::from(workers)),
            _ => Err(PrepError::MissingWorkers {
                path: source.to_path_buf(),
            }),
        }
    }

    fn parse(&self, line: &str) -> std::result::Result<Record, String> {
        let found = line.split(RAW_DELIMITER).count();
        let expected = self.kind.field_count();
        if found != expected {
            return Err(format!("expected {expected} fields, found {found}"));
        }
        Record::parse_delimited(line, RAW_DELIMITER).map_err(|e| e.to_string())
    }

    fn derive(&self, raw: &Record, divisor: f64) -> Record {
        let fields = raw.values();
        let key = fields[0];
        let value = fields[1];
        match self.kind {
            RawKind::Tuples => Record::new(vec![key, value]),
            RawKind::TransactionCounts | RawKind::SingleThread => {
                Record::new(vec![key, Value::new(value.get() / divisor)])
            }
        }
    }
}
