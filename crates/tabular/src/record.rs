// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Numeric records: the only row shape the preparation stages deal in.
//!
//! Every field of a benchmark row is a number, so a record is a list of
//! [`Value`]s. `Value` orders with `f64::total_cmp`, which makes the derived
//! `Ord` on [`Record`] the numeric, field-by-field comparison of whole rows.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A totally ordered `f64`
#[derive(Debug, Clone, Copy, Default)]
pub struct Value(f64);

impl Value {
    pub const ZERO: Value = Value(0.0);

    pub const fn new(value: f64) -> Self {
        Value(value)
    }

    pub const fn get(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// Round half away from zero
    #[must_use]
    pub fn round(self) -> Self {
        Value(self.0.round())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Shortest round-trip form: 3.0 prints as "3", 2.5 as "2.5"
        write!(f, "{}", self.0)
    }
}

impl FromStr for Value {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let field = s.trim();
        match field.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Value(v)),
            _ => Err(Error::parse(field)),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value(value as f64)
    }
}

/// A 1-based column position, as used on the command line and in file
/// layouts. `Column::nth(1)` is the key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column(usize);

impl Column {
    pub const KEY: Column = Column(0);

    pub const fn nth(n: usize) -> Self {
        assert!(n > 0, "columns are numbered from 1");
        Column(n - 1)
    }

    /// Zero-based offset into a record
    pub const fn index(self) -> usize {
        self.0
    }

    /// 1-based column number
    pub const fn number(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// One row of numbers
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Record(Vec<Value>);

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Record(values)
    }

    pub fn width(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn get(&self, column: Column) -> Option<Value> {
        self.0.get(column.index()).copied()
    }

    /// Like [`Record::get`] but reports which row was short
    pub fn require(&self, column: Column, row: usize) -> Result<Value> {
        self.get(column)
            .ok_or_else(|| Error::missing_column(row, self.width(), column.number()))
    }

    pub fn push(&mut self, value: Value) {
        self.0.push(value);
    }

    /// Parse a line split on a single-character delimiter
    pub fn parse_delimited(line: &str, delimiter: char) -> Result<Self> {
        line.split(delimiter).map(Value::from_str).collect()
    }

    /// Parse a line split on runs of whitespace
    pub fn parse_whitespace(line: &str) -> Result<Self> {
        line.split_whitespace().map(Value::from_str).collect()
    }

    pub fn to_line(&self, delimiter: char) -> String {
        let mut out = String::new();
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(delimiter);
            }
            out.push_str(&value.to_string());
        }
        out
    }
}

impl FromIterator<Value> for Record {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Record(iter.into_iter().collect())
    }
}

impl From<Vec<f64>> for Record {
    fn from(values: Vec<f64>) -> Self {
        values.into_iter().map(Value::from).collect()
    }
}

impl<const N: usize> From<[f64; N]> for Record {
    fn from(values: [f64; N]) -> Self {
        values.into_iter().map(Value::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display_is_shortest() {
        assert_eq!(Value::new(3.0).to_string(), "3");
        assert_eq!(Value::new(2.5).to_string(), "2.5");
        assert_eq!(Value::new(100000.0).to_string(), "100000");
    }

    #[test]
    fn test_value_rejects_non_numbers() {
        assert!("abc".parse::<Value>().is_err());
        assert!("NaN".parse::<Value>().is_err());
        assert!("inf".parse::<Value>().is_err());
        assert_eq!(" 42 ".parse::<Value>(), Ok(Value::new(42.0)));
    }

    #[test]
    fn test_record_order_is_numeric_not_textual() {
        let nine = Record::from([9.0, 1.0]);
        let ten = Record::from([10.0, 0.0]);
        assert!(nine < ten, "9 sorts before 10 numerically");

        let short = Record::from([1.0]);
        let long = Record::from([1.0, 0.0]);
        assert!(short < long);

        let a = Record::from([2.0, 5.0]);
        let b = Record::from([2.0, 7.0]);
        assert!(a < b, "ties on the first field fall through to the second");
    }

    #[test]
    fn test_parse_and_format_lines() {
        let rec = Record::parse_delimited("7| 12.5 |3", '|').expect("valid row");
        assert_eq!(rec, Record::from([7.0, 12.5, 3.0]));
        assert_eq!(rec.to_line(' '), "7 12.5 3");

        let rec = Record::parse_whitespace("  1   2\t3 ").expect("valid row");
        assert_eq!(rec.width(), 3);

        assert_eq!(
            Record::parse_delimited("1|x", '|'),
            Err(Error::parse("x"))
        );
    }

    #[test]
    fn test_column_numbering() {
        assert_eq!(Column::nth(1), Column::KEY);
        assert_eq!(Column::nth(3).index(), 2);
        assert_eq!(Column::nth(3).to_string(), "3");

        let rec = Record::from([1.0, 2.0]);
        assert_eq!(rec.get(Column::nth(2)), Some(Value::new(2.0)));
        assert_eq!(
            rec.require(Column::nth(3), 4),
            Err(Error::missing_column(4, 2, 3))
        );
    }
}
