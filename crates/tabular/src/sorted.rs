// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Sequences that carry proof of their order.
//!
//! Merge joins and grouping only give correct answers on sorted input, so
//! the functions that need order accept [`Sorted`] or [`Keyed`] and nothing
//! else. Both types can only be built by sorting or by checking.

use std::ops::Deref;

use crate::error::{Error, Result};
use crate::record::{Column, Record, Value};

/// A sequence in non-decreasing order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorted<T> {
    items: Vec<T>,
}

impl<T: Ord> Sorted<T> {
    /// Sort `items`; equal items keep their relative order
    pub fn sort(mut items: Vec<T>) -> Self {
        items.sort();
        Sorted { items }
    }

    /// Accept `items` only if they are already in order
    pub fn try_from_sorted(items: Vec<T>) -> Result<Self> {
        match first_descent(&items, |a, b| a <= b) {
            Some(position) => Err(Error::unsorted(position)),
            None => Ok(Sorted { items }),
        }
    }
}

impl<T> Sorted<T> {
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> Deref for Sorted<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a Sorted<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Records in non-decreasing order of one key column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyed {
    rows: Vec<Record>,
    key: Column,
}

impl Keyed {
    /// Accept `rows` only if they are already in key order
    pub fn check(rows: Vec<Record>, key: Column) -> Result<Self> {
        let keys = key_values(&rows, key)?;
        match first_descent(&keys, |a, b| a <= b) {
            Some(position) => Err(Error::unsorted(position)),
            None => Ok(Keyed { rows, key }),
        }
    }

    /// Rows this crate produced in key order itself
    pub(crate) fn built_in_order(rows: Vec<Record>, key: Column) -> Self {
        debug_assert!(Keyed::check(rows.clone(), key).is_ok());
        Keyed { rows, key }
    }

    pub fn key(&self) -> Column {
        self.key
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Key of row `i`; present for every row by construction
    pub(crate) fn key_at(&self, i: usize) -> Value {
        self.rows[i].get(self.key).unwrap_or(Value::ZERO)
    }
}

fn key_values(rows: &[Record], key: Column) -> Result<Vec<Value>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| row.require(key, i))
        .collect()
}

fn first_descent<T>(items: &[T], in_order: impl Fn(&T, &T) -> bool) -> Option<usize> {
    items
        .windows(2)
        .position(|pair| !in_order(&pair[0], &pair[1]))
        .map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_and_check() {
        let sorted = Sorted::sort(vec![3, 1, 2, 1]);
        assert_eq!(sorted.as_slice(), &[1, 1, 2, 3]);

        assert!(Sorted::try_from_sorted(vec![1, 1, 2]).is_ok());
        assert_eq!(
            Sorted::try_from_sorted(vec![1, 3, 2, 4]),
            Err(Error::unsorted(2))
        );
    }

    #[test]
    fn test_sorted_records_use_full_row_order() {
        let rows = vec![
            Record::from([10.0, 1.0]),
            Record::from([2.0, 9.0]),
            Record::from([2.0, 3.0]),
        ];
        let sorted = Sorted::sort(rows);
        let firsts: Vec<f64> = sorted.iter().map(|r| r.values()[0].get()).collect();
        assert_eq!(firsts, vec![2.0, 2.0, 10.0]);
        assert_eq!(sorted[0], Record::from([2.0, 3.0]));
    }

    #[test]
    fn test_keyed_check_rejects_unsorted_and_short_rows() {
        let rows = vec![Record::from([1.0, 5.0]), Record::from([2.0, 4.0])];
        assert_eq!(
            Keyed::check(rows.clone(), Column::nth(2)),
            Err(Error::unsorted(1))
        );
        assert!(Keyed::check(rows, Column::KEY).is_ok());

        let short = vec![Record::from([1.0])];
        assert_eq!(
            Keyed::check(short, Column::nth(2)),
            Err(Error::missing_column(0, 1, 2))
        );
    }
}
