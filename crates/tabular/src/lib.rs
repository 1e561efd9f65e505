// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory numeric tables for benchmark preparation: ordered records,
//! order-carrying sequences, merge join, distributions and aggregates.

pub mod aggregate;
pub mod distribution;
pub mod error;
pub mod join;
pub mod record;
pub mod sorted;

pub use aggregate::{mean, ratio_of_sums};
pub use distribution::{Bucket, Distribution};
pub use error::{Error, Result};
pub use join::{Ratios, merge_join, project, ratio};
pub use record::{Column, Record, Value};
pub use sorted::{Keyed, Sorted};
