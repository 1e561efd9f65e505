// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Benchmark result preparation: raw `|`-delimited measurement files in,
//! sorted space-delimited tables ready for plotting out.

pub mod compose;
pub mod config;
pub mod error;
pub mod measurements;
pub mod normalize;
pub mod pipeline;
pub mod scaling;
pub mod stage;
pub mod store;
pub mod tuples;

pub use compose::{compose_lat_vs_tp, lat_vs_tp};
pub use config::{ParsePolicy, PrepConfig};
pub use error::{PrepError, Result};
pub use measurements::{prep_single_thread, prep_transaction_counts};
pub use normalize::{Normalized, Normalizer, RawKind};
pub use pipeline::{Pipeline, RequiredInput, RunReport};
pub use scaling::{ScalingOutcome, aggregate_scaling};
pub use stage::{Failure, Stage, StageOutput};
pub use store::{Artifact, PreppedStore, RawStore};
pub use tuples::prep_tuples;
