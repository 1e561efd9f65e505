// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Run one stage, or all of them, over the configured grid.
//!
//! Example:
//!   benchprep --input-dir raw --output-dir prepped all
//!   benchprep --sizes 50 --workers 1,2 lat-vs-tp
//!
//! Each written file and each failure is reported through the handler.
//! The command fails after the summary when anything failed.

use anyhow::{Result, anyhow};
use prep::Stage;

use crate::common::PrepContext;

pub fn run_command<F>(context: &PrepContext, stages: &[Stage], mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    diagnostics::log_debug!("run_command called with {count} stages", count: stages.len());

    let report = context.pipeline().run(stages);

    for output in &report.outputs {
        handler(&format!(
            "wrote {} ({} rows)",
            output.path.display(),
            output.rows
        ));
    }
    for failure in &report.failures {
        handler(&format!("failed {failure}"));
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(anyhow!(
            "{} of {} targets failed",
            report.failures.len(),
            report.failures.len() + report.outputs.len()
        ))
    }
}
