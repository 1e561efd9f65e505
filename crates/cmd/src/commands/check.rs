// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Result, anyhow};
use prep::Stage;

use crate::common::PrepContext;

/// List every raw input the grid reads and fail if any is missing.
/// Nothing is written.
pub fn check_command<F>(context: &PrepContext, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let inputs = context.pipeline().required_inputs(&Stage::ALL);
    let mut missing = 0;
    for input in &inputs {
        let status = if input.present { "ok" } else { "missing" };
        if !input.present {
            missing += 1;
        }
        handler(&format!("{status:<8}{}", input.path.display()));
    }

    if missing == 0 {
        Ok(())
    } else {
        Err(anyhow!("{missing} of {} raw inputs are missing", inputs.len()))
    }
}
