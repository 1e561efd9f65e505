// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};

use crate::common::PrepContext;

/// Print the effective configuration as YAML, then any dataset-size
/// mappings that no payload loop uses
pub fn show_config_command<F>(context: &PrepContext, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let config = context.pipeline().config();
    let yaml = config.to_yaml().context("Failed to serialize config")?;
    handler(yaml.trim_end());

    for size in config.unused_dataset_sizes() {
        let dataset = config.dataset_sizes.get(&size).copied().unwrap_or_default();
        handler(&format!("# unused: payload size {size} -> dataset size {dataset}"));
    }
    Ok(())
}
