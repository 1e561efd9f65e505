// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use prep::{ParsePolicy, Pipeline, PrepConfig};

/// Options shared by every subcommand
#[derive(Debug, Clone, Args)]
pub struct GridArgs {
    /// Directory holding the raw benchmark files
    #[arg(long, global = true, default_value = ".")]
    pub input_dir: PathBuf,

    /// Directory the prepped files are written to
    #[arg(long, global = true, default_value = ".")]
    pub output_dir: PathBuf,

    /// YAML file overriding the default grid
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Only these payload sizes (comma separated)
    #[arg(long, global = true, value_delimiter = ',')]
    pub sizes: Option<Vec<u32>>,

    /// Only these worker counts (comma separated)
    #[arg(long, global = true, value_delimiter = ',')]
    pub workers: Option<Vec<u32>>,

    /// Fail a file on its first malformed row instead of skipping it
    #[arg(long, global = true)]
    pub strict: bool,
}

impl GridArgs {
    /// Defaults for the given directories, as if no flags were passed
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(input_dir: P, output_dir: Q) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            config: None,
            sizes: None,
            workers: None,
            strict: false,
        }
    }

    /// The effective configuration: file or defaults, then CLI overrides
    pub fn config(&self) -> Result<PrepConfig> {
        let mut config = match &self.config {
            Some(path) => PrepConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => PrepConfig::default(),
        };
        config
            .restrict(self.sizes.clone(), self.workers.clone())
            .context("Invalid --sizes or --workers")?;
        if self.strict {
            config.parse_policy = ParsePolicy::Strict;
        }
        Ok(config)
    }
}

/// Everything a command needs: the validated grid and both directories
pub struct PrepContext {
    pipeline: Pipeline,
}

impl PrepContext {
    pub fn new(args: &GridArgs) -> Result<Self> {
        let config = args.config()?;
        let pipeline = Pipeline::new(config, &args.input_dir, &args.output_dir)
            .context("Invalid configuration")?;
        diagnostics::log_debug!("Input {input}, output {output}",
                                input: args.input_dir.display().to_string(),
                                output: args.output_dir.display().to_string());
        Ok(Self { pipeline })
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}
