// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

// Error types for preparation stages
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, PrepError>;

#[derive(Debug, thiserror::Error)]
pub enum PrepError {
    #[error("Missing input file: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("Malformed row at {}:{line}: {reason}", path.display())]
    MalformedRow {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("A worker count is required to normalize {}", path.display())]
    MissingWorkers { path: PathBuf },

    #[error("Payload size {size} has no dataset size mapping")]
    UnmappedPayloadSize { size: u32 },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Skipped because {upstream} failed")]
    UpstreamFailed { upstream: String },

    #[error("Glob error for '{pattern}': {message}")]
    Glob { pattern: String, message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("Table error in {}: {source}", path.display())]
    Tabular {
        path: PathBuf,
        #[source]
        source: tabular::Error,
    },
}

impl PrepError {
    /// Classify an I/O error, turning "not found" into `MissingInput`
    pub fn io<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == std::io::ErrorKind::NotFound {
            PrepError::MissingInput { path }
        } else {
            PrepError::Io { path, source }
        }
    }

    pub fn missing_input<P: AsRef<Path>>(path: P) -> Self {
        PrepError::MissingInput {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn malformed<P: AsRef<Path>, S: Into<String>>(path: P, line: usize, reason: S) -> Self {
        PrepError::MalformedRow {
            path: path.as_ref().to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        PrepError::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn upstream<S: Into<String>>(upstream: S) -> Self {
        PrepError::UpstreamFailed {
            upstream: upstream.into(),
        }
    }

    pub fn tabular<P: AsRef<Path>>(path: P, source: tabular::Error) -> Self {
        PrepError::Tabular {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn is_missing_input(&self) -> bool {
        matches!(self, PrepError::MissingInput { .. })
    }
}

/// Attach the file a table error came from
pub trait TableContext<T> {
    fn in_file<P: AsRef<Path>>(self, path: P) -> Result<T>;
}

impl<T> TableContext<T> for std::result::Result<T, tabular::Error> {
    fn in_file<P: AsRef<Path>>(self, path: P) -> Result<T> {
        self.map_err(|e| PrepError::tabular(path, e))
    }
}
