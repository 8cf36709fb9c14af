//! Error types for the renderer and configuration layer

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised before any report output is produced.
///
/// Rendering itself is total over every report body; only an unusable
/// layout configuration can stop it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("invalid layout: {column} width bounds are inverted (min {min} > max {max})")]
    InvertedBounds {
        column: Column,
        min: usize,
        max: usize,
    },

    #[error("invalid layout: minimum {column} width must be at least 1")]
    ZeroWidth { column: Column },
}

/// Which table column a layout error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Label,
    Data,
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Column::Label => f.write_str("label"),
            Column::Data => f.write_str("data"),
        }
    }
}

/// Errors from loading the on-disk configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
