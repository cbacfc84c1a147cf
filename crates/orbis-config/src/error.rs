//! Errors raised while reading or writing `config.ron`.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// A failed config file operation, tagged with the file involved.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Covers creating the config directory as well as the file itself.
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a valid config. The span in `source`
    /// points at the offending RON.
    #[error("invalid config in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

impl ConfigError {
    /// File or directory the failed operation touched, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } | Self::Parse { path, .. } => Some(path),
            Self::Serialize(_) => None,
        }
    }
}
