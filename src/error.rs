use std::{io, path::PathBuf};

use thiserror::Error;

use crate::builder::BuildError;
use crate::config::ConfigError;
use crate::golang::GoParseError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: GoParseError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Invalid extra tables definition: {0}")]
    ExtraTables(#[from] serde_json::Error),
}
