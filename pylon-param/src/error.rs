//! Error types for loading and emitting parameter sets.
//!
//! The resolution pass itself never fails; these cover the I/O around it.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read parameter file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid parameter file: {0}")]
    InvalidParameterFile(String),

    #[error("invalid parameter rule '{0}', expected name:=value")]
    InvalidParamRule(String),
}
