use crate::config::ConfigError;
use marketplot_core::{DataError, TableError, TransformError};
use marketplot_render::RenderError;
use std::path::PathBuf;
use thiserror::Error;

/// Anything that can stop a chart set.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("render {file}: {source}")]
    Render {
        file: String,
        #[source]
        source: RenderError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown chart set '{0}'")]
    UnknownSet(String),

    /// The data came back but lacks a row or column a chart needs.
    #[error("not enough data: {0}")]
    Insufficient(String),
}
