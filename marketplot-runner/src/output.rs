//! The directory charts are written to.

use crate::error::RunError;
use marketplot_render::{render, Figure};
use std::path::{Path, PathBuf};
use tracing::info;

/// One finished figure and the file it belongs in.
#[derive(Debug, Clone)]
pub struct Chart {
    pub file: &'static str,
    pub figure: Figure,
}

impl Chart {
    pub fn new(file: &'static str, figure: Figure) -> Self {
        Self { file, figure }
    }
}

/// Output directory plus the pixel scale applied to every figure.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
    scale: f64,
}

impl OutputDir {
    pub fn new(root: impl Into<PathBuf>, scale: f64) -> Self {
        Self {
            root: root.into(),
            scale,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    /// Create the directory if needed and render `chart` into it.
    pub fn write(&self, chart: &Chart) -> Result<PathBuf, RunError> {
        std::fs::create_dir_all(&self.root).map_err(|source| RunError::OutputDir {
            path: self.root.clone(),
            source,
        })?;
        let path = self.path_for(chart.file);
        render(&chart.figure, &path, self.scale).map_err(|source| RunError::Render {
            file: chart.file.to_string(),
            source,
        })?;
        info!(path = %path.display(), "wrote chart");
        Ok(path)
    }
}
