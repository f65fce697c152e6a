//! Fatal error conditions of the CSG stage.
//!
//! Degenerate geometry is never an error: windings and hulls that vanish
//! are dropped where they occur. Everything here aborts the compile.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsgError {
    #[error("exceeded MAX_MAP_PLANES ({limit})")]
    PlaneOverflow { limit: usize },

    #[error("exceeded MAX_MAP_BRUSHES ({limit})")]
    BrushOverflow { limit: usize },

    #[error("exceeded MAX_MAP_SIDES ({limit})")]
    SideOverflow { limit: usize },

    #[error("plane normal has zero length")]
    DegeneratePlane,

    #[error("{}:{line}: {message}", path.display())]
    HullFile {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("hull shape `{name}` does not enclose a volume")]
    DegenerateHullShape { name: String },

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("could not start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, CsgError>;
