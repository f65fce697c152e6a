//! Compile settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::brush::{MAX_MAP_BRUSHES, MAX_MAP_SIDES};
use crate::error::{CsgError, Result};
use crate::plane_table::MAX_MAP_PLANES;

/// Half-size of the box every hull must fit in.
pub const DEFAULT_WORLD_EXTENT: f64 = 65536.0;

/// Settings of one CSG run. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CsgConfig {
    /// Size of a dedicated worker pool; the global rayon pool if unset.
    pub threads: Option<usize>,
    /// Only build the point hull.
    pub noclip: bool,
    /// Enables overlap diagnostics, warning above this percentage.
    pub brush_union_threshold: Option<f64>,
    /// Hull definition file replacing the default hull shapes.
    pub hull_file: Option<PathBuf>,
    pub world_extent: f64,
    pub max_planes: usize,
    pub max_brushes: usize,
    pub max_sides: usize,
}

impl Default for CsgConfig {
    fn default() -> Self {
        Self {
            threads: None,
            noclip: false,
            brush_union_threshold: None,
            hull_file: None,
            world_extent: DEFAULT_WORLD_EXTENT,
            max_planes: MAX_MAP_PLANES,
            max_brushes: MAX_MAP_BRUSHES,
            max_sides: MAX_MAP_SIDES,
        }
    }
}

impl CsgConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CsgError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = CsgConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CsgConfig::default());
        assert_eq!(config.max_sides, 196608);
    }

    #[test]
    fn fields_override_defaults() {
        let config = CsgConfig::from_json_str(
            r#"{ "threads": 2, "brush_union_threshold": 12.5, "hull_file": "hulls.txt" }"#,
        )
        .unwrap();
        assert_eq!(config.threads, Some(2));
        assert_eq!(config.brush_union_threshold, Some(12.5));
        assert_eq!(config.hull_file, Some(PathBuf::from("hulls.txt")));
        assert!(!config.noclip);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            CsgConfig::from_json_str(r#"{ "thread": 2 }"#),
            Err(CsgError::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            CsgConfig::from_json_file("/nonexistent/csg.json"),
            Err(CsgError::Io { .. })
        ));
    }
}
