//! Hull definition file parsing.

use std::path::Path;

use log::info;
use nalgebra::{Point3, Vector3};

use super::{HullLibrary, HullShape, NUM_HULLS};
use crate::error::{CsgError, Result};
use crate::plane::Plane;

impl HullLibrary {
    /// Reads a hull definition file in either supported format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CsgError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let library = Self::parse(&text, path)?;
        info!(
            "loaded hull file {} ({} custom shapes)",
            path.display(),
            library.custom_count()
        );
        Ok(library)
    }

    /// Parses hull definitions; `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let lines: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, strip_comment(line)))
            .filter(|(_, line)| !line.is_empty())
            .collect();

        let parser = Parser { path };
        if lines.iter().any(|(_, line)| line.contains('{')) {
            parser.named(&lines)
        } else {
            parser.legacy(&lines)
        }
    }
}

fn strip_comment(line: &str) -> &str {
    line.split("//").next().unwrap_or("").trim()
}

struct Parser<'a> {
    path: &'a Path,
}

impl Parser<'_> {
    fn error(&self, line: usize, message: impl Into<String>) -> CsgError {
        CsgError::HullFile {
            path: self.path.to_path_buf(),
            line,
            message: message.into(),
        }
    }

    fn numbers(&self, line: usize, text: &str, expected: usize) -> Result<Vec<f64>> {
        let values = text
            .replace(['(', ')'], " ")
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<f64>()
                    .map_err(|_| self.error(line, format!("expected a number, found `{token}`")))
            })
            .collect::<Result<Vec<f64>>>()?;
        if values.len() != expected {
            return Err(self.error(
                line,
                format!("expected {expected} numbers, found {}", values.len()),
            ));
        }
        Ok(values)
    }

    fn shape(&self, line: usize, shape: Result<HullShape>) -> Result<HullShape> {
        shape.map_err(|err| self.error(line, err.to_string()))
    }

    /// Three or four lines of full hull extents.
    fn legacy(&self, lines: &[(usize, &str)]) -> Result<HullLibrary> {
        let mut library = HullLibrary::default();
        let skip = match lines.len() {
            3 => 0,
            4 => 1,
            n => {
                let line = lines.last().map_or(1, |(l, _)| *l);
                return Err(self.error(line, format!("expected 3 or 4 hull sizes, found {n}")));
            }
        };

        if skip == 1 {
            let (line, text) = lines[0];
            let size = self.numbers(line, text, 3)?;
            if size.iter().any(|v| *v != 0.0) {
                return Err(self.error(line, "the point hull must have zero size"));
            }
        }

        for (hull, (line, text)) in (1..NUM_HULLS).zip(&lines[skip..]) {
            let size = self.numbers(*line, text, 3)?;
            if size.iter().any(|v| *v <= 0.0) {
                return Err(self.error(*line, "hull sizes must be positive"));
            }
            let half = Vector3::new(size[0], size[1], size[2]) * 0.5;
            let shape = HullShape::from_box(
                format!("hull{hull}"),
                Point3::from(-half),
                Point3::from(half),
            );
            library.set_hull(hull, self.shape(*line, shape)?);
        }
        Ok(library)
    }

    /// `name { ... }` blocks of planes and boxes.
    fn named(&self, lines: &[(usize, &str)]) -> Result<HullLibrary> {
        let mut library = HullLibrary::default();
        let mut defined: Vec<String> = Vec::new();
        let mut iter = lines.iter();

        while let Some(&(start, header)) = iter.next() {
            let Some(name) = header.strip_suffix('{').map(str::trim) else {
                return Err(self.error(start, format!("expected `<name> {{`, found `{header}`")));
            };
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(self.error(start, format!("invalid shape name `{name}`")));
            }
            if defined.iter().any(|d| d == name) {
                return Err(self.error(start, format!("shape `{name}` defined twice")));
            }

            let mut planes = Vec::new();
            let mut closed = false;
            for &(line, text) in iter.by_ref() {
                if text == "}" {
                    closed = true;
                    break;
                }
                if let Some(rest) = text.strip_prefix("box") {
                    let v = self.numbers(line, rest, 6)?;
                    let mins = Point3::new(v[0], v[1], v[2]);
                    let maxs = Point3::new(v[3], v[4], v[5]);
                    if (0..3).any(|i| mins[i] >= maxs[i]) {
                        return Err(self.error(line, "box mins must be below maxs"));
                    }
                    let shape = self.shape(line, HullShape::from_box(name, mins, maxs))?;
                    planes.extend_from_slice(shape.planes());
                } else if text.starts_with('(') {
                    let v = self.numbers(line, text, 4)?;
                    let plane = Plane::new(Vector3::new(v[0], v[1], v[2]), v[3])
                        .ok_or_else(|| self.error(line, "plane normal has zero length"))?;
                    planes.push(plane);
                } else {
                    return Err(self.error(line, format!("unexpected `{text}`")));
                }
            }
            if !closed {
                return Err(self.error(start, format!("shape `{name}` is missing `}}`")));
            }

            let shape = self.shape(start, HullShape::from_planes(name, planes))?;
            match name {
                "hull0" => {
                    return Err(self.error(start, "the point hull cannot be reshaped"));
                }
                "hull1" => library.set_hull(1, shape),
                "hull2" => library.set_hull(2, shape),
                "hull3" => library.set_hull(3, shape),
                _ => {
                    library.insert_custom(shape);
                }
            }
            defined.push(name.to_string());
        }
        Ok(library)
    }
}
