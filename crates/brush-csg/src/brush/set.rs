use std::ops::Range;

use log::debug;
use rayon::prelude::*;

use super::build::{build_brush, BuildContext};
use super::input::MapBrush;
use super::Brush;
use crate::error::{CsgError, Result};

/// Default brush limit of a map.
pub const MAX_MAP_BRUSHES: usize = 32768;

/// Default limit on brush sides across a map.
pub const MAX_MAP_SIDES: usize = MAX_MAP_BRUSHES * 6;

/// All brushes of a map, grouped by entity in insertion order.
#[derive(Debug, Clone)]
pub struct BrushSet {
    brushes: Vec<Brush>,
    entities: Vec<Range<usize>>,
    side_count: usize,
    max_brushes: usize,
    max_sides: usize,
}

impl Default for BrushSet {
    fn default() -> Self {
        Self::new(MAX_MAP_BRUSHES, MAX_MAP_SIDES)
    }
}

impl BrushSet {
    pub fn new(max_brushes: usize, max_sides: usize) -> Self {
        Self {
            brushes: Vec::new(),
            entities: Vec::new(),
            side_count: 0,
            max_brushes,
            max_sides,
        }
    }

    /// Builds the brushes of one entity and appends them as a new entity.
    /// Returns the entity's index.
    ///
    /// Limits are checked before anything is built, so on error the set is
    /// unchanged. Planes interned before a plane overflow stay interned.
    pub fn add_entity(&mut self, map_brushes: &[MapBrush], ctx: &BuildContext) -> Result<usize> {
        let first = self.brushes.len();
        if first + map_brushes.len() > self.max_brushes {
            return Err(CsgError::BrushOverflow {
                limit: self.max_brushes,
            });
        }
        let sides: usize = map_brushes.iter().map(|b| b.sides.len()).sum();
        if self.side_count + sides > self.max_sides {
            return Err(CsgError::SideOverflow {
                limit: self.max_sides,
            });
        }

        let entity = self.entities.len();
        let built = map_brushes
            .par_iter()
            .enumerate()
            .map(|(i, map)| build_brush(first + i, entity, map, ctx))
            .collect::<Result<Vec<Brush>>>()?;

        debug!("entity {}: built {} brushes", entity, built.len());
        // kept sides only, matching remove_last_entity
        self.side_count += built.iter().map(|b| b.sides.len()).sum::<usize>();
        self.brushes.extend(built);
        self.entities.push(first..self.brushes.len());
        Ok(entity)
    }

    /// Drops the most recently added entity and returns its brushes.
    pub fn remove_last_entity(&mut self) -> Option<Vec<Brush>> {
        let range = self.entities.pop()?;
        let removed: Vec<Brush> = self.brushes.drain(range).collect();
        self.side_count -= removed.iter().map(|b| b.sides.len()).sum::<usize>();
        Some(removed)
    }

    #[inline]
    pub fn brushes(&self) -> &[Brush] {
        &self.brushes
    }

    #[inline]
    pub(crate) fn brushes_mut(&mut self) -> &mut [Brush] {
        &mut self.brushes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.brushes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.brushes.is_empty()
    }

    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns the brush positions belonging to `entity`.
    ///
    /// # Panics
    /// Panics if `entity >= self.entity_count()`.
    #[inline]
    pub fn entity_range(&self, entity: usize) -> Range<usize> {
        self.entities[entity].clone()
    }

    /// Returns the brushes of `entity`.
    #[inline]
    pub fn entity_brushes(&self, entity: usize) -> &[Brush] {
        &self.brushes[self.entity_range(entity)]
    }

    /// Number of sides kept across all brushes.
    #[inline]
    pub fn side_count(&self) -> usize {
        self.side_count
    }
}
