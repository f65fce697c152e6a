//! Global deduplicated plane storage.
//!
//! Planes are stored in pairs: the canonical orientation (dominant normal
//! component positive) at an even index and its flip right after it, so
//! `index ^ 1` is always the same geometric plane facing the other way.
//! Lookups probe a hash of distance buckets, including the neighbouring
//! buckets so planes straddling a bucket boundary still match.

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use nalgebra::Vector3;
use parking_lot::RwLock;

use crate::error::{CsgError, Result};
use crate::plane::{Plane, PlaneType};

/// Default capacity of the plane table.
pub const MAX_MAP_PLANES: usize = 32768;

/// Stable reference to a plane in the [`PlaneTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaneIndex(u32);

impl PlaneIndex {
    /// Returns the raw table position.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the index of the same plane facing the opposite direction.
    #[inline]
    pub fn flipped(self) -> Self {
        PlaneIndex(self.0 ^ 1)
    }

    /// Returns true if this is the canonically oriented member of its pair.
    #[inline]
    pub fn is_canonical(self) -> bool {
        self.0 & 1 == 0
    }
}

impl fmt::Display for PlaneIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
struct PlaneStore {
    planes: Vec<Plane>,
    types: Vec<PlaneType>,
    buckets: HashMap<i64, Vec<u32>>,
}

impl PlaneStore {
    fn bucket(dist: f64) -> i64 {
        dist.abs().floor() as i64
    }

    fn find(&self, plane: &Plane) -> Option<PlaneIndex> {
        let key = Self::bucket(plane.dist());
        (key - 1..=key + 1)
            .filter_map(|k| self.buckets.get(&k))
            .flatten()
            .copied()
            .find_map(|i| {
                let canonical = &self.planes[i as usize];
                if canonical.approx_eq(plane) {
                    Some(PlaneIndex(i))
                } else if canonical.flipped().approx_eq(plane) {
                    Some(PlaneIndex(i + 1))
                } else {
                    None
                }
            })
    }
}

/// Append-only, capacity-checked table of unique planes.
///
/// Insertion takes a write lock around lookup-and-insert; reads take the
/// read lock. Once building is over, [`PlaneTable::snapshot`] hands out an
/// immutable copy that later phases read without locking.
#[derive(Debug)]
pub struct PlaneTable {
    store: RwLock<PlaneStore>,
    capacity: usize,
}

impl Default for PlaneTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaneTable {
    /// Creates an empty table with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(MAX_MAP_PLANES)
    }

    /// Creates an empty table holding at most `capacity` planes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: RwLock::new(PlaneStore::default()),
            capacity,
        }
    }

    /// Returns the index of the plane `normal · p = dist`, inserting it if
    /// no plane within tolerance is stored yet.
    pub fn intern(&self, normal: Vector3<f64>, dist: f64) -> Result<PlaneIndex> {
        let plane = Plane::new(normal, dist).ok_or(CsgError::DegeneratePlane)?;
        self.intern_plane(&plane)
    }

    /// Like [`PlaneTable::intern`] for an already constructed plane.
    pub fn intern_plane(&self, plane: &Plane) -> Result<PlaneIndex> {
        let plane = plane.snapped();

        if let Some(found) = self.store.read().find(&plane) {
            return Ok(found);
        }

        let mut store = self.store.write();
        // another thread may have inserted it between the two locks
        if let Some(found) = store.find(&plane) {
            return Ok(found);
        }

        if store.planes.len() + 2 > self.capacity {
            return Err(CsgError::PlaneOverflow {
                limit: self.capacity,
            });
        }

        let canonical = if plane.is_canonical() {
            plane
        } else {
            plane.flipped()
        };
        let index = store.planes.len() as u32;
        let plane_type = canonical.plane_type();
        store.planes.push(canonical);
        store.planes.push(canonical.flipped());
        store.types.push(plane_type);
        store.types.push(plane_type);
        store
            .buckets
            .entry(PlaneStore::bucket(canonical.dist()))
            .or_default()
            .push(index);

        Ok(if plane.is_canonical() {
            PlaneIndex(index)
        } else {
            PlaneIndex(index + 1)
        })
    }

    /// Returns the plane stored at `index`.
    ///
    /// # Panics
    /// Panics if the index was not produced by this table.
    pub fn plane(&self, index: PlaneIndex) -> Plane {
        self.store.read().planes[index.index()]
    }

    /// Returns the axis classification of the plane at `index`.
    pub fn plane_type(&self, index: PlaneIndex) -> PlaneType {
        self.store.read().types[index.index()]
    }

    /// Returns the number of stored planes (always even).
    pub fn len(&self) -> usize {
        self.store.read().planes.len()
    }

    /// Returns true if no plane has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns an immutable copy of the table for lock-free reads.
    pub fn snapshot(&self) -> Planes {
        Planes(self.store.read().planes.as_slice().into())
    }
}

/// Frozen view of the plane table, shared with the partitioning stage.
#[derive(Debug, Clone, Default)]
pub struct Planes(Arc<[Plane]>);

impl Planes {
    /// Returns the plane at `index`, if any.
    #[inline]
    pub fn get(&self, index: PlaneIndex) -> Option<&Plane> {
        self.0.get(index.index())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(index, plane)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (PlaneIndex, &Plane)> {
        self.0
            .iter()
            .enumerate()
            .map(|(i, p)| (PlaneIndex(i as u32), p))
    }
}

impl Index<PlaneIndex> for Planes {
    type Output = Plane;

    fn index(&self, index: PlaneIndex) -> &Plane {
        &self.0[index.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn intern_is_idempotent() {
        let table = PlaneTable::new();
        let a = table.intern(Vector3::new(1.0, 0.0, 0.0), 64.0).unwrap();
        let b = table.intern(Vector3::new(1.0, 0.0, 0.0), 64.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn perturbed_plane_shares_index() {
        let table = PlaneTable::new();
        let a = table.intern(Vector3::new(0.6, 0.8, 0.0), 10.0).unwrap();
        let b = table
            .intern(Vector3::new(0.600001, 0.799999, 0.000001), 10.004)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn opposite_planes_are_paired() {
        let table = PlaneTable::new();
        let up = table.intern(Vector3::new(0.0, 0.0, 1.0), 8.0).unwrap();
        let down = table.intern(Vector3::new(0.0, 0.0, -1.0), -8.0).unwrap();
        assert!(up.is_canonical());
        assert_eq!(down, up.flipped());
        assert_eq!(table.plane(down), table.plane(up).flipped());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn non_canonical_first_insert() {
        let table = PlaneTable::new();
        let west = table.intern(Vector3::new(-1.0, 0.0, 0.0), 0.0).unwrap();
        assert!(!west.is_canonical());
        assert_eq!(table.plane(west).normal(), Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(table.plane(west.flipped()).normal(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn close_distances_share_index() {
        let table = PlaneTable::new();
        let a = table.intern(Vector3::new(0.6, 0.8, 0.0), 3.5).unwrap();
        let b = table.intern(Vector3::new(-0.6, -0.8, 0.0), -3.505).unwrap();
        assert_eq!(b, a.flipped());
        let c = table.intern(Vector3::new(0.6, 0.8, 0.0), 3.6).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn overflow_is_reported() {
        let table = PlaneTable::with_capacity(4);
        table.intern(Vector3::new(1.0, 0.0, 0.0), 0.0).unwrap();
        table.intern(Vector3::new(0.0, 1.0, 0.0), 0.0).unwrap();
        let err = table.intern(Vector3::new(0.0, 0.0, 1.0), 0.0).unwrap_err();
        assert!(matches!(err, CsgError::PlaneOverflow { limit: 4 }));
        // existing planes are still found after the table is full
        assert!(table.intern(Vector3::new(0.0, 1.0, 0.0), 0.0).is_ok());
    }

    #[test]
    fn zero_normal_is_an_error() {
        let table = PlaneTable::new();
        assert!(matches!(
            table.intern(Vector3::zeros(), 3.0),
            Err(CsgError::DegeneratePlane)
        ));
    }

    #[test]
    fn concurrent_interning_deduplicates() {
        let table = PlaneTable::new();
        let indices: Vec<PlaneIndex> = (0..64)
            .into_par_iter()
            .map(|i| {
                table
                    .intern(Vector3::new(0.0, 1.0, 0.0), (i % 4) as f64 * 16.0)
                    .unwrap()
            })
            .collect();
        assert_eq!(table.len(), 8);
        assert_eq!(indices[0], indices[4]);
    }

    #[test]
    fn snapshot_matches_table() {
        let table = PlaneTable::new();
        let a = table.intern(Vector3::new(0.0, 0.0, 1.0), 32.0).unwrap();
        let planes = table.snapshot();
        assert_eq!(planes.len(), 2);
        assert_eq!(planes[a], table.plane(a));
        assert_eq!(table.plane_type(a), PlaneType::Z);
        assert_eq!(planes.iter().count(), 2);
    }
}
