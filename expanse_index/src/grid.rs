// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid hash keyed by entity id.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};
use kurbo::{Point, Rect};
use smallvec::SmallVec;

/// Default edge length of a grid cell, in world units.
pub const DEFAULT_CELL_SIZE: f64 = 100.0;

/// Integer grid coordinate `(column, row)`.
pub type Cell = (i32, i32);

/// Map a world coordinate to a grid coordinate along one axis.
///
/// Rounds toward −∞ and saturates outside the `i32` range.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Grid cell indices are intentionally i32; out-of-range values are saturated."
)]
#[inline]
fn cell_coord(value: f64, cell_size: f64) -> i32 {
    let t = value / cell_size;
    let coord = t as i32;

    // Round towards -∞ (the cast above has already truncated).
    if t < 0.0 && f64::from(coord) > t {
        coord.saturating_sub(1)
    } else {
        coord
    }
}

#[derive(Clone, Debug)]
struct Entry {
    bounds: Rect,
    // Cells currently containing this id.
    cells: SmallVec<[Cell; 4]>,
}

/// A fixed-cell spatial hash mapping grid cells to the ids whose boxes overlap them.
///
/// Queries are an over-approximation: every id whose box overlaps the query's
/// cells is returned, including ids that do not overlap the query itself.
/// Callers verify candidates with an exact test.
///
/// An id occupies every cell its (normalized) box overlaps, edges included.
pub struct SpatialIndex<K> {
    cell_size: f64,
    cells: HashMap<Cell, SmallVec<[K; 8]>>,
    entries: HashMap<K, Entry>,
}

impl<K: Debug> Debug for SpatialIndex<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("cell_size", &self.cell_size)
            .field("ids", &self.entries.len())
            .field("cells", &self.cells.len())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash> Default for SpatialIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> SpatialIndex<K> {
    /// Create an empty index with [`DEFAULT_CELL_SIZE`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_cell_size(DEFAULT_CELL_SIZE)
    }

    /// Create an empty index with the given cell size.
    ///
    /// Non-positive or non-finite sizes fall back to [`DEFAULT_CELL_SIZE`].
    #[must_use]
    pub fn with_cell_size(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            DEFAULT_CELL_SIZE
        };
        Self {
            cell_size,
            cells: HashMap::new(),
            entries: HashMap::new(),
        }
    }

    /// Edge length of a grid cell.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// The cell containing `point`.
    #[must_use]
    pub fn cell_of(&self, point: Point) -> Cell {
        (
            cell_coord(point.x, self.cell_size),
            cell_coord(point.y, self.cell_size),
        )
    }

    /// Inclusive `(min, max)` cell corners covered by `rect`.
    #[must_use]
    pub fn cell_range(&self, rect: Rect) -> (Cell, Cell) {
        let rect = rect.abs();
        (
            self.cell_of(Point::new(rect.x0, rect.y0)),
            self.cell_of(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Insert or move `id` to `bounds`.
    ///
    /// Membership is updated incrementally: `id` is only removed from cells it
    /// no longer overlaps and only added to cells it newly overlaps. Returns
    /// `false` if `bounds` equals the currently indexed box.
    pub fn replace(&mut self, id: K, bounds: Rect) -> bool {
        let bounds = bounds.abs();
        let new_cells = self.covered_cells(bounds);

        let Some(entry) = self.entries.get_mut(&id) else {
            for &cell in &new_cells {
                self.cells.entry(cell).or_default().push(id);
            }
            self.entries.insert(
                id,
                Entry {
                    bounds,
                    cells: new_cells,
                },
            );
            return true;
        };

        if entry.bounds == bounds {
            return false;
        }
        entry.bounds = bounds;
        let old_cells = core::mem::replace(&mut entry.cells, new_cells.clone());

        for cell in old_cells.iter().filter(|c| !new_cells.contains(c)) {
            Self::remove_from_cell(&mut self.cells, *cell, id);
        }
        for &cell in new_cells.iter().filter(|c| !old_cells.contains(c)) {
            self.cells.entry(cell).or_default().push(id);
        }
        true
    }

    /// Purge all membership for `id`. Returns `false` if it was not indexed.
    pub fn remove(&mut self, id: K) -> bool {
        let Some(entry) = self.entries.remove(&id) else {
            return false;
        };
        for &cell in &entry.cells {
            Self::remove_from_cell(&mut self.cells, cell, id);
        }
        true
    }

    /// Remove every id.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.entries.clear();
    }

    /// Returns `true` if `id` is indexed.
    #[must_use]
    pub fn contains(&self, id: K) -> bool {
        self.entries.contains_key(&id)
    }

    /// The box `id` was last indexed with.
    #[must_use]
    pub fn bounds(&self, id: K) -> Option<Rect> {
        self.entries.get(&id).map(|e| e.bounds)
    }

    /// Cells `id` currently occupies.
    #[must_use]
    pub fn cells_of(&self, id: K) -> Option<&[Cell]> {
        self.entries.get(&id).map(|e| e.cells.as_slice())
    }

    /// Ids in a single cell.
    #[must_use]
    pub fn ids_in_cell(&self, cell: Cell) -> &[K] {
        self.cells.get(&cell).map_or(&[], |ids| ids.as_slice())
    }

    /// Number of indexed ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Visit each id occupying any cell `rect` overlaps, once.
    pub fn visit_rect<F: FnMut(K)>(&self, rect: Rect, mut f: F) {
        let ((ix0, iy0), (ix1, iy1)) = self.cell_range(rect);
        let mut seen: HashSet<K> = HashSet::new();
        let mut emit = |ids: &SmallVec<[K; 8]>| {
            for &id in ids {
                if seen.insert(id) {
                    f(id);
                }
            }
        };

        let span = (i64::from(ix1) - i64::from(ix0) + 1)
            .saturating_mul(i64::from(iy1) - i64::from(iy0) + 1);
        if usize::try_from(span).map_or(true, |span| span > self.cells.len()) {
            // Query covers more cells than are occupied: scan occupied cells instead.
            for (&(ix, iy), ids) in &self.cells {
                if (ix0..=ix1).contains(&ix) && (iy0..=iy1).contains(&iy) {
                    emit(ids);
                }
            }
            return;
        }
        for ix in ix0..=ix1 {
            for iy in iy0..=iy1 {
                if let Some(ids) = self.cells.get(&(ix, iy)) {
                    emit(ids);
                }
            }
        }
    }

    /// Candidate ids for `rect`: the union of ids in every cell `rect` overlaps.
    ///
    /// Never misses an id whose indexed box overlaps `rect`; may include ids that do not.
    #[must_use]
    pub fn query_rect(&self, rect: Rect) -> Vec<K> {
        let mut out = Vec::new();
        self.visit_rect(rect, |id| out.push(id));
        out
    }

    /// Candidate ids for `point`: the ids in its cell.
    #[must_use]
    pub fn query_point(&self, point: Point) -> Vec<K> {
        self.ids_in_cell(self.cell_of(point)).to_vec()
    }

    /// Iterate over indexed ids and their boxes.
    pub fn iter(&self) -> impl Iterator<Item = (K, Rect)> + '_ {
        self.entries.iter().map(|(id, e)| (*id, e.bounds))
    }

    fn covered_cells(&self, bounds: Rect) -> SmallVec<[Cell; 4]> {
        let ((ix0, iy0), (ix1, iy1)) = self.cell_range(bounds);
        let mut out: SmallVec<[Cell; 4]> = SmallVec::new();
        for ix in ix0..=ix1 {
            for iy in iy0..=iy1 {
                out.push((ix, iy));
            }
        }
        out
    }

    fn remove_from_cell(cells: &mut HashMap<Cell, SmallVec<[K; 8]>>, cell: Cell, id: K) {
        if let Some(ids) = cells.get_mut(&cell) {
            if let Some(pos) = ids.iter().position(|&k| k == id) {
                ids.swap_remove(pos);
            }
            if ids.is_empty() {
                // Dropping empty cells keeps the map compact for sparse grids.
                cells.remove(&cell);
            }
        }
    }
}
