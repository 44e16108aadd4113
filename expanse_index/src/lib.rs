// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanse Index: a fixed-cell grid hash for pruning spatial query candidates.
//!
//! [`SpatialIndex`] buckets world-space boxes into square cells (100 world
//! units by default). An id occupies every cell its box overlaps. Queries
//! return the union of ids in the cells the query touches: an
//! over-approximation that never misses an overlapping id, which callers then
//! verify with an exact geometric test.
//!
//! Updates are incremental: moving an id only touches the cells it leaves and
//! the cells it enters. Empty cells are dropped to keep sparse canvases compact.
//!
//! ```rust
//! use kurbo::Rect;
//! use expanse_index::SpatialIndex;
//!
//! let mut index = SpatialIndex::new();
//! index.replace("a", Rect::new(0.0, 0.0, 50.0, 50.0));
//! index.replace("b", Rect::new(90.0, 90.0, 140.0, 140.0));
//!
//! assert_eq!(index.cells_of("a"), Some(&[(0, 0)][..]));
//! assert_eq!(index.cells_of("b").map(<[_]>::len), Some(4));
//!
//! // Both ids share cell (0, 0), so both are candidates for a tiny query there.
//! let mut hits = index.query_rect(Rect::new(95.0, 95.0, 96.0, 96.0));
//! hits.sort_unstable();
//! assert_eq!(hits, ["a", "b"]);
//! ```
//!
//! Time-based debouncing of updates is left to the owner of the index.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod grid;

pub use grid::{Cell, DEFAULT_CELL_SIZE, SpatialIndex};
