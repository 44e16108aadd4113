// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use expanse_index::DEFAULT_CELL_SIZE;

/// Tuning for an [`EntityRegistry`](crate::EntityRegistry).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegistryConfig {
    /// Edge length of a spatial index cell, in world units.
    pub cell_size: f64,
    /// Quiet period after the last transform change before an entity is re-indexed.
    ///
    /// Zero re-indexes on every change.
    pub index_debounce: Duration,
    /// Delay between `deregister` and actual removal, absorbing unmount/remount churn.
    ///
    /// Zero removes immediately.
    pub removal_grace: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            index_debounce: Duration::from_millis(500),
            removal_grace: Duration::from_millis(100),
        }
    }
}

impl RegistryConfig {
    /// Sets the spatial index cell size.
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Sets the index debounce window.
    #[must_use]
    pub fn with_index_debounce(mut self, debounce: Duration) -> Self {
        self.index_debounce = debounce;
        self
    }

    /// Sets the removal grace window.
    #[must_use]
    pub fn with_removal_grace(mut self, grace: Duration) -> Self {
        self.removal_grace = grace;
        self
    }
}
