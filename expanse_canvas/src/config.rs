// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use expanse_registry::RegistryConfig;
use expanse_viewport::ViewportConfig;

/// Configuration for a [`Canvas`](crate::Canvas).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasConfig {
    /// Registry tuning.
    pub registry: RegistryConfig,
    /// Camera limits.
    pub viewport: ViewportConfig,
    /// Overlap ratio an entity must exceed to be box-selected.
    pub select_threshold: f64,
    /// Overlap ratio a container must exceed to become a drop target.
    pub drop_threshold: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            viewport: ViewportConfig::default(),
            select_threshold: 0.0,
            drop_threshold: 0.5,
        }
    }
}

impl CanvasConfig {
    /// Sets the registry tuning.
    #[must_use]
    pub fn with_registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = registry;
        self
    }

    /// Sets the camera limits.
    #[must_use]
    pub fn with_viewport(mut self, viewport: ViewportConfig) -> Self {
        self.viewport = viewport;
        self
    }

    /// Sets the box-select threshold.
    #[must_use]
    pub fn with_select_threshold(mut self, threshold: f64) -> Self {
        self.select_threshold = threshold;
        self
    }

    /// Sets the drop-target threshold.
    #[must_use]
    pub fn with_drop_threshold(mut self, threshold: f64) -> Self {
        self.drop_threshold = threshold;
        self
    }
}
