// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selected entities.

use alloc::vec::Vec;

/// The set of selected entity ids, plus a primary id and a revision counter.
///
/// Ids are kept in insertion order without duplicates. The revision bumps
/// only when the contents or the primary actually change, so observers can
/// compare revisions instead of contents.
#[derive(Clone, Debug, Default)]
pub struct Selection<K> {
    items: Vec<K>,
    primary: Option<usize>,
    revision: u64,
}

impl<K: Copy + PartialEq> Selection<K> {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            primary: None,
            revision: 0,
        }
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Selected ids in insertion order.
    #[must_use]
    pub fn items(&self) -> &[K] {
        &self.items
    }

    /// The most recently selected id.
    #[must_use]
    pub fn primary(&self) -> Option<K> {
        self.primary.and_then(|i| self.items.get(i).copied())
    }

    /// Change counter.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns `true` if `id` is selected.
    #[must_use]
    pub fn contains(&self, id: K) -> bool {
        self.items.contains(&id)
    }

    /// Replaces the selection with `id` alone.
    pub fn select_only(&mut self, id: K) {
        if self.items == [id] {
            if self.primary.is_none() {
                self.primary = Some(0);
                self.bump();
            }
            return;
        }
        self.items.clear();
        self.items.push(id);
        self.primary = Some(0);
        self.bump();
    }

    /// Adds `id` and makes it primary.
    pub fn add(&mut self, id: K) {
        match self.items.iter().position(|k| *k == id) {
            Some(i) if self.primary == Some(i) => {}
            Some(i) => {
                self.primary = Some(i);
                self.bump();
            }
            None => {
                self.items.push(id);
                self.primary = Some(self.items.len() - 1);
                self.bump();
            }
        }
    }

    /// Removes `id` if present.
    pub fn remove(&mut self, id: K) {
        if let Some(i) = self.items.iter().position(|k| *k == id) {
            self.items.remove(i);
            self.primary = match self.primary {
                Some(p) if p == i => None,
                Some(p) if p > i => Some(p - 1),
                p => p,
            };
            self.bump();
        }
    }

    /// Adds `id` if absent, removes it otherwise.
    pub fn toggle(&mut self, id: K) {
        if self.contains(id) {
            self.remove(id);
        } else {
            self.add(id);
        }
    }

    /// Replaces the selection with `ids`, ignoring duplicates.
    ///
    /// The primary is kept if still selected, else it becomes the first id.
    pub fn replace_with(&mut self, ids: impl IntoIterator<Item = K>) {
        let mut items = Vec::new();
        for id in ids {
            if !items.contains(&id) {
                items.push(id);
            }
        }
        let primary = self.primary();
        if items == self.items {
            return;
        }
        self.primary = primary
            .and_then(|p| items.iter().position(|k| *k == p))
            .or((!items.is_empty()).then_some(0));
        self.items = items;
        self.bump();
    }

    /// Keeps only ids for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(K) -> bool) {
        let primary = self.primary();
        let before = self.items.len();
        self.items.retain(|k| keep(*k));
        if self.items.len() != before {
            self.primary = primary.and_then(|p| self.items.iter().position(|k| *k == p));
            self.bump();
        }
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.primary = None;
        self.bump();
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
