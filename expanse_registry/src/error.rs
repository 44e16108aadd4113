// Copyright 2025 the Expanse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt::Debug;

use expanse_transform::TransformError;

/// Errors raised by registry writes.
///
/// Reads never fail: unknown or pending-removal ids simply read as absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError<K: Debug> {
    /// A structural transform error, such as a parenting cycle.
    #[error(transparent)]
    Transform(#[from] TransformError),
    /// The entity is not registered (or is pending removal).
    #[error("entity {0:?} is not registered")]
    UnknownEntity(K),
    /// The requested parent entity is not registered.
    #[error("parent entity {0:?} is not registered")]
    UnknownParent(K),
}
