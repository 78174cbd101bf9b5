// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dictionary errors.

use thiserror::Error;

/// Result alias for dictionary operations.
pub type Result<T> = std::result::Result<T, DictError>;

/// Errors from JSON dictionary access.
#[derive(Debug, Error)]
pub enum DictError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("key {0:?} not found in dict")]
    KeyNotFound(String),

    #[error("value under key {key:?} is not of type {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// The value at this level is a map or a slice, not a scalar.
    #[error("unable to get value at this level, value at this level is of type: {0}")]
    NotAScalar(&'static str),

    /// A key or index was missed at a higher level.
    #[error("unable to get value at current level, went too deep or missed a key at higher level")]
    Missing,

    #[error(transparent)]
    Value(#[from] refract::Error),
}
