// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for guarded type and value operations.
//!
//! Every operation that would be a contract violation on a bare reflection
//! primitive reports one of these variants instead. The messages always name
//! the operation plus the expected and actual kind/type, index and length,
//! or field name involved.

use crate::kind::Kind;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse failure class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Operation required kind K, the handle or descriptor has kind K'.
    KindMismatch,
    /// Mutation attempted through a handle that may not be written.
    NotAddressable,
    /// Index, field or numeric value outside its valid bounds.
    OutOfRange,
    /// Composite type construction given an invalid shape.
    ShapeInvalid,
    /// Value type does not match the target's declared type.
    TypeIncompatible,
    /// Operation invoked on a kind or state outside its supported set.
    Unsupported,
}

/// Errors for type and value operations.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("{op}: expected {expected}, got {actual}")]
    KindMismatch {
        op: &'static str,
        expected: String,
        actual: Kind,
    },

    #[error("{op}: value is not addressable")]
    NotAddressable { op: &'static str },

    #[error("{op}: value was obtained through an unexported field")]
    Unexported { op: &'static str },

    #[error("{op}: index {index} out of range for length {len}")]
    OutOfRange {
        op: &'static str,
        index: usize,
        len: usize,
    },

    #[error("no field named \"{name}\" on {ty}")]
    NoSuchField { name: String, ty: String },

    #[error("{op}: value {value} overflows {kind}")]
    Overflow {
        op: &'static str,
        value: String,
        kind: Kind,
    },

    #[error("invalid shape: {0}")]
    ShapeInvalid(String),

    #[error("{op}: expected type {expected}, got {actual}")]
    TypeIncompatible {
        op: &'static str,
        expected: String,
        actual: String,
    },

    #[error("{op}: kind {kind} not supported")]
    Unsupported { op: &'static str, kind: Kind },

    #[error("{op}: invalid value")]
    InvalidValue { op: &'static str },

    #[error("{op}: nil dereference")]
    NilDereference { op: &'static str },

    #[error("{op}: operation would block")]
    WouldBlock { op: &'static str },

    #[error("{op}: channel is closed")]
    Closed { op: &'static str },

    #[error("{op}: value is already borrowed")]
    BorrowConflict { op: &'static str },

    #[error("call failed: {0}")]
    Call(String),
}

impl Error {
    /// Map this error onto its failure class.
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::KindMismatch { .. } | Error::InvalidValue { .. } => ErrorClass::KindMismatch,
            Error::NotAddressable { .. }
            | Error::Unexported { .. }
            | Error::BorrowConflict { .. } => ErrorClass::NotAddressable,
            Error::OutOfRange { .. } | Error::NoSuchField { .. } | Error::Overflow { .. } => {
                ErrorClass::OutOfRange
            }
            Error::ShapeInvalid(_) => ErrorClass::ShapeInvalid,
            Error::TypeIncompatible { .. } => ErrorClass::TypeIncompatible,
            Error::Unsupported { .. }
            | Error::NilDereference { .. }
            | Error::WouldBlock { .. }
            | Error::Closed { .. }
            | Error::Call(_) => ErrorClass::Unsupported,
        }
    }

    pub(crate) fn kind_mismatch(op: &'static str, expected: impl Into<String>, actual: Kind) -> Self {
        Error::KindMismatch {
            op,
            expected: expected.into(),
            actual,
        }
    }

    pub(crate) fn incompatible(
        op: &'static str,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Error::TypeIncompatible {
            op,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        Error::ShapeInvalid(msg.into())
    }
}
