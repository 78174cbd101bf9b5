// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Kind taxonomy.
//!
//! A [`Kind`] classifies the fundamental shape of every representable type.
//! Dispatch over kinds is always an exhaustive `match`; there is no catch-all
//! arm that could hide an unsupported kind.

use std::fmt;

/// Closed set of runtime shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    /// The kind of the zero (invalid) value handle.
    Invalid,
    Bool,
    Isize,
    I8,
    I16,
    I32,
    I64,
    Usize,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    /// Fixed-length array.
    Array,
    /// Ordered, resizable sequence.
    Slice,
    /// Associative container.
    Map,
    /// Reference to an addressable value.
    Pointer,
    /// Record with named fields.
    Struct,
    /// Bounded FIFO channel.
    Chan,
    Func,
    /// Dynamically typed slot constrained by a method set.
    Interface,
}

impl Kind {
    /// Lower-case name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Invalid => "invalid",
            Kind::Bool => "bool",
            Kind::Isize => "isize",
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::Usize => "usize",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Slice => "slice",
            Kind::Map => "map",
            Kind::Pointer => "pointer",
            Kind::Struct => "struct",
            Kind::Chan => "chan",
            Kind::Func => "func",
            Kind::Interface => "interface",
        }
    }

    /// Signed integer kinds.
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            Kind::Isize | Kind::I8 | Kind::I16 | Kind::I32 | Kind::I64
        )
    }

    /// Unsigned integer kinds.
    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            Kind::Usize | Kind::U8 | Kind::U16 | Kind::U32 | Kind::U64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, Kind::F32 | Kind::F64)
    }

    pub fn is_numeric(self) -> bool {
        self.is_signed() || self.is_unsigned() || self.is_float()
    }

    /// Whether the kind is a scalar (numeric, bool or string).
    pub fn is_scalar(self) -> bool {
        self.is_numeric() || matches!(self, Kind::Bool | Kind::String)
    }

    /// Width in bits of numeric kinds.
    pub fn bits(self) -> Option<usize> {
        match self {
            Kind::I8 | Kind::U8 => Some(8),
            Kind::I16 | Kind::U16 => Some(16),
            Kind::I32 | Kind::U32 | Kind::F32 => Some(32),
            Kind::I64 | Kind::U64 | Kind::F64 => Some(64),
            Kind::Isize | Kind::Usize => Some(usize::BITS as usize),
            Kind::Invalid
            | Kind::Bool
            | Kind::String
            | Kind::Array
            | Kind::Slice
            | Kind::Map
            | Kind::Pointer
            | Kind::Struct
            | Kind::Chan
            | Kind::Func
            | Kind::Interface => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
