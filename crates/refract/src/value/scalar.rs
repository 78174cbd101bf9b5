// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scalar accessors and setters.

use super::data::{float_of, int_of, uint_of};
use super::{DynamicValue, SliceRef, Value};
use crate::error::{Error, Result};
use crate::kind::Kind;

const SIGNED: &str = "signed integer";
const UNSIGNED: &str = "unsigned integer";
const FLOAT: &str = "float";

fn is_byte_slice(ty: &crate::types::Type) -> bool {
    ty.kind() == Kind::Slice && ty.elem().is_ok_and(|e| e.kind() == Kind::U8)
}

impl Value {
    pub fn as_bool(&self) -> Result<bool> {
        const OP: &str = "Value::as_bool";
        let inner = self.guard(OP, "bool", |k| k == Kind::Bool)?;
        inner
            .place
            .read(OP, |v| v.as_bool().ok_or(Error::InvalidValue { op: OP }))
    }

    /// Any signed integer, widened.
    pub fn as_int(&self) -> Result<i64> {
        const OP: &str = "Value::as_int";
        let inner = self.guard(OP, SIGNED, Kind::is_signed)?;
        inner
            .place
            .read(OP, |v| v.as_i64().ok_or(Error::InvalidValue { op: OP }))
    }

    /// Any unsigned integer, widened.
    pub fn as_uint(&self) -> Result<u64> {
        const OP: &str = "Value::as_uint";
        let inner = self.guard(OP, UNSIGNED, Kind::is_unsigned)?;
        inner
            .place
            .read(OP, |v| v.as_u64().ok_or(Error::InvalidValue { op: OP }))
    }

    pub fn as_float(&self) -> Result<f64> {
        const OP: &str = "Value::as_float";
        let inner = self.guard(OP, FLOAT, Kind::is_float)?;
        inner
            .place
            .read(OP, |v| v.as_f64().ok_or(Error::InvalidValue { op: OP }))
    }

    pub fn as_string(&self) -> Result<String> {
        const OP: &str = "Value::as_string";
        let inner = self.guard(OP, "string", |k| k == Kind::String)?;
        inner.place.read(OP, |v| {
            v.as_str()
                .map(str::to_owned)
                .ok_or(Error::InvalidValue { op: OP })
        })
    }

    /// Contents of a `[]u8`.
    pub fn as_bytes(&self) -> Result<Vec<u8>> {
        const OP: &str = "Value::as_bytes";
        let inner = self.inner(OP)?;
        if !is_byte_slice(&inner.ty) {
            return Err(Error::kind_mismatch(OP, "[]u8", inner.ty.kind()));
        }
        let Some(slice) = inner.slice(OP)? else {
            return Ok(Vec::new());
        };
        slice
            .items(OP)?
            .iter()
            .map(|b| match b {
                DynamicValue::U8(b) => Ok(*b),
                _ => Err(Error::InvalidValue { op: OP }),
            })
            .collect()
    }

    pub fn set_bool(&self, x: bool) -> Result<()> {
        const OP: &str = "Value::set_bool";
        let inner = self.guard(OP, "bool", |k| k == Kind::Bool)?;
        Self::ensure_settable(inner, OP)?;
        inner.place.store(OP, DynamicValue::Bool(x))
    }

    /// Store `x`, rejecting values that do not fit the target width.
    pub fn set_int(&self, x: i64) -> Result<()> {
        const OP: &str = "Value::set_int";
        let inner = self.guard(OP, SIGNED, Kind::is_signed)?;
        Self::ensure_settable(inner, OP)?;
        let kind = inner.ty.kind();
        let stored = int_of(kind, x).ok_or_else(|| Error::Overflow {
            op: OP,
            value: x.to_string(),
            kind,
        })?;
        inner.place.store(OP, stored)
    }

    pub fn set_uint(&self, x: u64) -> Result<()> {
        const OP: &str = "Value::set_uint";
        let inner = self.guard(OP, UNSIGNED, Kind::is_unsigned)?;
        Self::ensure_settable(inner, OP)?;
        let kind = inner.ty.kind();
        let stored = uint_of(kind, x).ok_or_else(|| Error::Overflow {
            op: OP,
            value: x.to_string(),
            kind,
        })?;
        inner.place.store(OP, stored)
    }

    pub fn set_float(&self, x: f64) -> Result<()> {
        const OP: &str = "Value::set_float";
        let inner = self.guard(OP, FLOAT, Kind::is_float)?;
        Self::ensure_settable(inner, OP)?;
        let kind = inner.ty.kind();
        let stored = float_of(kind, x).ok_or_else(|| Error::Overflow {
            op: OP,
            value: x.to_string(),
            kind,
        })?;
        inner.place.store(OP, stored)
    }

    pub fn set_string(&self, x: impl Into<String>) -> Result<()> {
        const OP: &str = "Value::set_string";
        let inner = self.guard(OP, "string", |k| k == Kind::String)?;
        Self::ensure_settable(inner, OP)?;
        inner.place.store(OP, DynamicValue::String(x.into()))
    }

    /// Replace a `[]u8` with a fresh slice holding `bytes`.
    pub fn set_bytes(&self, bytes: &[u8]) -> Result<()> {
        const OP: &str = "Value::set_bytes";
        let inner = self.inner(OP)?;
        if !is_byte_slice(&inner.ty) {
            return Err(Error::kind_mismatch(OP, "[]u8", inner.ty.kind()));
        }
        Self::ensure_settable(inner, OP)?;
        let items = bytes.iter().copied().map(DynamicValue::U8).collect();
        inner
            .place
            .store(OP, DynamicValue::Slice(Some(SliceRef::from_vec(items))))
    }

    /// Whether `x` would overflow this signed integer's width.
    pub fn overflow_int(&self, x: i64) -> Result<bool> {
        let inner = self.guard("Value::overflow_int", SIGNED, Kind::is_signed)?;
        Ok(int_of(inner.ty.kind(), x).is_none())
    }

    pub fn overflow_uint(&self, x: u64) -> Result<bool> {
        let inner = self.guard("Value::overflow_uint", UNSIGNED, Kind::is_unsigned)?;
        Ok(uint_of(inner.ty.kind(), x).is_none())
    }

    pub fn overflow_float(&self, x: f64) -> Result<bool> {
        let inner = self.guard("Value::overflow_float", FLOAT, Kind::is_float)?;
        Ok(float_of(inner.ty.kind(), x).is_none())
    }
}
