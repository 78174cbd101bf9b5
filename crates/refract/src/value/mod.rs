// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime value handles.
//!
//! A [`Value`] pairs a storage [`Place`] with its [`Type`] and two flags:
//! `addressable` (writes through this handle reach the original storage) and
//! `read_only` (the handle was reached through an unexported field). Every
//! accessor checks the kind, bounds and flags before touching storage and
//! returns a typed [`Error`] instead of panicking.
//!
//! # Example
//!
//! ```rust
//! use refract::value::{self, value_of};
//! use refract::{ErrorClass, Type};
//!
//! let v = value_of(7i32);
//! assert_eq!(v.as_int().unwrap(), 7);
//! assert_eq!(v.as_string().unwrap_err().class(), ErrorClass::KindMismatch);
//! assert_eq!(v.set_int(8).unwrap_err().class(), ErrorClass::NotAddressable);
//!
//! let ptr = value::new(&Type::of::<i32>());
//! let target = ptr.elem().unwrap();
//! target.set_int(8).unwrap();
//! assert_eq!(target.extract_as::<i32>().unwrap(), 8);
//! ```

mod container;
mod convert;
mod data;
mod func;
mod place;
mod scalar;

pub use container::{
    append_slice, append_values, copy_values, make_chan, make_map, make_map_with_size, make_slice,
};
pub use convert::{value_of, FromReflect, Reflect, ReflectKey};
pub use data::{zero_value, ChanData, ChanRef, DynamicValue, MapData, MapRef, SliceRef};
pub use func::{make_func, Callable, MethodFn, NativeFn};
pub use place::Place;

use crate::error::{Error, Result};
use crate::kind::Kind;
use crate::types::Type;
use data::cast_numeric;
use place::Step;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;

/// Handle to a runtime value. The default handle is invalid.
#[derive(Clone, Default)]
pub struct Value(Option<Inner>);

#[derive(Clone)]
struct Inner {
    place: Place,
    ty: Type,
    flags: Flags,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Flags {
    addressable: bool,
    read_only: bool,
}

impl Inner {
    fn slice(&self, op: &'static str) -> Result<Option<SliceRef>> {
        self.place.read(op, |v| match v {
            DynamicValue::Slice(s) => Ok(s.clone()),
            _ => Err(Error::InvalidValue { op }),
        })
    }

    fn map(&self, op: &'static str) -> Result<Option<MapRef>> {
        self.place.read(op, |v| match v {
            DynamicValue::Map(m) => Ok(m.clone()),
            _ => Err(Error::InvalidValue { op }),
        })
    }

    fn chan(&self, op: &'static str) -> Result<Option<ChanRef>> {
        self.place.read(op, |v| match v {
            DynamicValue::Chan(c) => Ok(c.clone()),
            _ => Err(Error::InvalidValue { op }),
        })
    }

    /// A handle to `place` that inherits this handle's flags.
    fn derive(&self, place: Place, ty: Type, read_only: bool) -> Value {
        Value(Some(Inner {
            place,
            ty,
            flags: Flags {
                addressable: self.flags.addressable,
                read_only: self.flags.read_only || read_only,
            },
        }))
    }
}

pub(crate) fn borrow<'a, T>(cell: &'a RefCell<T>, op: &'static str) -> Result<Ref<'a, T>> {
    cell.try_borrow().map_err(|_| Error::BorrowConflict { op })
}

pub(crate) fn borrow_mut<'a, T>(cell: &'a RefCell<T>, op: &'static str) -> Result<RefMut<'a, T>> {
    cell.try_borrow_mut()
        .map_err(|_| Error::BorrowConflict { op })
}

impl Value {
    pub(crate) fn from_place(place: Place, ty: Type, addressable: bool) -> Self {
        Value(Some(Inner {
            place,
            ty,
            flags: Flags {
                addressable,
                read_only: false,
            },
        }))
    }

    /// Non-addressable handle over a fresh cell.
    pub(crate) fn detached(value: DynamicValue, ty: Type) -> Self {
        Self::from_place(Place::detached(value), ty, false)
    }

    /// Addressable handle over a fresh cell.
    pub(crate) fn owned(value: DynamicValue, ty: Type) -> Self {
        Self::from_place(Place::detached(value), ty, true)
    }

    fn with_read_only(mut self, read_only: bool) -> Self {
        if let Some(inner) = self.0.as_mut() {
            inner.flags.read_only |= read_only;
        }
        self
    }

    /// The invalid handle.
    pub fn invalid() -> Self {
        Value(None)
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// Kind of the value; `Kind::Invalid` for the invalid handle.
    pub fn kind(&self) -> Kind {
        self.0.as_ref().map_or(Kind::Invalid, |inner| inner.ty.kind())
    }

    pub fn ty(&self) -> Result<Type> {
        Ok(self.inner("Value::ty")?.ty.clone())
    }

    /// Whether writes through this handle reach the original storage.
    pub fn can_addr(&self) -> bool {
        self.0.as_ref().is_some_and(|inner| inner.flags.addressable)
    }

    pub fn can_set(&self) -> bool {
        self.0
            .as_ref()
            .is_some_and(|inner| inner.flags.addressable && !inner.flags.read_only)
    }

    /// Whether `extract` may expose the value.
    pub fn can_interface(&self) -> bool {
        self.0.as_ref().is_some_and(|inner| !inner.flags.read_only)
    }

    fn inner(&self, op: &'static str) -> Result<&Inner> {
        self.0.as_ref().ok_or(Error::InvalidValue { op })
    }

    fn guard(
        &self,
        op: &'static str,
        expected: &'static str,
        accept: impl Fn(Kind) -> bool,
    ) -> Result<&Inner> {
        let inner = self.inner(op)?;
        let kind = inner.ty.kind();
        if accept(kind) {
            Ok(inner)
        } else {
            Err(Error::kind_mismatch(op, expected, kind))
        }
    }

    fn ensure_settable(inner: &Inner, op: &'static str) -> Result<()> {
        if inner.flags.read_only {
            return Err(Error::Unexported { op });
        }
        if !inner.flags.addressable {
            return Err(Error::NotAddressable { op });
        }
        Ok(())
    }

    fn settable(&self, op: &'static str) -> Result<&Inner> {
        let inner = self.inner(op)?;
        Self::ensure_settable(inner, op)?;
        Ok(inner)
    }

    /// Storage form of this value for a slot of type `target`, boxing it when
    /// the slot is an interface.
    pub(crate) fn coerce_to(&self, target: &Type, op: &'static str) -> Result<DynamicValue> {
        let inner = self.inner(op)?;
        if inner.flags.read_only {
            return Err(Error::Unexported { op });
        }
        if !inner.ty.assignable_to(target) {
            return Err(Error::incompatible(op, target, &inner.ty));
        }
        let value = inner.place.load(op)?;
        if target.kind() == Kind::Interface && inner.ty.kind() != Kind::Interface {
            return Ok(DynamicValue::Interface(Some(Box::new((
                inner.ty.clone(),
                value,
            )))));
        }
        Ok(value)
    }

    /// Target of a pointer, or the dynamic value held by an interface.
    ///
    /// Pointer targets are addressable; interface contents are copies.
    pub fn elem(&self) -> Result<Value> {
        const OP: &str = "Value::elem";
        let inner = self.guard(OP, "pointer or interface", |k| {
            matches!(k, Kind::Pointer | Kind::Interface)
        })?;
        let read_only = inner.flags.read_only;
        match inner.place.load(OP)? {
            DynamicValue::Pointer(Some(place)) => {
                Ok(Value::from_place(place, inner.ty.elem()?, true).with_read_only(read_only))
            }
            DynamicValue::Interface(Some(boxed)) => {
                let (ty, value) = *boxed;
                Ok(Value::detached(value, ty).with_read_only(read_only))
            }
            DynamicValue::Pointer(None) | DynamicValue::Interface(None) => {
                Err(Error::NilDereference { op: OP })
            }
            _ => Err(Error::InvalidValue { op: OP }),
        }
    }

    /// Pointer to this value's storage.
    pub fn addr(&self) -> Result<Value> {
        const OP: &str = "Value::addr";
        let inner = self.inner(OP)?;
        if !inner.flags.addressable {
            return Err(Error::NotAddressable { op: OP });
        }
        Ok(Value::detached(
            DynamicValue::Pointer(Some(inner.place.clone())),
            Type::pointer_to(&inner.ty),
        )
        .with_read_only(inner.flags.read_only))
    }

    pub fn num_field(&self) -> Result<usize> {
        self.guard("Value::num_field", "struct", |k| k == Kind::Struct)?
            .ty
            .num_field()
    }

    /// The i'th field. Fields with lower-case names yield read-only handles.
    pub fn field(&self, i: usize) -> Result<Value> {
        const OP: &str = "Value::field";
        let inner = self.guard(OP, "struct", |k| k == Kind::Struct)?;
        let field = inner.ty.field(i)?;
        let exported = field.is_exported();
        Ok(inner.derive(inner.place.child(Step::Field(i)), field.ty, !exported))
    }

    pub fn field_by_index(&self, index: &[usize]) -> Result<Value> {
        if index.is_empty() {
            return Err(Error::shape("Value::field_by_index: empty index path"));
        }
        let mut current = self.clone();
        for &i in index {
            current = current.field(i)?;
        }
        Ok(current)
    }

    /// Field by name, following promoted fields of embedded structs.
    pub fn field_by_name(&self, name: &str) -> Result<Value> {
        const OP: &str = "Value::field_by_name";
        let inner = self.guard(OP, "struct", |k| k == Kind::Struct)?;
        let found = inner
            .ty
            .field_by_name(name)?
            .ok_or_else(|| Error::NoSuchField {
                name: name.to_string(),
                ty: inner.ty.to_string(),
            })?;
        self.field_by_index(&found.index)
    }

    pub fn field_by_name_func(&self, matcher: impl Fn(&str) -> bool) -> Result<Option<Value>> {
        const OP: &str = "Value::field_by_name_func";
        let inner = self.guard(OP, "struct", |k| k == Kind::Struct)?;
        match inner.ty.field_by_name_func(matcher)? {
            Some(found) => self.field_by_index(&found.index).map(Some),
            None => Ok(None),
        }
    }

    /// Element `i` of a slice, array or string (strings yield `u8` copies).
    ///
    /// Slice and array elements alias the container's storage and are
    /// addressable iff this handle is.
    pub fn index(&self, i: usize) -> Result<Value> {
        const OP: &str = "Value::index";
        let inner = self.guard(OP, "slice, array or string", |k| {
            matches!(k, Kind::Slice | Kind::Array | Kind::String)
        })?;
        match inner.ty.kind() {
            Kind::Slice => {
                let slice = inner.slice(OP)?;
                let len = slice.as_ref().map_or(0, SliceRef::len);
                match slice {
                    Some(s) if i < len => Ok(inner.derive(s.elem_place(i), inner.ty.elem()?, false)),
                    _ => Err(Error::OutOfRange { op: OP, index: i, len }),
                }
            }
            Kind::Array => {
                let len = inner.ty.len()?;
                if i >= len {
                    return Err(Error::OutOfRange { op: OP, index: i, len });
                }
                Ok(inner.derive(inner.place.child(Step::Elem(i)), inner.ty.elem()?, false))
            }
            _ => {
                let (byte, len) = inner.place.read(OP, |v| {
                    let s = v.as_str().ok_or(Error::InvalidValue { op: OP })?;
                    Ok((s.as_bytes().get(i).copied(), s.len()))
                })?;
                let byte = byte.ok_or(Error::OutOfRange { op: OP, index: i, len })?;
                Ok(Value::detached(DynamicValue::U8(byte), Type::of::<u8>())
                    .with_read_only(inner.flags.read_only))
            }
        }
    }

    /// Length of a slice, array, string, map, channel or pointer to array.
    pub fn len(&self) -> Result<usize> {
        const OP: &str = "Value::len";
        let inner = self.inner(OP)?;
        match inner.ty.kind() {
            Kind::Slice => Ok(inner.slice(OP)?.map_or(0, |s| s.len())),
            Kind::Array => inner.ty.len(),
            Kind::String => inner.place.read(OP, |v| {
                v.as_str().map(str::len).ok_or(Error::InvalidValue { op: OP })
            }),
            Kind::Map => match inner.map(OP)? {
                Some(m) => Ok(borrow(&m, OP)?.len()),
                None => Ok(0),
            },
            Kind::Chan => match inner.chan(OP)? {
                Some(c) => Ok(borrow(&c, OP)?.buf.len()),
                None => Ok(0),
            },
            Kind::Pointer if inner.ty.elem()?.kind() == Kind::Array => inner.ty.elem()?.len(),
            kind => Err(Error::Unsupported { op: OP, kind }),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Capacity of a slice, array, channel or pointer to array.
    pub fn cap(&self) -> Result<usize> {
        const OP: &str = "Value::cap";
        let inner = self.inner(OP)?;
        match inner.ty.kind() {
            Kind::Slice => Ok(inner.slice(OP)?.map_or(0, |s| s.cap())),
            Kind::Array => inner.ty.len(),
            Kind::Chan => match inner.chan(OP)? {
                Some(c) => Ok(borrow(&c, OP)?.cap),
                None => Ok(0),
            },
            Kind::Pointer if inner.ty.elem()?.kind() == Kind::Array => inner.ty.elem()?.len(),
            kind => Err(Error::Unsupported { op: OP, kind }),
        }
    }

    /// Copy of the stored value. Read-only handles refuse.
    pub fn extract(&self) -> Result<DynamicValue> {
        const OP: &str = "Value::extract";
        let inner = self.inner(OP)?;
        if inner.flags.read_only {
            return Err(Error::Unexported { op: OP });
        }
        inner.place.load(OP)
    }

    /// Extract as a native Rust value. Interface handles are unwrapped first.
    pub fn extract_as<T: FromReflect>(&self) -> Result<T> {
        const OP: &str = "Value::extract_as";
        let inner = self.inner(OP)?;
        if inner.ty.kind() == Kind::Interface {
            return self.elem()?.extract_as::<T>();
        }
        let target = T::reflect_type();
        if inner.ty != target && !inner.ty.same_underlying(&target) {
            return Err(Error::incompatible(OP, &target, &inner.ty));
        }
        let value = self.extract()?;
        T::from_dynamic(&value).ok_or_else(|| Error::incompatible(OP, &target, &inner.ty))
    }

    /// Assign `src` to this value. `src` must be assignable to this type.
    pub fn set(&self, src: &Value) -> Result<()> {
        const OP: &str = "Value::set";
        let inner = self.settable(OP)?;
        let value = src.coerce_to(&inner.ty, OP)?;
        inner.place.store(OP, value)
    }

    pub fn set_zero(&self) -> Result<()> {
        const OP: &str = "Value::set_zero";
        let inner = self.settable(OP)?;
        inner.place.store(OP, zero_value(&inner.ty))
    }

    /// Whether a pointer, map, slice, channel, func or interface is nil.
    pub fn is_nil(&self) -> Result<bool> {
        const OP: &str = "Value::is_nil";
        let inner = self.guard(OP, "pointer, map, slice, chan, func or interface", |k| {
            matches!(
                k,
                Kind::Pointer | Kind::Map | Kind::Slice | Kind::Chan | Kind::Func | Kind::Interface
            )
        })?;
        inner.place.read(OP, |v| Ok(v.is_zero()))
    }

    pub fn is_zero(&self) -> Result<bool> {
        const OP: &str = "Value::is_zero";
        self.inner(OP)?.place.read(OP, |v| Ok(v.is_zero()))
    }

    /// Whether `equal` is defined for this value.
    pub fn comparable(&self) -> bool {
        match self.kind() {
            Kind::Invalid => false,
            Kind::Interface => match self.elem() {
                Ok(content) => content.comparable(),
                Err(_) => true,
            },
            _ => self.0.as_ref().is_some_and(|inner| inner.ty.comparable()),
        }
    }

    fn unwrap_interface(&self) -> Result<Value> {
        if self.kind() != Kind::Interface {
            return Ok(self.clone());
        }
        match self.elem() {
            Err(Error::NilDereference { .. }) => Ok(Value::invalid()),
            other => other,
        }
    }

    /// Value equality; interfaces compare their contents.
    pub fn equal(&self, other: &Value) -> Result<bool> {
        const OP: &str = "Value::equal";
        let (a, b) = (self.unwrap_interface()?, other.unwrap_interface()?);
        let (Some(x), Some(y)) = (&a.0, &b.0) else {
            return Ok(a.is_valid() == b.is_valid());
        };
        if x.ty != y.ty {
            return Ok(false);
        }
        if !x.ty.comparable() {
            return Err(Error::Unsupported {
                op: OP,
                kind: x.ty.kind(),
            });
        }
        Ok(x.place.load(OP)? == y.place.load(OP)?)
    }

    pub fn can_convert(&self, target: &Type) -> bool {
        self.0
            .as_ref()
            .is_some_and(|inner| inner.ty.convertible_to(target))
    }

    /// Convert to `target`: numeric casts wrap, `string` and `[]u8` convert
    /// both ways, identical structures re-label.
    pub fn convert(&self, target: &Type) -> Result<Value> {
        const OP: &str = "Value::convert";
        let inner = self.inner(OP)?;
        if !inner.ty.convertible_to(target) {
            return Err(Error::incompatible(OP, target, &inner.ty));
        }
        let src = inner.place.load(OP)?;
        let out = if target.kind() == Kind::Interface && inner.ty.kind() != Kind::Interface {
            DynamicValue::Interface(Some(Box::new((inner.ty.clone(), src))))
        } else if inner.ty.assignable_to(target) || inner.ty.same_underlying(target) {
            src
        } else if inner.ty.kind().is_numeric() && target.kind().is_numeric() {
            cast_numeric(&src, target.kind()).ok_or(Error::InvalidValue { op: OP })?
        } else if target.kind() == Kind::String {
            let bytes = match src {
                DynamicValue::Slice(Some(s)) => s
                    .items(OP)?
                    .iter()
                    .filter_map(|b| match b {
                        DynamicValue::U8(b) => Some(*b),
                        _ => None,
                    })
                    .collect(),
                _ => Vec::new(),
            };
            DynamicValue::String(String::from_utf8_lossy(&bytes).into_owned())
        } else {
            let s = src.as_str().ok_or(Error::InvalidValue { op: OP })?;
            DynamicValue::Slice(Some(SliceRef::from_vec(
                s.bytes().map(DynamicValue::U8).collect(),
            )))
        };
        Ok(Value::detached(out, target.clone()).with_read_only(inner.flags.read_only))
    }
}

/// Zero value of `ty`. Not addressable.
pub fn zero(ty: &Type) -> Value {
    Value::detached(zero_value(ty), ty.clone())
}

/// Pointer to a fresh zero value of `ty`.
pub fn new(ty: &Type) -> Value {
    let place = Place::detached(zero_value(ty));
    Value::detached(DynamicValue::Pointer(Some(place)), Type::pointer_to(ty))
}

/// Target of `v` if it is a pointer, `v` itself otherwise. A nil pointer
/// yields the invalid handle.
pub fn indirect(v: &Value) -> Result<Value> {
    if v.kind() != Kind::Pointer {
        return Ok(v.clone());
    }
    match v.elem() {
        Err(Error::NilDereference { .. }) => Ok(Value::invalid()),
        other => other,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => f.write_str("<invalid Value>"),
            Some(inner) if inner.ty.kind() == Kind::String => {
                match inner.place.read("Value::fmt", |v| Ok(v.as_str().map(str::to_owned))) {
                    Ok(Some(s)) => f.write_str(&s),
                    _ => write!(f, "<{} Value>", inner.ty),
                }
            }
            Some(inner) => write!(f, "<{} Value>", inner.ty),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => f.write_str("Value(<invalid>)"),
            Some(inner) => f
                .debug_struct("Value")
                .field("ty", &inner.ty)
                .field("value", &inner.place.load("Value::fmt").ok())
                .field("addressable", &inner.flags.addressable)
                .field("read_only", &inner.flags.read_only)
                .finish(),
        }
    }
}
