// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value storage.
//!
//! Value kinds (scalars, arrays, structs) are stored inline. Reference kinds
//! share their storage: slices are windows over a backing array, maps and
//! channels sit behind `Rc<RefCell<_>>`, pointers hold a [`Place`].

use super::func::Callable;
use super::place::{Place, Step};
use crate::error::{Error, Result};
use crate::kind::Kind;
use crate::types::{PrimitiveKind, Type, TypeKind};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A dynamic value of any representable kind.
#[derive(Debug, Clone)]
pub enum DynamicValue {
    // Primitives
    Bool(bool),
    Isize(isize),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Usize(usize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),

    // Inline composites
    Array(Vec<DynamicValue>),
    /// Field values in declaration order.
    Struct(Vec<DynamicValue>),

    // Shared (nil when `None`)
    Slice(Option<SliceRef>),
    Map(Option<MapRef>),
    Pointer(Option<Place>),
    Chan(Option<ChanRef>),
    Func(Option<Callable>),
    /// Dynamic type and value held by an interface slot.
    Interface(Option<Box<(Type, DynamicValue)>>),
}

pub type MapRef = Rc<RefCell<MapData>>;
pub type ChanRef = Rc<RefCell<ChanData>>;

/// Window over a backing array: `len` visible elements starting at `offset`,
/// room for `cap` before the array ends.
#[derive(Debug, Clone)]
pub struct SliceRef {
    base: Place,
    offset: usize,
    len: usize,
    cap: usize,
}

impl SliceRef {
    /// Allocate a backing array holding `items` and padded with `zero` up to `cap`.
    pub(crate) fn alloc(mut items: Vec<DynamicValue>, cap: usize, zero: &DynamicValue) -> Self {
        let len = items.len();
        let cap = cap.max(len);
        items.resize(cap, zero.clone());
        Self {
            base: Place::detached(DynamicValue::Array(items)),
            offset: 0,
            len,
            cap,
        }
    }

    pub(crate) fn from_vec(items: Vec<DynamicValue>) -> Self {
        let len = items.len();
        Self {
            base: Place::detached(DynamicValue::Array(items)),
            offset: 0,
            len,
            cap: len,
        }
    }

    /// A window over an existing array place.
    pub(crate) fn over(base: Place, offset: usize, len: usize, cap: usize) -> Self {
        Self {
            base,
            offset,
            len,
            cap,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub(crate) fn with_len(&self, len: usize) -> Self {
        Self { len, ..self.clone() }
    }

    pub(crate) fn with_cap(&self, cap: usize) -> Self {
        Self { cap, ..self.clone() }
    }

    /// Re-slice relative to this window; bounds are checked by the caller.
    pub(crate) fn window(&self, low: usize, high: usize, max: usize) -> Self {
        Self {
            base: self.base.clone(),
            offset: self.offset + low,
            len: high - low,
            cap: max - low,
        }
    }

    /// Place of element `i` (may lie between `len` and `cap`).
    pub(crate) fn elem_place(&self, i: usize) -> Place {
        self.base.child(Step::Elem(self.offset + i))
    }

    /// Copy of the visible elements.
    pub(crate) fn items(&self, op: &'static str) -> Result<Vec<DynamicValue>> {
        let (start, end) = (self.offset, self.offset + self.len);
        self.base.read(op, |arr| match arr {
            DynamicValue::Array(items) => items
                .get(start..end)
                .map(<[DynamicValue]>::to_vec)
                .ok_or(Error::InvalidValue { op }),
            _ => Err(Error::InvalidValue { op }),
        })
    }

    /// Overwrite elements starting at window position `at`.
    pub(crate) fn write_at(
        &self,
        op: &'static str,
        at: usize,
        values: Vec<DynamicValue>,
    ) -> Result<()> {
        let start = self.offset + at;
        self.base.write(op, |arr| match arr {
            DynamicValue::Array(items) => {
                let dst = items
                    .get_mut(start..start + values.len())
                    .ok_or(Error::InvalidValue { op })?;
                for (slot, v) in dst.iter_mut().zip(values) {
                    *slot = v;
                }
                Ok(())
            }
            _ => Err(Error::InvalidValue { op }),
        })
    }

    fn same_window(&self, other: &Self) -> bool {
        self.base == other.base
            && self.offset == other.offset
            && self.len == other.len
            && self.cap == other.cap
    }
}

/// Map storage: insertion-ordered entries with linear key equality.
#[derive(Debug, Default)]
pub struct MapData {
    entries: Vec<(DynamicValue, DynamicValue)>,
}

impl MapData {
    pub(crate) fn from_entries(entries: Vec<(DynamicValue, DynamicValue)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &DynamicValue) -> Option<&DynamicValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub(crate) fn insert(&mut self, key: DynamicValue, value: DynamicValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub(crate) fn remove(&mut self, key: &DynamicValue) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| k != key);
        before != self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[(DynamicValue, DynamicValue)] {
        &self.entries
    }
}

/// Bounded FIFO channel buffer.
#[derive(Debug)]
pub struct ChanData {
    pub(crate) buf: VecDeque<DynamicValue>,
    pub(crate) cap: usize,
    pub(crate) closed: bool,
}

impl ChanData {
    pub(crate) fn new(cap: usize) -> Self {
        Self {
            buf: VecDeque::with_capacity(cap),
            cap,
            closed: false,
        }
    }
}

impl DynamicValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Any signed integer widened to i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Isize(v) => Some(*v as i64),
            Self::I8(v) => Some(i64::from(*v)),
            Self::I16(v) => Some(i64::from(*v)),
            Self::I32(v) => Some(i64::from(*v)),
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Any unsigned integer widened to u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Usize(v) => Some(*v as u64),
            Self::U8(v) => Some(u64::from(*v)),
            Self::U16(v) => Some(u64::from(*v)),
            Self::U32(v) => Some(u64::from(*v)),
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F32(v) => Some(f64::from(*v)),
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Whether this is the zero value of its kind.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Bool(v) => !v,
            Self::Isize(_) | Self::I8(_) | Self::I16(_) | Self::I32(_) | Self::I64(_) => {
                self.as_i64() == Some(0)
            }
            Self::Usize(_) | Self::U8(_) | Self::U16(_) | Self::U32(_) | Self::U64(_) => {
                self.as_u64() == Some(0)
            }
            Self::F32(v) => v.to_bits() == 0,
            Self::F64(v) => v.to_bits() == 0,
            Self::String(s) => s.is_empty(),
            Self::Array(items) | Self::Struct(items) => items.iter().all(DynamicValue::is_zero),
            Self::Slice(s) => s.is_none(),
            Self::Map(m) => m.is_none(),
            Self::Pointer(p) => p.is_none(),
            Self::Chan(c) => c.is_none(),
            Self::Func(f) => f.is_none(),
            Self::Interface(i) => i.is_none(),
        }
    }
}

impl PartialEq for DynamicValue {
    fn eq(&self, other: &Self) -> bool {
        use DynamicValue as D;
        match (self, other) {
            (D::Bool(a), D::Bool(b)) => a == b,
            (D::Isize(a), D::Isize(b)) => a == b,
            (D::I8(a), D::I8(b)) => a == b,
            (D::I16(a), D::I16(b)) => a == b,
            (D::I32(a), D::I32(b)) => a == b,
            (D::I64(a), D::I64(b)) => a == b,
            (D::Usize(a), D::Usize(b)) => a == b,
            (D::U8(a), D::U8(b)) => a == b,
            (D::U16(a), D::U16(b)) => a == b,
            (D::U32(a), D::U32(b)) => a == b,
            (D::U64(a), D::U64(b)) => a == b,
            (D::F32(a), D::F32(b)) => a == b,
            (D::F64(a), D::F64(b)) => a == b,
            (D::String(a), D::String(b)) => a == b,
            (D::Array(a), D::Array(b)) | (D::Struct(a), D::Struct(b)) => a == b,
            (D::Slice(a), D::Slice(b)) => match (a, b) {
                (Some(a), Some(b)) => a.same_window(b),
                (None, None) => true,
                _ => false,
            },
            (D::Map(a), D::Map(b)) => same_rc(a, b),
            (D::Chan(a), D::Chan(b)) => same_rc(a, b),
            (D::Pointer(a), D::Pointer(b)) => a == b,
            (D::Func(a), D::Func(b)) => a == b,
            (D::Interface(a), D::Interface(b)) => a == b,
            _ => false,
        }
    }
}

fn same_rc<T>(a: &Option<Rc<T>>, b: &Option<Rc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Zero value of `ty`.
pub fn zero_value(ty: &Type) -> DynamicValue {
    match &ty.descriptor().kind {
        TypeKind::Primitive(p) => match p {
            PrimitiveKind::Bool => DynamicValue::Bool(false),
            PrimitiveKind::Isize => DynamicValue::Isize(0),
            PrimitiveKind::I8 => DynamicValue::I8(0),
            PrimitiveKind::I16 => DynamicValue::I16(0),
            PrimitiveKind::I32 => DynamicValue::I32(0),
            PrimitiveKind::I64 => DynamicValue::I64(0),
            PrimitiveKind::Usize => DynamicValue::Usize(0),
            PrimitiveKind::U8 => DynamicValue::U8(0),
            PrimitiveKind::U16 => DynamicValue::U16(0),
            PrimitiveKind::U32 => DynamicValue::U32(0),
            PrimitiveKind::U64 => DynamicValue::U64(0),
            PrimitiveKind::F32 => DynamicValue::F32(0.0),
            PrimitiveKind::F64 => DynamicValue::F64(0.0),
            PrimitiveKind::String => DynamicValue::String(String::new()),
        },
        TypeKind::Struct(fields) => {
            DynamicValue::Struct(fields.iter().map(|f| zero_value(&f.ty)).collect())
        }
        TypeKind::Array(arr) => {
            DynamicValue::Array(vec![zero_value(&arr.element_type); arr.length])
        }
        TypeKind::Sequence(_) => DynamicValue::Slice(None),
        TypeKind::Map(_) => DynamicValue::Map(None),
        TypeKind::Pointer(_) => DynamicValue::Pointer(None),
        TypeKind::Chan(_) => DynamicValue::Chan(None),
        TypeKind::Func(_) => DynamicValue::Func(None),
        TypeKind::Interface(_) => DynamicValue::Interface(None),
    }
}

/// Signed integer of `kind`, or `None` if `v` does not fit.
pub(crate) fn int_of(kind: Kind, v: i64) -> Option<DynamicValue> {
    match kind {
        Kind::Isize => isize::try_from(v).ok().map(DynamicValue::Isize),
        Kind::I8 => i8::try_from(v).ok().map(DynamicValue::I8),
        Kind::I16 => i16::try_from(v).ok().map(DynamicValue::I16),
        Kind::I32 => i32::try_from(v).ok().map(DynamicValue::I32),
        Kind::I64 => Some(DynamicValue::I64(v)),
        _ => None,
    }
}

/// Unsigned integer of `kind`, or `None` if `v` does not fit.
pub(crate) fn uint_of(kind: Kind, v: u64) -> Option<DynamicValue> {
    match kind {
        Kind::Usize => usize::try_from(v).ok().map(DynamicValue::Usize),
        Kind::U8 => u8::try_from(v).ok().map(DynamicValue::U8),
        Kind::U16 => u16::try_from(v).ok().map(DynamicValue::U16),
        Kind::U32 => u32::try_from(v).ok().map(DynamicValue::U32),
        Kind::U64 => Some(DynamicValue::U64(v)),
        _ => None,
    }
}

/// Float of `kind`; finite values beyond the f32 range do not fit.
pub(crate) fn float_of(kind: Kind, v: f64) -> Option<DynamicValue> {
    match kind {
        Kind::F32 if v.is_finite() && v.abs() > f64::from(f32::MAX) => None,
        Kind::F32 => Some(DynamicValue::F32(v as f32)),
        Kind::F64 => Some(DynamicValue::F64(v)),
        _ => None,
    }
}

/// Numeric conversion with `as` cast semantics (wrap and truncate).
pub(crate) fn cast_numeric(src: &DynamicValue, kind: Kind) -> Option<DynamicValue> {
    macro_rules! cast {
        ($v:expr) => {
            match kind {
                Kind::Isize => Some(DynamicValue::Isize($v as isize)),
                Kind::I8 => Some(DynamicValue::I8($v as i8)),
                Kind::I16 => Some(DynamicValue::I16($v as i16)),
                Kind::I32 => Some(DynamicValue::I32($v as i32)),
                Kind::I64 => Some(DynamicValue::I64($v as i64)),
                Kind::Usize => Some(DynamicValue::Usize($v as usize)),
                Kind::U8 => Some(DynamicValue::U8($v as u8)),
                Kind::U16 => Some(DynamicValue::U16($v as u16)),
                Kind::U32 => Some(DynamicValue::U32($v as u32)),
                Kind::U64 => Some(DynamicValue::U64($v as u64)),
                Kind::F32 => Some(DynamicValue::F32($v as f32)),
                Kind::F64 => Some(DynamicValue::F64($v as f64)),
                _ => None,
            }
        };
    }
    if let Some(v) = src.as_i64() {
        cast!(v)
    } else if let Some(v) = src.as_u64() {
        cast!(v)
    } else if let Some(v) = src.as_f64() {
        cast!(v)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values() {
        let ty = Type::struct_of(vec![
            crate::types::FieldSpec::new("A", Type::of::<i32>()),
            crate::types::FieldSpec::new("B", Type::array_of(&Type::of::<bool>(), 2)),
            crate::types::FieldSpec::new("C", Type::of::<Vec<u8>>()),
        ])
        .unwrap();
        let zero = zero_value(&ty);
        assert_eq!(
            zero,
            DynamicValue::Struct(vec![
                DynamicValue::I32(0),
                DynamicValue::Array(vec![DynamicValue::Bool(false); 2]),
                DynamicValue::Slice(None),
            ])
        );
        assert!(zero.is_zero());
    }

    #[test]
    fn test_reference_equality_is_identity() {
        let a = DynamicValue::Slice(Some(SliceRef::from_vec(vec![DynamicValue::I8(1)])));
        let b = DynamicValue::Slice(Some(SliceRef::from_vec(vec![DynamicValue::I8(1)])));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_fit_checks() {
        assert_eq!(int_of(Kind::I8, 127), Some(DynamicValue::I8(127)));
        assert_eq!(int_of(Kind::I8, 128), None);
        assert_eq!(uint_of(Kind::U16, 70_000), None);
        assert_eq!(float_of(Kind::F32, 1e40), None);
        assert!(float_of(Kind::F32, f64::INFINITY).is_some());
    }

    #[test]
    fn test_cast_wraps() {
        assert_eq!(
            cast_numeric(&DynamicValue::I32(300), Kind::U8),
            Some(DynamicValue::U8(44))
        );
        assert_eq!(
            cast_numeric(&DynamicValue::F64(2.9), Kind::I64),
            Some(DynamicValue::I64(2))
        );
        assert_eq!(cast_numeric(&DynamicValue::Bool(true), Kind::I64), None);
    }

    #[test]
    fn test_slice_window() {
        let s = SliceRef::alloc(vec![DynamicValue::I64(1), DynamicValue::I64(2)], 4, &DynamicValue::I64(0));
        assert_eq!(s.len(), 2);
        assert_eq!(s.cap(), 4);
        let w = s.window(1, 3, 4);
        assert_eq!(
            w.items("test").unwrap(),
            vec![DynamicValue::I64(2), DynamicValue::I64(0)]
        );
        w.write_at("test", 1, vec![DynamicValue::I64(7)]).unwrap();
        assert_eq!(
            s.with_len(3).items("test").unwrap(),
            vec![DynamicValue::I64(1), DynamicValue::I64(2), DynamicValue::I64(7)]
        );
    }

    #[test]
    fn test_map_data_keeps_insertion_order() {
        let mut m = MapData::default();
        m.insert(DynamicValue::String("b".into()), DynamicValue::I32(1));
        m.insert(DynamicValue::String("a".into()), DynamicValue::I32(2));
        m.insert(DynamicValue::String("b".into()), DynamicValue::I32(3));
        assert_eq!(m.len(), 2);
        assert_eq!(m.entries()[0].1, DynamicValue::I32(3));
        assert!(m.remove(&DynamicValue::String("a".into())));
        assert!(!m.remove(&DynamicValue::String("a".into())));
    }
}
