// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Slice, map and channel operations.

use super::data::{ChanData, MapData};
use super::{borrow, borrow_mut, zero_value, DynamicValue, Place, SliceRef, Value};
use crate::error::{Error, Result};
use crate::kind::Kind;
use crate::types::{ChanDir, Type};
use std::cell::RefCell;
use std::rc::Rc;

fn grown_cap(old_cap: usize, needed: usize) -> usize {
    needed.max(old_cap.saturating_mul(2))
}

/// Extend a slice by `items`, writing in place when capacity allows.
fn extend(
    current: Option<SliceRef>,
    items: Vec<DynamicValue>,
    elem: &Type,
    op: &'static str,
) -> Result<Option<SliceRef>> {
    if items.is_empty() {
        return Ok(current);
    }
    match current {
        Some(s) if s.cap() - s.len() >= items.len() => {
            let out = s.with_len(s.len() + items.len());
            out.write_at(op, s.len(), items)?;
            Ok(Some(out))
        }
        current => {
            let (mut all, old_cap) = match &current {
                Some(s) => (s.items(op)?, s.cap()),
                None => (Vec::new(), 0),
            };
            all.extend(items);
            let cap = grown_cap(old_cap, all.len());
            log::trace!("[value] {}: reallocating slice to cap {}", op, cap);
            Ok(Some(SliceRef::alloc(all, cap, &zero_value(elem))))
        }
    }
}

impl Value {
    /// Copy of the entry under `key`, or `None` if absent (or the map is nil).
    pub fn map_index(&self, key: &Value) -> Result<Option<Value>> {
        const OP: &str = "Value::map_index";
        let inner = self.guard(OP, "map", |k| k == Kind::Map)?;
        let k = key.coerce_to(&inner.ty.key()?, OP)?;
        let elem_ty = inner.ty.elem()?;
        let Some(map) = inner.map(OP)? else {
            return Ok(None);
        };
        let found = borrow(&map, OP)?.get(&k).cloned();
        Ok(found.map(|v| Value::detached(v, elem_ty).with_read_only(inner.flags.read_only)))
    }

    /// Insert or replace an entry. An invalid `elem` deletes the key.
    ///
    /// Like every write, this requires a settable handle.
    pub fn set_map_index(&self, key: &Value, elem: &Value) -> Result<()> {
        const OP: &str = "Value::set_map_index";
        let inner = self.guard(OP, "map", |k| k == Kind::Map)?;
        Self::ensure_settable(inner, OP)?;
        let k = key.coerce_to(&inner.ty.key()?, OP)?;
        let map = inner.map(OP)?;
        if !elem.is_valid() {
            if let Some(map) = map {
                borrow_mut(&map, OP)?.remove(&k);
            }
            return Ok(());
        }
        let v = elem.coerce_to(&inner.ty.elem()?, OP)?;
        let map = map.ok_or(Error::NilDereference { op: OP })?;
        borrow_mut(&map, OP)?.insert(k, v);
        Ok(())
    }

    /// Remove `key`; returns whether an entry was present.
    pub fn delete_map_index(&self, key: &Value) -> Result<bool> {
        const OP: &str = "Value::delete_map_index";
        let inner = self.guard(OP, "map", |k| k == Kind::Map)?;
        Self::ensure_settable(inner, OP)?;
        let k = key.coerce_to(&inner.ty.key()?, OP)?;
        match inner.map(OP)? {
            Some(map) => Ok(borrow_mut(&map, OP)?.remove(&k)),
            None => Ok(false),
        }
    }

    /// Keys in insertion order.
    pub fn map_keys(&self) -> Result<Vec<Value>> {
        Ok(self
            .map_range()?
            .into_iter()
            .map(|(k, _)| k)
            .collect())
    }

    /// Snapshot of all entries in insertion order.
    pub fn map_range(&self) -> Result<Vec<(Value, Value)>> {
        const OP: &str = "Value::map_range";
        let inner = self.guard(OP, "map", |k| k == Kind::Map)?;
        let (key_ty, elem_ty) = (inner.ty.key()?, inner.ty.elem()?);
        let Some(map) = inner.map(OP)? else {
            return Ok(Vec::new());
        };
        let entries = borrow(&map, OP)?.entries().to_vec();
        let ro = inner.flags.read_only;
        Ok(entries
            .into_iter()
            .map(|(k, v)| {
                (
                    Value::detached(k, key_ty.clone()).with_read_only(ro),
                    Value::detached(v, elem_ty.clone()).with_read_only(ro),
                )
            })
            .collect())
    }

    pub fn set_len(&self, n: usize) -> Result<()> {
        const OP: &str = "Value::set_len";
        let inner = self.guard(OP, "slice", |k| k == Kind::Slice)?;
        Self::ensure_settable(inner, OP)?;
        match inner.slice(OP)? {
            Some(s) if n <= s.cap() => inner.place.store(OP, DynamicValue::Slice(Some(s.with_len(n)))),
            None if n == 0 => Ok(()),
            s => Err(Error::OutOfRange {
                op: OP,
                index: n,
                len: s.map_or(0, |s| s.cap()),
            }),
        }
    }

    /// Shrink capacity; `n` must lie in `[len, cap]`.
    pub fn set_cap(&self, n: usize) -> Result<()> {
        const OP: &str = "Value::set_cap";
        let inner = self.guard(OP, "slice", |k| k == Kind::Slice)?;
        Self::ensure_settable(inner, OP)?;
        match inner.slice(OP)? {
            Some(s) if n >= s.len() && n <= s.cap() => {
                inner.place.store(OP, DynamicValue::Slice(Some(s.with_cap(n))))
            }
            None if n == 0 => Ok(()),
            s => Err(Error::OutOfRange {
                op: OP,
                index: n,
                len: s.map_or(0, |s| s.cap()),
            }),
        }
    }

    /// Ensure room for `n` more elements without changing the length.
    pub fn grow(&self, n: usize) -> Result<()> {
        const OP: &str = "Value::grow";
        let inner = self.guard(OP, "slice", |k| k == Kind::Slice)?;
        Self::ensure_settable(inner, OP)?;
        let zero = zero_value(&inner.ty.elem()?);
        let grown = match inner.slice(OP)? {
            Some(s) if s.cap() - s.len() >= n => return Ok(()),
            Some(s) => SliceRef::alloc(s.items(OP)?, grown_cap(s.cap(), s.len() + n), &zero),
            None => SliceRef::alloc(Vec::new(), n, &zero),
        };
        inner.place.store(OP, DynamicValue::Slice(Some(grown)))
    }

    /// Remove all map entries, or zero every slice element.
    pub fn clear(&self) -> Result<()> {
        const OP: &str = "Value::clear";
        let inner = self.guard(OP, "map or slice", |k| matches!(k, Kind::Map | Kind::Slice))?;
        Self::ensure_settable(inner, OP)?;
        if inner.ty.kind() == Kind::Map {
            if let Some(map) = inner.map(OP)? {
                borrow_mut(&map, OP)?.clear();
            }
            return Ok(());
        }
        if let Some(s) = inner.slice(OP)? {
            let zero = zero_value(&inner.ty.elem()?);
            s.write_at(OP, 0, vec![zero; s.len()])?;
        }
        Ok(())
    }

    /// `v[low..high]` of a slice, addressable array or string.
    ///
    /// Slices share storage with the source and are addressable iff it is.
    pub fn slice(&self, low: usize, high: usize) -> Result<Value> {
        const OP: &str = "Value::slice";
        let inner = self.guard(OP, "slice, array or string", |k| {
            matches!(k, Kind::Slice | Kind::Array | Kind::String)
        })?;
        if inner.ty.kind() == Kind::String {
            let (sub, len) = inner.place.read(OP, |v| {
                let s = v.as_str().ok_or(Error::InvalidValue { op: OP })?;
                Ok((s.get(low..high).map(str::to_owned), s.len()))
            })?;
            let sub = sub.ok_or(Error::OutOfRange {
                op: OP,
                index: high.max(low),
                len,
            })?;
            return Ok(Value::detached(DynamicValue::String(sub), inner.ty.clone())
                .with_read_only(inner.flags.read_only));
        }
        let cap = self.cap()?;
        self.slice3_inner(OP, low, high, cap)
    }

    /// `v[low..high]` with capacity limited to `max - low`.
    pub fn slice3(&self, low: usize, high: usize, max: usize) -> Result<Value> {
        const OP: &str = "Value::slice3";
        self.guard(OP, "slice or array", |k| matches!(k, Kind::Slice | Kind::Array))?;
        self.slice3_inner(OP, low, high, max)
    }

    fn slice3_inner(&self, op: &'static str, low: usize, high: usize, max: usize) -> Result<Value> {
        let inner = self.inner(op)?;
        let cap = self.cap()?;
        if max > cap {
            return Err(Error::OutOfRange { op, index: max, len: cap });
        }
        if high > max {
            return Err(Error::OutOfRange { op, index: high, len: max });
        }
        if low > high {
            return Err(Error::OutOfRange { op, index: low, len: high });
        }
        let (window, ty) = if inner.ty.kind() == Kind::Array {
            if !inner.flags.addressable {
                return Err(Error::NotAddressable { op });
            }
            let whole = SliceRef::over(inner.place.clone(), 0, cap, cap);
            (Some(whole.window(low, high, max)), Type::slice_of(&inner.ty.elem()?))
        } else {
            let window = inner.slice(op)?.map(|s| s.window(low, high, max));
            (window, inner.ty.clone())
        };
        Ok(inner.derive(Place::detached(DynamicValue::Slice(window)), ty, false))
    }

    fn chan_for(&self, op: &'static str, needs: fn(ChanDir) -> bool) -> Result<Option<super::ChanRef>> {
        let inner = self.guard(op, "chan", |k| k == Kind::Chan)?;
        let dir = inner.ty.chan_dir()?;
        if !needs(dir) {
            return Err(Error::incompatible(op, "channel direction allowing this operation", &inner.ty));
        }
        inner.chan(op)
    }

    /// Buffer `x`. A full or nil channel reports `WouldBlock`.
    pub fn send(&self, x: &Value) -> Result<()> {
        const OP: &str = "Value::send";
        if !self.try_send(x)? {
            return Err(Error::WouldBlock { op: OP });
        }
        Ok(())
    }

    /// Buffer `x` if there is room; `Ok(false)` otherwise.
    pub fn try_send(&self, x: &Value) -> Result<bool> {
        const OP: &str = "Value::try_send";
        let chan = self.chan_for(OP, ChanDir::can_send)?;
        let inner = self.inner(OP)?;
        Self::ensure_settable(inner, OP)?;
        let item = x.coerce_to(&inner.ty.elem()?, OP)?;
        let Some(chan) = chan else {
            return Ok(false);
        };
        let mut chan = borrow_mut(&chan, OP)?;
        if chan.closed {
            return Err(Error::Closed { op: OP });
        }
        if chan.buf.len() >= chan.cap {
            return Ok(false);
        }
        chan.buf.push_back(item);
        Ok(true)
    }

    /// Next buffered value. On a closed, drained channel returns the zero
    /// value and `false`; an empty open channel reports `WouldBlock`.
    pub fn recv(&self) -> Result<(Value, bool)> {
        const OP: &str = "Value::recv";
        let (v, ok) = self.try_recv()?;
        if !v.is_valid() {
            return Err(Error::WouldBlock { op: OP });
        }
        Ok((v, ok))
    }

    /// Like `recv`, but an empty open (or nil) channel yields the invalid
    /// handle and `false`.
    pub fn try_recv(&self) -> Result<(Value, bool)> {
        const OP: &str = "Value::try_recv";
        let chan = self.chan_for(OP, ChanDir::can_recv)?;
        let elem_ty = self.inner(OP)?.ty.elem()?;
        let Some(chan) = chan else {
            return Ok((Value::invalid(), false));
        };
        let mut chan = borrow_mut(&chan, OP)?;
        match chan.buf.pop_front() {
            Some(item) => Ok((Value::detached(item, elem_ty), true)),
            None if chan.closed => Ok((Value::detached(zero_value(&elem_ty), elem_ty), false)),
            None => Ok((Value::invalid(), false)),
        }
    }

    pub fn close(&self) -> Result<()> {
        const OP: &str = "Value::close";
        let chan = self.chan_for(OP, ChanDir::can_send)?;
        Self::ensure_settable(self.inner(OP)?, OP)?;
        let chan = chan.ok_or(Error::NilDereference { op: OP })?;
        let mut chan = borrow_mut(&chan, OP)?;
        if chan.closed {
            return Err(Error::Closed { op: OP });
        }
        chan.closed = true;
        Ok(())
    }
}

/// New addressable slice of type `ty` with `len` zero elements.
pub fn make_slice(ty: &Type, len: usize, cap: usize) -> Result<Value> {
    const OP: &str = "make_slice";
    if ty.kind() != Kind::Slice {
        return Err(Error::kind_mismatch(OP, "slice type", ty.kind()));
    }
    if len > cap {
        return Err(Error::OutOfRange {
            op: OP,
            index: len,
            len: cap,
        });
    }
    let zero = zero_value(&ty.elem()?);
    let slice = SliceRef::alloc(vec![zero.clone(); len], cap, &zero);
    Ok(Value::owned(DynamicValue::Slice(Some(slice)), ty.clone()))
}

/// New empty, addressable map of type `ty`.
pub fn make_map(ty: &Type) -> Result<Value> {
    make_map_with_size(ty, 0)
}

pub fn make_map_with_size(ty: &Type, n: usize) -> Result<Value> {
    if ty.kind() != Kind::Map {
        return Err(Error::kind_mismatch("make_map", "map type", ty.kind()));
    }
    let data = MapData::from_entries(Vec::with_capacity(n));
    Ok(Value::owned(
        DynamicValue::Map(Some(Rc::new(RefCell::new(data)))),
        ty.clone(),
    ))
}

/// New bidirectional channel buffering up to `buffer` values.
pub fn make_chan(ty: &Type, buffer: usize) -> Result<Value> {
    const OP: &str = "make_chan";
    if ty.kind() != Kind::Chan {
        return Err(Error::kind_mismatch(OP, "chan type", ty.kind()));
    }
    if ty.chan_dir()? != ChanDir::Both {
        return Err(Error::shape(format!("{}: {} is unidirectional", OP, ty)));
    }
    Ok(Value::owned(
        DynamicValue::Chan(Some(Rc::new(RefCell::new(ChanData::new(buffer))))),
        ty.clone(),
    ))
}

/// `append(s, xs...)`: writes into spare capacity when there is enough,
/// otherwise copies into a larger backing array.
pub fn append_values(s: &Value, xs: &[Value]) -> Result<Value> {
    const OP: &str = "append_values";
    let inner = s.guard(OP, "slice", |k| k == Kind::Slice)?;
    let elem = inner.ty.elem()?;
    let items = xs
        .iter()
        .map(|x| x.coerce_to(&elem, OP))
        .collect::<Result<Vec<_>>>()?;
    let out = extend(inner.slice(OP)?, items, &elem, OP)?;
    Ok(Value::detached(DynamicValue::Slice(out), inner.ty.clone()))
}

/// `append(s, t...)` for two slices of the same element type.
pub fn append_slice(s: &Value, t: &Value) -> Result<Value> {
    const OP: &str = "append_slice";
    let inner = s.guard(OP, "slice", |k| k == Kind::Slice)?;
    let other = t.guard(OP, "slice", |k| k == Kind::Slice)?;
    let elem = inner.ty.elem()?;
    let other_elem = other.ty.elem()?;
    if elem != other_elem {
        return Err(Error::incompatible(OP, &elem, &other_elem));
    }
    if other.flags.read_only {
        return Err(Error::Unexported { op: OP });
    }
    let items = match other.slice(OP)? {
        Some(src) => src.items(OP)?,
        None => Vec::new(),
    };
    let out = extend(inner.slice(OP)?, items, &elem, OP)?;
    Ok(Value::detached(DynamicValue::Slice(out), inner.ty.clone()))
}

/// Copy `min(len(dst), len(src))` elements; returns the count. A string
/// source may be copied into a `[]u8`.
pub fn copy_values(dst: &Value, src: &Value) -> Result<usize> {
    const OP: &str = "copy_values";
    let to = dst.guard(OP, "slice or array", |k| matches!(k, Kind::Slice | Kind::Array))?;
    if to.flags.read_only {
        return Err(Error::Unexported { op: OP });
    }
    if to.ty.kind() == Kind::Array && !to.flags.addressable {
        return Err(Error::NotAddressable { op: OP });
    }
    let from = src.guard(OP, "slice, array or string", |k| {
        matches!(k, Kind::Slice | Kind::Array | Kind::String)
    })?;
    let elem = to.ty.elem()?;
    let items = match from.ty.kind() {
        Kind::String => {
            if elem.kind() != Kind::U8 {
                return Err(Error::incompatible(OP, &elem, "u8"));
            }
            from.place.read(OP, |v| {
                let s = v.as_str().ok_or(Error::InvalidValue { op: OP })?;
                Ok(s.bytes().map(DynamicValue::U8).collect::<Vec<_>>())
            })?
        }
        _ => {
            let from_elem = from.ty.elem()?;
            if from_elem != elem {
                return Err(Error::incompatible(OP, &elem, &from_elem));
            }
            match from.place.load(OP)? {
                DynamicValue::Slice(Some(s)) => s.items(OP)?,
                DynamicValue::Slice(None) => Vec::new(),
                DynamicValue::Array(items) => items,
                _ => return Err(Error::InvalidValue { op: OP }),
            }
        }
    };
    let n = items.len().min(dst.len()?);
    let items: Vec<_> = items.into_iter().take(n).collect();
    if to.ty.kind() == Kind::Array {
        let whole = SliceRef::over(to.place.clone(), 0, n, n);
        whole.write_at(OP, 0, items)?;
    } else if let Some(s) = to.slice(OP)? {
        s.write_at(OP, 0, items)?;
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use crate::value::{new, value_of};

    fn ints(v: &Value) -> Vec<i64> {
        v.extract_as::<Vec<i64>>().unwrap()
    }

    #[test]
    fn test_map_ops_check_types() {
        let m = make_map(&Type::map_of(&Type::of::<String>(), &Type::of::<i32>()).unwrap()).unwrap();
        m.set_map_index(&value_of("a"), &value_of(1i32)).unwrap();
        m.set_map_index(&value_of("b"), &value_of(2i32)).unwrap();

        let err = m.set_map_index(&value_of(1i32), &value_of(1i32)).unwrap_err();
        assert_eq!(err.class(), ErrorClass::TypeIncompatible);
        let err = m.set_map_index(&value_of("c"), &value_of("x")).unwrap_err();
        assert_eq!(err.class(), ErrorClass::TypeIncompatible);

        assert_eq!(m.len().unwrap(), 2);
        let a = m.map_index(&value_of("a")).unwrap().unwrap();
        assert_eq!(a.as_int().unwrap(), 1);
        assert!(!a.can_set());
        assert!(m.map_index(&value_of("z")).unwrap().is_none());

        let keys: Vec<String> = m
            .map_keys()
            .unwrap()
            .iter()
            .map(|k| k.as_string().unwrap())
            .collect();
        assert_eq!(keys, vec!["a", "b"]);

        assert!(m.delete_map_index(&value_of("a")).unwrap());
        m.set_map_index(&value_of("b"), &Value::invalid()).unwrap();
        assert_eq!(m.len().unwrap(), 0);
    }

    #[test]
    fn test_nil_map_rejects_insert() {
        let ty = Type::map_of(&Type::of::<i32>(), &Type::of::<i32>()).unwrap();
        let nil = new(&ty).elem().unwrap();
        assert!(nil.map_index(&value_of(1i32)).unwrap().is_none());
        assert!(matches!(
            nil.set_map_index(&value_of(1i32), &value_of(1i32)),
            Err(Error::NilDereference { .. })
        ));
    }

    #[test]
    fn test_container_writes_need_settable_handle() {
        let mut native = std::collections::BTreeMap::new();
        native.insert("a".to_string(), 1i32);
        let m = value_of(native);
        assert!(!m.can_set());
        assert!(matches!(
            m.set_map_index(&value_of("b"), &value_of(2i32)),
            Err(Error::NotAddressable { .. })
        ));
        assert!(matches!(
            m.delete_map_index(&value_of("a")),
            Err(Error::NotAddressable { .. })
        ));
        assert!(matches!(m.clear(), Err(Error::NotAddressable { .. })));
        assert_eq!(m.len().unwrap(), 1);

        let ty = Type::chan_of(ChanDir::Both, &Type::of::<i32>());
        let ch = make_chan(&ty, 1).unwrap();
        let copy = Value::detached(ch.extract().unwrap(), ty.clone());
        assert_eq!(copy.send(&value_of(1i32)).unwrap_err().class(), ErrorClass::NotAddressable);
        assert_eq!(copy.close().unwrap_err().class(), ErrorClass::NotAddressable);
        assert_eq!(ch.len().unwrap(), 0);
    }

    #[test]
    fn test_append_values_aliases_spare_capacity() {
        let s = make_slice(&Type::of::<Vec<i64>>(), 1, 4).unwrap();
        let a = append_values(&s, &[value_of(7i64)]).unwrap();
        let b = append_values(&s, &[value_of(8i64)]).unwrap();
        // Both appends wrote into the same spare slot.
        assert_eq!(ints(&a), vec![0, 8]);
        assert_eq!(ints(&b), vec![0, 8]);

        let full = value_of(vec![1i64, 2]);
        let grown = append_values(&full, &[value_of(3i64)]).unwrap();
        assert_eq!(ints(&grown), vec![1, 2, 3]);
        assert_eq!(grown.cap().unwrap(), 4);
        assert_eq!(ints(&full), vec![1, 2]);
    }

    #[test]
    fn test_append_slice_and_copy() {
        let s = value_of(vec![1i64]);
        let t = value_of(vec![2i64, 3]);
        let joined = append_slice(&s, &t).unwrap();
        assert_eq!(ints(&joined), vec![1, 2, 3]);
        assert!(append_slice(&s, &value_of(vec![1u8])).is_err());

        let dst = make_slice(&Type::of::<Vec<i64>>(), 2, 2).unwrap();
        assert_eq!(copy_values(&dst, &joined).unwrap(), 2);
        assert_eq!(ints(&dst), vec![1, 2]);

        let bytes = make_slice(&Type::of::<Vec<u8>>(), 3, 3).unwrap();
        assert_eq!(copy_values(&bytes, &value_of("hello")).unwrap(), 3);
        assert_eq!(bytes.as_bytes().unwrap(), b"hel".to_vec());
    }

    #[test]
    fn test_slicing() {
        let s = make_slice(&Type::of::<Vec<i64>>(), 4, 6).unwrap();
        for i in 0..4 {
            s.index(i).unwrap().set_int(i as i64).unwrap();
        }
        let mid = s.slice(1, 3).unwrap();
        assert_eq!(ints(&mid), vec![1, 2]);
        assert_eq!(mid.cap().unwrap(), 5);
        mid.index(0).unwrap().set_int(10).unwrap();
        assert_eq!(ints(&s), vec![0, 10, 2, 3]);

        let tight = s.slice3(0, 2, 3).unwrap();
        assert_eq!(tight.cap().unwrap(), 3);
        assert!(matches!(s.slice(2, 9), Err(Error::OutOfRange { index: 9, .. })));
        assert!(matches!(s.slice(3, 2), Err(Error::OutOfRange { index: 3, .. })));

        assert_eq!(value_of("hello").slice(1, 3).unwrap().as_string().unwrap(), "el");
    }

    #[test]
    fn test_slice_of_array_requires_addressable() {
        let arr_ty = Type::array_of(&Type::of::<i32>(), 3);
        assert!(matches!(
            value_of([1i32, 2, 3]).slice(0, 2),
            Err(Error::NotAddressable { .. })
        ));
        let arr = new(&arr_ty).elem().unwrap();
        let view = arr.slice(1, 3).unwrap();
        view.index(0).unwrap().set_int(4).unwrap();
        assert_eq!(arr.index(1).unwrap().as_int().unwrap(), 4);
    }

    #[test]
    fn test_len_cap_mutation() {
        let slot = new(&Type::of::<Vec<i64>>()).elem().unwrap();
        slot.grow(3).unwrap();
        assert_eq!(slot.len().unwrap(), 0);
        assert_eq!(slot.cap().unwrap(), 3);
        slot.set_len(2).unwrap();
        assert_eq!(ints(&slot), vec![0, 0]);
        assert!(matches!(slot.set_len(4), Err(Error::OutOfRange { index: 4, len: 3, .. })));
        slot.set_cap(2).unwrap();
        assert!(slot.set_cap(1).is_err());

        slot.index(1).unwrap().set_int(5).unwrap();
        slot.clear().unwrap();
        assert_eq!(ints(&slot), vec![0, 0]);
    }

    #[test]
    fn test_channel_buffering() {
        let ty = Type::chan_of(ChanDir::Both, &Type::of::<i32>());
        let ch = make_chan(&ty, 1).unwrap();
        assert!(ch.try_send(&value_of(1i32)).unwrap());
        assert!(!ch.try_send(&value_of(2i32)).unwrap());
        assert!(matches!(ch.send(&value_of(2i32)), Err(Error::WouldBlock { .. })));
        assert_eq!(ch.len().unwrap(), 1);
        assert_eq!(ch.cap().unwrap(), 1);

        let (v, ok) = ch.recv().unwrap();
        assert!(ok);
        assert_eq!(v.as_int().unwrap(), 1);
        assert!(matches!(ch.recv(), Err(Error::WouldBlock { .. })));

        ch.close().unwrap();
        let (v, ok) = ch.try_recv().unwrap();
        assert!(!ok);
        assert_eq!(v.as_int().unwrap(), 0);
        assert!(matches!(ch.close(), Err(Error::Closed { .. })));
        assert!(matches!(ch.send(&value_of(3i32)), Err(Error::Closed { .. })));
    }

    #[test]
    fn test_channel_direction() {
        let recv_only = Type::chan_of(ChanDir::Recv, &Type::of::<i32>());
        assert!(make_chan(&recv_only, 1).is_err());
        let slot = new(&recv_only).elem().unwrap();
        assert_eq!(
            slot.send(&value_of(1i32)).unwrap_err().class(),
            ErrorClass::TypeIncompatible
        );
        let (v, ok) = slot.try_recv().unwrap();
        assert!(!v.is_valid());
        assert!(!ok);
    }
}
