// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Kind-agnostic sequence and map helpers.
//!
//! These work the same on native and builder-made element types. Sequence
//! arguments may be passed behind one level of pointer.
//!
//! # Example
//!
//! ```rust
//! use refract::ops;
//! use refract::value::value_of;
//!
//! let s = value_of(vec![2i32, 3]);
//! let s = ops::prepend(&s, &[value_of(1i32)]).unwrap();
//! let s = ops::append(&s, &[value_of(vec![4i32, 5])]).unwrap();
//! assert_eq!(s.extract_as::<Vec<i32>>().unwrap(), vec![1, 2, 3, 4, 5]);
//! ```

use crate::error::{Error, Result};
use crate::kind::Kind;
use crate::types::Type;
use crate::value::{indirect, zero_value, DynamicValue, SliceRef, Value};

fn sequence(op: &'static str, seq: &Value) -> Result<Value> {
    let target = indirect(seq)?;
    if !target.is_valid() {
        return Err(Error::NilDereference { op });
    }
    match target.kind() {
        Kind::Slice => Ok(target),
        other => Err(Error::kind_mismatch(op, "slice", other)),
    }
}

/// Flatten `elems` one level into storage values of type `elem`. Every
/// element is checked before anything is built.
///
/// A slice argument is kept whole only when the element type is itself a
/// slice type; under an interface element type it is spread like any other.
fn flatten(op: &'static str, elem: &Type, elems: &[Value]) -> Result<Vec<DynamicValue>> {
    let mut out = Vec::with_capacity(elems.len());
    for e in elems {
        let ty = e.ty()?;
        let spread = ty.kind() == Kind::Slice && elem.kind() == Kind::Interface;
        if ty.assignable_to(elem) && !spread {
            out.push(e.coerce_to(elem, op)?);
            continue;
        }
        match ty.kind() {
            Kind::Pointer if ty.elem().is_ok_and(|t| t.assignable_to(elem)) => {
                out.push(e.elem()?.coerce_to(elem, op)?);
            }
            Kind::Slice => {
                for i in 0..e.len()? {
                    out.push(e.index(i)?.coerce_to(elem, op)?);
                }
            }
            _ => return Err(Error::incompatible(op, elem, &ty)),
        }
    }
    Ok(out)
}

fn contents(op: &'static str, s: &Value) -> Result<Vec<DynamicValue>> {
    (0..s.len()?)
        .map(|i| s.index(i)?.extract())
        .collect::<Result<Vec<_>>>()
        .map_err(|e| match e {
            Error::Unexported { .. } => Error::Unexported { op },
            other => other,
        })
}

fn rebuild(
    op: &'static str,
    seq: &Value,
    elems: &[Value],
    join: fn(Vec<DynamicValue>, Vec<DynamicValue>) -> Vec<DynamicValue>,
) -> Result<Value> {
    let s = sequence(op, seq)?;
    let ty = s.ty()?;
    let elem = ty.elem()?;
    let added = flatten(op, &elem, elems)?;
    let inserted = added.len();
    let items = join(contents(op, &s)?, added);
    let cap = s.cap()? + inserted;
    log::trace!(
        "[ops] {}: {} + {} elements into {} (cap {})",
        op,
        items.len() - inserted,
        inserted,
        ty,
        cap
    );
    let slice = SliceRef::alloc(items, cap, &zero_value(&elem));
    Ok(Value::owned(DynamicValue::Slice(Some(slice)), ty))
}

/// New sequence holding the elements of `seq` followed by `elems`.
///
/// Slice arguments are flattened one level unless the element type is itself
/// a slice type; a pointer to the element type is dereferenced. The result has
/// length `len + n` and capacity `cap + n`.
pub fn append(seq: &Value, elems: &[Value]) -> Result<Value> {
    rebuild("append", seq, elems, |mut old, added| {
        old.extend(added);
        old
    })
}

/// Like [`append`], with the new elements placed first.
pub fn prepend(seq: &Value, elems: &[Value]) -> Result<Value> {
    rebuild("prepend", seq, elems, |old, mut added| {
        added.extend(old);
        added
    })
}

/// Element `index` of a sequence, aliasing its storage.
pub fn get_index(seq: &Value, index: usize) -> Result<Value> {
    sequence("get_index", seq)?.index(index)
}

/// Detached copy of element `index`, looking through one pointer level.
pub fn get_index_value(seq: &Value, index: usize) -> Result<Value> {
    detach("get_index_value", get_index(seq, index)?)
}

/// Assign element `index` of a sequence.
pub fn set_index(seq: &Value, index: usize, value: &Value) -> Result<()> {
    sequence("set_index", seq)?.index(index)?.set(value)
}

fn detach(op: &'static str, v: Value) -> Result<Value> {
    let v = if v.kind() == Kind::Pointer {
        indirect(&v)?
    } else {
        v
    };
    if !v.is_valid() {
        return Err(Error::NilDereference { op });
    }
    Ok(Value::detached(v.extract()?, v.ty()?))
}

/// Length of a sequence, array, string, map or channel.
pub fn len(v: &Value) -> Result<usize> {
    v.len()
}

/// Capacity of a sequence, array or channel.
pub fn cap(v: &Value) -> Result<usize> {
    v.cap()
}

fn map(op: &'static str, m: &Value) -> Result<Value> {
    let target = indirect(m)?;
    if !target.is_valid() {
        return Err(Error::NilDereference { op });
    }
    match target.kind() {
        Kind::Map => Ok(target),
        other => Err(Error::kind_mismatch(op, "map", other)),
    }
}

/// Entry under `key`, if present.
pub fn get_map_index(m: &Value, key: &Value) -> Result<Option<Value>> {
    map("get_map_index", m)?.map_index(key)
}

/// Like [`get_map_index`], looking through one pointer level.
pub fn get_map_index_value(m: &Value, key: &Value) -> Result<Option<Value>> {
    const OP: &str = "get_map_index_value";
    map(OP, m)?
        .map_index(key)?
        .map(|v| detach(OP, v))
        .transpose()
}

/// Insert or replace the entry under `key`.
pub fn put_map_index(m: &Value, key: &Value, value: &Value) -> Result<()> {
    map("put_map_index", m)?.set_map_index(key, value)
}

/// Call `f` with each index and element in order; stops at the first error.
pub fn range_over_slice(seq: &Value, mut f: impl FnMut(usize, Value) -> Result<()>) -> Result<()> {
    for i in 0..seq.len()? {
        f(i, seq.index(i)?)?;
    }
    Ok(())
}

/// Like [`range_over_slice`], last element first.
pub fn range_over_slice_reverse(
    seq: &Value,
    mut f: impl FnMut(usize, Value) -> Result<()>,
) -> Result<()> {
    for i in (0..seq.len()?).rev() {
        f(i, seq.index(i)?)?;
    }
    Ok(())
}

/// Call `f` with a running count, key and element of each entry in
/// insertion order.
pub fn range_over_map(
    m: &Value,
    mut f: impl FnMut(usize, Value, Value) -> Result<()>,
) -> Result<()> {
    for (i, (k, v)) in map("range_over_map", m)?.map_range()?.into_iter().enumerate() {
        f(i, k, v)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use crate::value::{new, value_of};
    use std::collections::BTreeMap;

    fn ints(v: &Value) -> Vec<i32> {
        v.extract_as::<Vec<i32>>().unwrap()
    }

    #[test]
    fn test_append_flattens_and_grows_cap() {
        let s = value_of(vec![1i32, 2]);
        let out = append(&s, &[value_of(3i32), value_of(vec![4i32, 5]), value_of(6i32)]).unwrap();
        assert_eq!(ints(&out), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(out.cap().unwrap(), s.cap().unwrap() + 4);
        assert!(out.can_set());
        // the source is untouched
        assert_eq!(ints(&s), vec![1, 2]);
    }

    #[test]
    fn test_append_nothing_is_identity() {
        let s = value_of(vec![7i32, 8]);
        let out = append(&s, &[]).unwrap();
        assert_eq!(ints(&out), ints(&s));
        assert_eq!(out.len().unwrap(), 2);
    }

    #[test]
    fn test_prepend_keeps_argument_order() {
        let s = value_of(vec![3i32]);
        let out = prepend(&s, &[value_of(vec![1i32]), value_of(2i32)]).unwrap();
        assert_eq!(ints(&out), vec![1, 2, 3]);
    }

    #[test]
    fn test_nested_slices_are_elements() {
        let s = value_of(vec![vec![1i32]]);
        let out = append(&s, &[value_of(vec![2i32, 3])]).unwrap();
        assert_eq!(
            out.extract_as::<Vec<Vec<i32>>>().unwrap(),
            vec![vec![1], vec![2, 3]]
        );
    }

    #[test]
    fn test_interface_elements_spread_slices() {
        let s = crate::value::make_slice(&Type::slice_of(&Type::any()), 0, 0).unwrap();
        let out = append(&s, &[value_of(vec![1i32, 2])]).unwrap();
        assert_eq!(out.len().unwrap(), 2);
        assert_eq!(get_index(&out, 1).unwrap().extract_as::<i32>().unwrap(), 2);

        let out = prepend(&out, &[value_of(vec![7i32, 8]), value_of("x")]).unwrap();
        assert_eq!(out.len().unwrap(), 5);
        assert_eq!(get_index(&out, 0).unwrap().extract_as::<i32>().unwrap(), 7);
        assert_eq!(get_index(&out, 2).unwrap().extract_as::<String>().unwrap(), "x");
        assert_eq!(get_index(&out, 4).unwrap().extract_as::<i32>().unwrap(), 2);
    }

    #[test]
    fn test_pointer_arguments() {
        let target = new(&Type::of::<Vec<i32>>());
        target.elem().unwrap().set(&value_of(vec![1i32])).unwrap();
        let boxed = new(&Type::of::<i32>());
        boxed.elem().unwrap().set_int(9).unwrap();

        let out = append(&target, &[boxed]).unwrap();
        assert_eq!(ints(&out), vec![1, 9]);
    }

    #[test]
    fn test_append_validates_before_building() {
        let s = value_of(vec![1i32]);
        let err = append(&s, &[value_of(2i32), value_of("x")]).unwrap_err();
        assert_eq!(err.class(), ErrorClass::TypeIncompatible);
        let err = append(&s, &[value_of(vec![1u8])]).unwrap_err();
        assert_eq!(err.class(), ErrorClass::TypeIncompatible);

        let err = append(&value_of(5i32), &[]).unwrap_err();
        assert_eq!(err.to_string(), "append: expected slice, got i32");
        assert_eq!(err.class(), ErrorClass::KindMismatch);
    }

    #[test]
    fn test_index_helpers() {
        let s = append(&value_of(Vec::<i32>::new()), &[value_of(vec![1i32, 2, 3])]).unwrap();
        set_index(&s, 1, &value_of(20i32)).unwrap();
        assert_eq!(get_index_value(&s, 1).unwrap().as_int().unwrap(), 20);

        let alias = get_index(&s, 2).unwrap();
        alias.set_int(30).unwrap();
        assert_eq!(ints(&s), vec![1, 20, 30]);

        let copy = get_index_value(&s, 0).unwrap();
        assert!(!copy.can_set());

        let err = set_index(&s, 3, &value_of(0i32)).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { index: 3, len: 3, .. }));
        let err = set_index(&s, 0, &value_of(0u8)).unwrap_err();
        assert_eq!(err.class(), ErrorClass::TypeIncompatible);
        let err = set_index(&value_of(vec![1i32]), 0, &value_of(2i32)).unwrap_err();
        assert_eq!(err.class(), ErrorClass::NotAddressable);
    }

    #[test]
    fn test_index_value_dereferences_pointers() {
        let elem = Type::pointer_to(&Type::of::<String>());
        let s = crate::value::make_slice(&Type::slice_of(&elem), 0, 0).unwrap();
        let p = new(&Type::of::<String>());
        p.elem().unwrap().set_string("x").unwrap();
        let s = append(&s, &[p.clone()]).unwrap();

        let v = get_index_value(&s, 0).unwrap();
        assert_eq!(v.kind(), Kind::String);
        p.elem().unwrap().set_string("y").unwrap();
        assert_eq!(v.as_string().unwrap(), "x");
        assert_eq!(
            get_index(&s, 0).unwrap().elem().unwrap().as_string().unwrap(),
            "y"
        );
    }

    #[test]
    fn test_map_helpers() {
        let m = crate::value::make_map(&Type::of::<BTreeMap<String, i64>>()).unwrap();

        put_map_index(&m, &value_of("a"), &value_of(1i64)).unwrap();
        put_map_index(&m, &value_of("b"), &value_of(2i64)).unwrap();
        assert_eq!(
            get_map_index(&m, &value_of("b")).unwrap().unwrap().as_int().unwrap(),
            2
        );
        assert!(get_map_index_value(&m, &value_of("z")).unwrap().is_none());

        let mut seen = Vec::new();
        range_over_map(&m, |i, k, v| {
            seen.push((i, k.as_string()?, v.as_int()?));
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec![(0, "a".to_string(), 1), (1, "b".to_string(), 2)]);

        let err = put_map_index(&m, &value_of(1i32), &value_of(1i64)).unwrap_err();
        assert_eq!(err.class(), ErrorClass::TypeIncompatible);
        let err = get_map_index(&value_of(1i32), &value_of(1i32)).unwrap_err();
        assert_eq!(err.class(), ErrorClass::KindMismatch);
    }

    #[test]
    fn test_range_order_and_early_stop() {
        let s = value_of(vec![1i32, 2, 3]);
        let mut forward = Vec::new();
        range_over_slice(&s, |i, v| {
            forward.push((i, v.as_int()?));
            Ok(())
        })
        .unwrap();
        assert_eq!(forward, vec![(0, 1), (1, 2), (2, 3)]);

        let mut backward = Vec::new();
        range_over_slice_reverse(&s, |i, _| {
            backward.push(i);
            Ok(())
        })
        .unwrap();
        assert_eq!(backward, vec![2, 1, 0]);

        let mut calls = 0;
        let err = range_over_slice(&s, |_, v| {
            calls += 1;
            v.as_string().map(drop)
        })
        .unwrap_err();
        assert_eq!(calls, 1);
        assert_eq!(err.class(), ErrorClass::KindMismatch);
    }

    #[test]
    fn test_len_and_cap() {
        assert_eq!(len(&value_of("hello")).unwrap(), 5);
        assert_eq!(len(&value_of([1u8, 2, 3])).unwrap(), 3);
        assert_eq!(cap(&value_of([1u8, 2, 3])).unwrap(), 3);
        let err = cap(&value_of("hello")).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Unsupported);
    }
}
