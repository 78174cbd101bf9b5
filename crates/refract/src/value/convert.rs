// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversions between native Rust values and dynamic values.

use super::data::MapData;
use super::{borrow, DynamicValue, SliceRef, Value};
use crate::types::{PrimitiveKind, Type};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Native types with a runtime type and a dynamic representation.
pub trait Reflect {
    fn reflect_type() -> Type;
    fn into_dynamic(self) -> DynamicValue;
}

/// Native types that can be rebuilt from their dynamic representation.
pub trait FromReflect: Reflect + Sized {
    fn from_dynamic(value: &DynamicValue) -> Option<Self>;
}

/// Reflectable types whose runtime type is comparable (usable as map keys).
pub trait ReflectKey: Reflect {}

/// Handle over a copy of `v`. Not addressable.
pub fn value_of<T: Reflect>(v: T) -> Value {
    Value::detached(v.into_dynamic(), T::reflect_type())
}

macro_rules! impl_reflect_primitive {
    ($ty:ty, $variant:ident) => {
        impl Reflect for $ty {
            fn reflect_type() -> Type {
                Type::primitive(PrimitiveKind::$variant)
            }

            fn into_dynamic(self) -> DynamicValue {
                DynamicValue::$variant(self)
            }
        }

        impl FromReflect for $ty {
            fn from_dynamic(value: &DynamicValue) -> Option<Self> {
                match value {
                    DynamicValue::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }

        impl ReflectKey for $ty {}
    };
}

impl_reflect_primitive!(bool, Bool);
impl_reflect_primitive!(isize, Isize);
impl_reflect_primitive!(i8, I8);
impl_reflect_primitive!(i16, I16);
impl_reflect_primitive!(i32, I32);
impl_reflect_primitive!(i64, I64);
impl_reflect_primitive!(usize, Usize);
impl_reflect_primitive!(u8, U8);
impl_reflect_primitive!(u16, U16);
impl_reflect_primitive!(u32, U32);
impl_reflect_primitive!(u64, U64);
impl_reflect_primitive!(f32, F32);
impl_reflect_primitive!(f64, F64);

impl Reflect for String {
    fn reflect_type() -> Type {
        Type::primitive(PrimitiveKind::String)
    }

    fn into_dynamic(self) -> DynamicValue {
        DynamicValue::String(self)
    }
}

impl FromReflect for String {
    fn from_dynamic(value: &DynamicValue) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl ReflectKey for String {}

impl Reflect for &str {
    fn reflect_type() -> Type {
        Type::primitive(PrimitiveKind::String)
    }

    fn into_dynamic(self) -> DynamicValue {
        DynamicValue::String(self.to_string())
    }
}

impl ReflectKey for &str {}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect_type() -> Type {
        Type::slice_of(&T::reflect_type())
    }

    fn into_dynamic(self) -> DynamicValue {
        let items = self.into_iter().map(Reflect::into_dynamic).collect();
        DynamicValue::Slice(Some(SliceRef::from_vec(items)))
    }
}

impl<T: FromReflect> FromReflect for Vec<T> {
    fn from_dynamic(value: &DynamicValue) -> Option<Self> {
        match value {
            DynamicValue::Slice(None) => Some(Vec::new()),
            DynamicValue::Slice(Some(s)) => s
                .items("from_dynamic")
                .ok()?
                .iter()
                .map(T::from_dynamic)
                .collect(),
            _ => None,
        }
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect_type() -> Type {
        Type::array_of(&T::reflect_type(), N)
    }

    fn into_dynamic(self) -> DynamicValue {
        DynamicValue::Array(self.into_iter().map(Reflect::into_dynamic).collect())
    }
}

impl<T: FromReflect, const N: usize> FromReflect for [T; N] {
    fn from_dynamic(value: &DynamicValue) -> Option<Self> {
        match value {
            DynamicValue::Array(items) if items.len() == N => {
                let items: Vec<T> = items.iter().map(T::from_dynamic).collect::<Option<_>>()?;
                items.try_into().ok()
            }
            _ => None,
        }
    }
}

impl<T: ReflectKey, const N: usize> ReflectKey for [T; N] {}

impl<K: ReflectKey + Ord, V: Reflect> Reflect for BTreeMap<K, V> {
    fn reflect_type() -> Type {
        Type::map_unchecked(K::reflect_type(), V::reflect_type())
    }

    fn into_dynamic(self) -> DynamicValue {
        let entries = self
            .into_iter()
            .map(|(k, v)| (k.into_dynamic(), v.into_dynamic()))
            .collect();
        DynamicValue::Map(Some(Rc::new(RefCell::new(MapData::from_entries(entries)))))
    }
}

impl<K: ReflectKey + FromReflect + Ord, V: FromReflect> FromReflect for BTreeMap<K, V> {
    fn from_dynamic(value: &DynamicValue) -> Option<Self> {
        match value {
            DynamicValue::Map(None) => Some(BTreeMap::new()),
            DynamicValue::Map(Some(m)) => borrow(m, "from_dynamic")
                .ok()?
                .entries()
                .iter()
                .map(|(k, v)| Some((K::from_dynamic(k)?, V::from_dynamic(v)?)))
                .collect(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::Kind;

    #[test]
    fn test_primitive_types() {
        assert_eq!(Type::of::<u32>().kind(), Kind::U32);
        assert_eq!(Type::of::<&str>(), Type::of::<String>());
        assert_eq!(i16::from_dynamic(&DynamicValue::I16(-4)), Some(-4));
        assert_eq!(i16::from_dynamic(&DynamicValue::I32(-4)), None);
    }

    #[test]
    fn test_nested_collections() {
        let v = value_of(vec![vec![1u8, 2], vec![3]]);
        assert_eq!(v.ty().unwrap().to_string(), "[][]u8");
        assert_eq!(
            v.extract_as::<Vec<Vec<u8>>>().unwrap(),
            vec![vec![1, 2], vec![3]]
        );

        let mut m = BTreeMap::new();
        m.insert("k".to_string(), [1.5f64, 2.5]);
        let v = value_of(m.clone());
        assert_eq!(v.ty().unwrap().to_string(), "map[string][2]f64");
        assert_eq!(v.len().unwrap(), 1);
        assert_eq!(v.extract_as::<BTreeMap<String, [f64; 2]>>().unwrap(), m);
    }

    #[test]
    fn test_extract_as_checks_type() {
        let v = value_of(5u8);
        assert!(v.extract_as::<u16>().is_err());
        assert_eq!(v.extract_as::<u8>().unwrap(), 5);
    }

    #[test]
    fn test_named_type_extracts_as_underlying() {
        let celsius = Type::named("Celsius", &Type::of::<f64>()).unwrap();
        let slot = crate::value::new(&celsius).elem().unwrap();
        slot.set_float(21.5).unwrap();
        assert_eq!(slot.extract_as::<f64>().unwrap(), 21.5);
    }
}
