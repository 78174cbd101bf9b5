// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON documents as refract values.
//!
//! [`to_value`] mirrors a generic decode: `null` is a nil `any`, numbers are
//! `f64`, arrays are `[]any` and objects are `map[string]any`.
//! [`to_struct`] instead builds a struct type from the shape of an object,
//! with field names normalized by the builder policy.

use crate::error::{DictError, Result};
use refract::builder::{self, new_field_with_type, new_struct_definition, new_type_instance};
use refract::value::{self, append_values, make_slice, value_of};
use refract::{ops, Type, Value};
use serde_json::Value as Json;

/// Generic refract value for `json`.
pub fn to_value(json: &Json) -> Result<Value> {
    match json {
        Json::Null => Ok(value::zero(&Type::any())),
        Json::Bool(b) => Ok(value_of(*b)),
        Json::Number(n) => n.as_f64().map(value_of).ok_or(DictError::TypeMismatch {
            key: n.to_string(),
            expected: "f64",
        }),
        Json::String(s) => Ok(value_of(s.as_str())),
        Json::Array(items) => {
            let seq = make_slice(&Type::slice_of(&Type::any()), 0, 0)?;
            let items = items.iter().map(to_value).collect::<Result<Vec<_>>>()?;
            // one element per item: nested arrays stay nested
            Ok(append_values(&seq, &items)?)
        }
        Json::Object(map) => {
            let m = builder::new_map_of_type_keyed(&Type::of::<String>(), &Type::any())?;
            for (k, v) in map {
                ops::put_map_index(&m, &value_of(k.as_str()), &to_value(v)?)?;
            }
            Ok(m)
        }
    }
}

/// Type a [`to_struct`] field gets for `json`.
fn shape_of(json: &Json) -> Result<Type> {
    Ok(match json {
        Json::Null => Type::any(),
        Json::Bool(_) => Type::of::<bool>(),
        Json::Number(_) => Type::of::<f64>(),
        Json::String(_) => Type::of::<String>(),
        Json::Array(_) => Type::slice_of(&Type::any()),
        Json::Object(map) => new_struct_definition(
            map.iter()
                .map(|(k, v)| Ok(new_field_with_type(k, &shape_of(v)?, "")))
                .collect::<Result<Vec<_>>>()?,
        )?,
    })
}

fn fill(target: &Value, json: &Json) -> Result<()> {
    match json {
        Json::Object(map) => {
            let naming = builder::default_naming();
            for (k, v) in map {
                fill(&target.field_by_name(&naming.normalize(k))?, v)?;
            }
            Ok(())
        }
        other => Ok(target.set(&to_value(other)?)?),
    }
}

/// Pointer to a new struct instance shaped after the JSON object `json`.
/// Nested objects become nested structs; an empty object is rejected.
pub fn to_struct(json: &Json) -> Result<Value> {
    if !json.is_object() {
        return Err(DictError::TypeMismatch {
            key: String::new(),
            expected: "object",
        });
    }
    let ty = shape_of(json)?;
    log::debug!("[dict] to_struct: built {}", ty);
    let instance = new_type_instance(&ty);
    fill(&instance.elem()?, json)?;
    Ok(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use refract::{ErrorClass, Kind};
    use serde_json::json;

    #[test]
    fn test_to_value_generic_shapes() {
        let v = to_value(&json!({"n": 1.5, "s": "x", "list": [1, "two", null], "none": null}))
            .unwrap();
        assert_eq!(v.kind(), Kind::Map);
        assert_eq!(ops::len(&v).unwrap(), 4);

        let n = ops::get_map_index(&v, &value_of("n")).unwrap().unwrap();
        assert_eq!(n.extract_as::<f64>().unwrap(), 1.5);

        let list = ops::get_map_index(&v, &value_of("list")).unwrap().unwrap().elem().unwrap();
        assert_eq!(list.ty().unwrap().to_string(), "[]interface {}");
        assert_eq!(ops::len(&list).unwrap(), 3);
        let two = ops::get_index(&list, 1).unwrap();
        assert_eq!(two.extract_as::<String>().unwrap(), "two");
        assert!(ops::get_index(&list, 2).unwrap().is_nil().unwrap());

        let none = ops::get_map_index(&v, &value_of("none")).unwrap().unwrap();
        assert!(none.is_nil().unwrap());
    }

    #[test]
    fn test_to_value_keeps_nested_arrays() {
        let v = to_value(&json!([[1, 2], [], 3])).unwrap();
        assert_eq!(ops::len(&v).unwrap(), 3);
        let first = ops::get_index(&v, 0).unwrap().elem().unwrap();
        assert_eq!(first.kind(), Kind::Slice);
        assert_eq!(ops::len(&first).unwrap(), 2);
        let empty = ops::get_index(&v, 1).unwrap().elem().unwrap();
        assert_eq!(ops::len(&empty).unwrap(), 0);
        assert_eq!(ops::get_index(&v, 2).unwrap().extract_as::<f64>().unwrap(), 3.0);
    }

    #[test]
    fn test_to_struct() {
        let p = to_struct(&json!({"name": "Ada", "age": 36, "address": {"city": "London"}}))
            .unwrap();
        assert!(builder::is_struct(&p));
        assert_eq!(
            builder::get_struct_field_value::<String>(&p, "Name").unwrap(),
            "Ada"
        );
        assert_eq!(builder::get_struct_field_value::<f64>(&p, "Age").unwrap(), 36.0);

        let address = builder::get_struct_field_value_any(&p, "Address").unwrap();
        assert_eq!(
            builder::get_struct_field_value::<String>(&address, "City").unwrap(),
            "London"
        );
    }

    #[test]
    fn test_to_struct_rejects_bad_shapes() {
        assert!(matches!(
            to_struct(&json!([1, 2])),
            Err(DictError::TypeMismatch { .. })
        ));
        let err = to_struct(&json!({"inner": {}})).unwrap_err();
        assert!(matches!(err, DictError::Value(ref e) if e.class() == ErrorClass::ShapeInvalid));
        let err = to_struct(&json!({"a b": 1, "ab": 2})).unwrap_err();
        assert!(matches!(err, DictError::Value(ref e) if e.class() == ErrorClass::ShapeInvalid));
    }
}
