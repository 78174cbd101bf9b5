// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decode a single top-level key out of a JSON object.

use crate::error::{DictError, Result};
use crate::reflect::to_value;
use refract::Value;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as Json};

fn lookup(key: &str, data: &[u8]) -> Result<Json> {
    let mut object: Map<String, Json> = serde_json::from_slice(data)?;
    object
        .remove(key)
        .ok_or_else(|| DictError::KeyNotFound(key.to_string()))
}

/// Value under `key` decoded as `T`.
pub fn unmarshal_single_key<T: DeserializeOwned>(key: &str, data: &[u8]) -> Result<T> {
    serde_json::from_value(lookup(key, data)?).map_err(|_| DictError::TypeMismatch {
        key: key.to_string(),
        expected: std::any::type_name::<T>(),
    })
}

/// Store the value under `key` through the pointer `target`. The generic
/// decoded value must be assignable to the pointee (numbers are `f64`).
pub fn unmarshal_single_key_into(key: &str, data: &[u8], target: &Value) -> Result<()> {
    let json = lookup(key, data)?;
    let slot = target.elem()?;
    slot.set(&to_value(&json)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use refract::value::new;
    use refract::{ErrorClass, Type};

    const DATA: &[u8] = br#"{"name":"probe","rate":2.5,"tags":["a","b"]}"#;

    #[test]
    fn test_unmarshal_single_key() {
        assert_eq!(unmarshal_single_key::<String>("name", DATA).unwrap(), "probe");
        assert_eq!(
            unmarshal_single_key::<Vec<String>>("tags", DATA).unwrap(),
            vec!["a", "b"]
        );
        assert!(matches!(
            unmarshal_single_key::<String>("missing", DATA),
            Err(DictError::KeyNotFound(_))
        ));
        assert!(matches!(
            unmarshal_single_key::<bool>("rate", DATA),
            Err(DictError::TypeMismatch { .. })
        ));
        assert!(matches!(
            unmarshal_single_key::<bool>("rate", b"[1]"),
            Err(DictError::Json(_))
        ));
    }

    #[test]
    fn test_unmarshal_into_pointer() {
        let rate = new(&Type::of::<f64>());
        unmarshal_single_key_into("rate", DATA, &rate).unwrap();
        assert_eq!(rate.elem().unwrap().as_float().unwrap(), 2.5);

        let anything = new(&Type::any());
        unmarshal_single_key_into("tags", DATA, &anything).unwrap();
        assert_eq!(anything.elem().unwrap().elem().unwrap().len().unwrap(), 2);

        let wrong = new(&Type::of::<i64>());
        let err = unmarshal_single_key_into("rate", DATA, &wrong).unwrap_err();
        assert!(matches!(err, DictError::Value(ref e) if e.class() == ErrorClass::TypeIncompatible));

        let err = unmarshal_single_key_into("rate", DATA, &refract::value_of(1.0f64)).unwrap_err();
        assert!(matches!(err, DictError::Value(ref e) if e.class() == ErrorClass::KindMismatch));
    }
}
