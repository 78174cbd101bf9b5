// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic composite types: field specs, struct definitions and instances.
//!
//! Field names go through the [`NamingConfig`] policy before the struct is
//! built, so `"first name"` becomes the exported field `Firstname` by default.
//! The free functions use the environment-derived policy; pass a config to
//! [`TypeBuilder::with_config`] to override it.
//!
//! # Example
//!
//! ```rust
//! use refract::builder::{self, TypeBuilder};
//! use refract::value::value_of;
//!
//! let person = TypeBuilder::new()
//!     .field::<String>("name")
//!     .tag(r#"json:"name""#)
//!     .field::<u32>("age")
//!     .build()
//!     .unwrap();
//!
//! let p = builder::new_type_instance(&person);
//! builder::set_struct_field_value(&p, "Name", &value_of("Ada")).unwrap();
//! let name: String = builder::get_struct_field_value(&p, "Name").unwrap();
//! assert_eq!(name, "Ada");
//! ```

use crate::config::NamingConfig;
use crate::error::{Error, Result};
use crate::kind::Kind;
use crate::types::{FieldSpec, StructTag, Type, TypeKind};
use crate::value::{self, indirect, make_map, make_slice, FromReflect, Reflect, ReflectKey, Value};
use std::sync::OnceLock;

static DEFAULT_NAMING: OnceLock<NamingConfig> = OnceLock::new();

/// Naming policy used by the free functions, read from the environment once.
pub fn default_naming() -> &'static NamingConfig {
    DEFAULT_NAMING.get_or_init(NamingConfig::from_env)
}

fn spec(config: &NamingConfig, name: &str, ty: Type, tag: StructTag) -> FieldSpec {
    FieldSpec::new(config.normalize(name), ty).with_tag(tag)
}

/// Field whose type is inferred from `sample`.
pub fn new_field<T: Reflect>(name: &str, _sample: T, tag: impl Into<StructTag>) -> FieldSpec {
    spec(default_naming(), name, T::reflect_type(), tag.into())
}

/// Field with an explicit type.
pub fn new_field_with_type(name: &str, ty: &Type, tag: impl Into<StructTag>) -> FieldSpec {
    spec(default_naming(), name, ty.clone(), tag.into())
}

/// Build an unnamed struct type from `fields`.
pub fn new_struct_definition(fields: Vec<FieldSpec>) -> Result<Type> {
    let count = fields.len();
    let ty = Type::struct_of(fields)?;
    log::debug!("[builder] defined struct with {} fields: {}", count, ty);
    Ok(ty)
}

/// Pointer to a fresh zero value of `ty`; a pointer type is unwrapped one
/// level first. `elem()` on the result is always settable.
pub fn new_type_instance(ty: &Type) -> Value {
    let target = match &ty.descriptor().kind {
        TypeKind::Pointer(inner) => inner.clone(),
        _ => ty.clone(),
    };
    value::new(&target)
}

/// Empty `[]ty` with zero length and capacity.
pub fn new_slice_of_type(ty: &Type) -> Result<Value> {
    make_slice(&Type::slice_of(ty), 0, 0)
}

/// Empty `map[K]ty`, keyed by the type of the sample.
pub fn new_map_of_type<K: ReflectKey>(_sample: K, ty: &Type) -> Result<Value> {
    new_map_of_type_keyed(&K::reflect_type(), ty)
}

/// Empty `map[key]ty`. A non-comparable key is rejected before allocation.
pub fn new_map_of_type_keyed(key: &Type, ty: &Type) -> Result<Value> {
    if !key.comparable() {
        return Err(Error::shape(format!(
            "new_map_of_type: key type {} is not comparable",
            key
        )));
    }
    make_map(&Type::map_of(key, ty)?)
}

fn struct_target(op: &'static str, instance: &Value) -> Result<Value> {
    let target = indirect(instance)?;
    if !target.is_valid() {
        return Err(Error::NilDereference { op });
    }
    if target.kind() != Kind::Struct {
        return Err(Error::kind_mismatch(op, "struct", target.kind()));
    }
    Ok(target)
}

/// Assign field `name` of a struct instance (or a pointer to one).
pub fn set_struct_field_value(instance: &Value, name: &str, value: &Value) -> Result<()> {
    let field = struct_target("set_struct_field_value", instance)?.field_by_name(name)?;
    field.set(value)
}

/// Field `name` of a struct instance converted to `T`.
pub fn get_struct_field_value<T: FromReflect>(instance: &Value, name: &str) -> Result<T> {
    struct_target("get_struct_field_value", instance)?
        .field_by_name(name)?
        .extract_as::<T>()
}

/// Field `name` of a struct instance as a handle.
pub fn get_struct_field_value_any(instance: &Value, name: &str) -> Result<Value> {
    struct_target("get_struct_field_value_any", instance)?.field_by_name(name)
}

fn classify(v: &Value, kind: Kind) -> bool {
    match v.ty() {
        Ok(ty) if ty.kind() == Kind::Pointer => ty.elem().is_ok_and(|e| e.kind() == kind),
        Ok(ty) => ty.kind() == kind,
        Err(_) => false,
    }
}

pub fn is_pointer(v: &Value) -> bool {
    v.kind() == Kind::Pointer
}

/// Map or pointer to map.
pub fn is_map(v: &Value) -> bool {
    classify(v, Kind::Map)
}

/// Slice or pointer to slice.
pub fn is_slice(v: &Value) -> bool {
    classify(v, Kind::Slice)
}

/// Struct or pointer to struct.
pub fn is_struct(v: &Value) -> bool {
    classify(v, Kind::Struct)
}

/// Native `T` held by `v`.
pub fn assert_as<T: FromReflect>(v: &Value) -> Result<T> {
    v.extract_as::<T>()
}

/// Builder for struct types with normalized field names.
#[derive(Debug)]
pub struct TypeBuilder {
    config: NamingConfig,
    fields: Vec<FieldSpec>,
}

impl Default for TypeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeBuilder {
    /// Create a new builder using the environment naming policy.
    pub fn new() -> Self {
        Self::with_config(*default_naming())
    }

    pub fn with_config(config: NamingConfig) -> Self {
        Self {
            config,
            fields: Vec::new(),
        }
    }

    /// Add a field of native type `T`.
    pub fn field<T: Reflect>(self, name: &str) -> Self {
        self.field_with_type(name, &T::reflect_type())
    }

    /// Add a field with a type.
    pub fn field_with_type(mut self, name: &str, ty: &Type) -> Self {
        self.fields
            .push(spec(&self.config, name, ty.clone(), StructTag::default()));
        self
    }

    /// Add an embedded field; its fields are promoted.
    pub fn embed(mut self, name: &str, ty: &Type) -> Self {
        self.fields
            .push(spec(&self.config, name, ty.clone(), StructTag::default()).embedded());
        self
    }

    /// Set the tag of the most recently added field.
    pub fn tag(mut self, tag: impl Into<StructTag>) -> Self {
        if let Some(last) = self.fields.last_mut() {
            last.tag = tag.into();
        }
        self
    }

    /// Build the struct type.
    pub fn build(self) -> Result<Type> {
        new_struct_definition(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use crate::value::value_of;

    fn person() -> Type {
        new_struct_definition(vec![
            new_field("name", String::new(), r#"json:"name""#),
            new_field("first name", String::new(), ""),
            new_field_with_type("tags", &Type::of::<Vec<String>>(), ""),
        ])
        .unwrap()
    }

    #[test]
    fn test_field_names_are_normalized() {
        let config = NamingConfig::default();
        let ty = TypeBuilder::with_config(config)
            .field::<String>("first name")
            .field::<i64>("age")
            .build()
            .unwrap();
        assert_eq!(ty.field(0).unwrap().name, "Firstname");
        assert_eq!(ty.field(1).unwrap().name, "Age");

        let raw = NamingConfig::builder()
            .strip_spaces(false)
            .capitalize_first(false)
            .build();
        let err = TypeBuilder::with_config(raw)
            .field::<String>("first name")
            .build()
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::ShapeInvalid);
    }

    #[test]
    fn test_builder_tags_last_field() {
        let ty = TypeBuilder::with_config(NamingConfig::default())
            .field::<String>("id")
            .tag(r#"json:"id,omitempty""#)
            .field::<bool>("ok")
            .build()
            .unwrap();
        let id = ty.field_by_name("Id").unwrap().unwrap();
        assert_eq!(id.tag.get("json"), "id,omitempty");
        assert!(ty.field_by_name("Ok").unwrap().unwrap().tag.is_empty());
    }

    #[test]
    fn test_duplicate_and_empty_fields() {
        let err = new_struct_definition(vec![
            new_field_with_type("Name", &Type::of::<String>(), ""),
            new_field_with_type("Name", &Type::of::<i32>(), ""),
        ])
        .unwrap_err();
        assert_eq!(err.class(), ErrorClass::ShapeInvalid);

        let err = new_struct_definition(vec![new_field("  ", 0u8, "")]).unwrap_err();
        assert_eq!(err.class(), ErrorClass::ShapeInvalid);

        let err = new_struct_definition(vec![FieldSpec::untyped("Name")]).unwrap_err();
        assert_eq!(err.class(), ErrorClass::ShapeInvalid);
    }

    #[test]
    fn test_instance_is_settable() {
        let ty = person();
        let ptr = new_type_instance(&ty);
        assert!(is_pointer(&ptr));
        assert!(is_struct(&ptr));
        let rec = ptr.elem().unwrap();
        assert!(rec.can_set());
        assert!(rec.is_zero().unwrap());

        set_struct_field_value(&ptr, "Name", &value_of("Ada")).unwrap();
        assert_eq!(
            get_struct_field_value::<String>(&ptr, "Name").unwrap(),
            "Ada"
        );
        assert_eq!(
            get_struct_field_value::<String>(&rec, "Name").unwrap(),
            "Ada"
        );

        let tags = get_struct_field_value_any(&ptr, "Tags").unwrap();
        assert!(tags.is_nil().unwrap());
    }

    #[test]
    fn test_pointer_type_is_unwrapped() {
        let ty = person();
        let ptr = new_type_instance(&Type::pointer_to(&ty));
        assert_eq!(ptr.ty().unwrap(), Type::pointer_to(&ty));
        assert_eq!(ptr.elem().unwrap().kind(), Kind::Struct);
    }

    #[test]
    fn test_field_helpers_report_errors() {
        let ptr = new_type_instance(&person());
        let err = set_struct_field_value(&ptr, "Missing", &value_of(1i32)).unwrap_err();
        assert_eq!(err.class(), ErrorClass::OutOfRange);

        let err = set_struct_field_value(&ptr, "Name", &value_of(1i32)).unwrap_err();
        assert_eq!(err.class(), ErrorClass::TypeIncompatible);

        let err = get_struct_field_value::<i64>(&ptr, "Name").unwrap_err();
        assert_eq!(err.class(), ErrorClass::TypeIncompatible);

        let err = get_struct_field_value_any(&value_of(3u8), "Name").unwrap_err();
        assert_eq!(err.class(), ErrorClass::KindMismatch);

        // a struct copy is readable but not settable
        let copy = value::zero(&person());
        assert!(get_struct_field_value::<String>(&copy, "Name").is_ok());
        let err = set_struct_field_value(&copy, "Name", &value_of("x")).unwrap_err();
        assert_eq!(err.class(), ErrorClass::NotAddressable);
    }

    #[test]
    fn test_slice_and_map_of_type() {
        let ty = person();
        let s = new_slice_of_type(&ty).unwrap();
        assert!(is_slice(&s));
        assert_eq!(s.len().unwrap(), 0);
        assert_eq!(s.cap().unwrap(), 0);
        assert_eq!(s.ty().unwrap().elem().unwrap(), ty);

        let m = new_map_of_type(String::new(), &ty).unwrap();
        assert!(is_map(&m));
        assert!(!is_slice(&m));
        assert_eq!(m.ty().unwrap().key().unwrap(), Type::of::<String>());

        let err = new_map_of_type_keyed(&Type::of::<Vec<u8>>(), &ty).unwrap_err();
        assert_eq!(err.class(), ErrorClass::ShapeInvalid);
        let err = new_map_of_type_keyed(&ty, &ty).unwrap_err();
        assert_eq!(err.class(), ErrorClass::ShapeInvalid);
    }

    #[test]
    fn test_assert_as() {
        assert_eq!(assert_as::<u16>(&value_of(9u16)).unwrap(), 9);
        assert!(assert_as::<String>(&value_of(9u16)).is_err());
        assert!(!is_struct(&Value::invalid()));
    }
}
