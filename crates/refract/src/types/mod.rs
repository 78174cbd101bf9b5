// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type descriptors.
//!
//! [`Type`] is a cheap, immutable, `Send + Sync` handle over a
//! [`TypeDescriptor`]. Every accessor that only makes sense for some kinds
//! (`elem`, `key`, `field`, `in_`, ...) checks the kind first and reports a
//! typed error instead of assuming it.
//!
//! # Example
//!
//! ```rust
//! use refract::types::{FieldSpec, Type};
//! use refract::Kind;
//!
//! let person = Type::struct_of(vec![
//!     FieldSpec::new("Name", Type::of::<String>()),
//!     FieldSpec::new("Age", Type::of::<i64>()).with_tag(r#"json:"age""#),
//! ])
//! .unwrap();
//!
//! assert_eq!(person.kind(), Kind::Struct);
//! let age = person.field_by_name("Age").unwrap().unwrap();
//! assert_eq!(age.ty, Type::of::<i64>());
//! assert_eq!(age.tag.get("json"), "age");
//! assert!(person.elem().is_err());
//! ```

mod descriptor;
mod tag;

pub use descriptor::{
    ArrayDescriptor, ChanDescriptor, ChanDir, FieldDescriptor, FuncDescriptor, MapDescriptor,
    Method, MethodSig, PrimitiveKind, TypeDescriptor, TypeKind,
};
pub use tag::StructTag;

use crate::error::{Error, Result};
use crate::kind::Kind;
use crate::value::{MethodFn, Reflect};
use descriptor::{align_up, is_exported_name};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Shared handle to an immutable type descriptor.
#[derive(Clone)]
pub struct Type(Arc<TypeDescriptor>);

/// Field specification consumed by [`Type::struct_of`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    /// Declared type; `None` is rejected at build time.
    pub ty: Option<Type>,
    pub tag: StructTag,
    pub embedded: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            tag: StructTag::default(),
            embedded: false,
        }
    }

    /// Field whose type has not been declared yet.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            tag: StructTag::default(),
            embedded: false,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<StructTag>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Mark as embedded: fields of a struct-typed embedded field are promoted.
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }
}

/// Field information returned by record introspection.
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: String,
    pub ty: Type,
    pub tag: StructTag,
    /// Byte offset within the enclosing struct.
    pub offset: usize,
    /// Index path from the outer struct (more than one entry for promoted fields).
    pub index: Vec<usize>,
    pub embedded: bool,
}

impl StructField {
    fn from_descriptor(field: &FieldDescriptor, index: Vec<usize>) -> Self {
        Self {
            name: field.name.clone(),
            ty: field.ty.clone(),
            tag: field.tag.clone(),
            offset: field.offset,
            index,
            embedded: field.embedded,
        }
    }

    pub fn is_exported(&self) -> bool {
        is_exported_name(&self.name)
    }
}

impl Type {
    pub(crate) fn from_descriptor(desc: TypeDescriptor) -> Self {
        Self(Arc::new(desc))
    }

    /// Type of a native Rust value.
    pub fn of<T: Reflect>() -> Type {
        T::reflect_type()
    }

    pub fn primitive(kind: PrimitiveKind) -> Type {
        Self::from_descriptor(TypeDescriptor::primitive("", kind))
    }

    /// The empty interface, implemented by every type.
    pub fn any() -> Type {
        Self::from_descriptor(TypeDescriptor::new("", TypeKind::Interface(Vec::new())))
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.0
    }

    pub fn kind(&self) -> Kind {
        self.0.kind()
    }

    /// Declared name; empty for unnamed types.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn size(&self) -> usize {
        self.0.size()
    }

    pub fn align(&self) -> usize {
        self.0.alignment()
    }

    /// Alignment when used as a struct field.
    pub fn field_align(&self) -> usize {
        self.0.alignment()
    }

    /// Width in bits of a numeric type.
    pub fn bits(&self) -> Result<usize> {
        self.kind()
            .bits()
            .ok_or_else(|| Error::kind_mismatch("Type::bits", "numeric type", self.kind()))
    }

    /// Whether values of this type support equality (and may key a map).
    pub fn comparable(&self) -> bool {
        match &self.0.kind {
            TypeKind::Primitive(_)
            | TypeKind::Pointer(_)
            | TypeKind::Chan(_)
            | TypeKind::Interface(_) => true,
            TypeKind::Struct(fields) => fields.iter().all(|f| f.ty.comparable()),
            TypeKind::Array(arr) => arr.element_type.comparable(),
            TypeKind::Sequence(_) | TypeKind::Map(_) | TypeKind::Func(_) => false,
        }
    }

    /// Element type of a sequence, array, map, pointer or channel.
    pub fn elem(&self) -> Result<Type> {
        match &self.0.kind {
            TypeKind::Sequence(elem) | TypeKind::Pointer(elem) => Ok(elem.clone()),
            TypeKind::Array(arr) => Ok(arr.element_type.clone()),
            TypeKind::Map(m) => Ok(m.element_type.clone()),
            TypeKind::Chan(c) => Ok(c.element_type.clone()),
            TypeKind::Primitive(_)
            | TypeKind::Struct(_)
            | TypeKind::Func(_)
            | TypeKind::Interface(_) => Err(Error::kind_mismatch(
                "Type::elem",
                "slice, array, map, pointer or chan",
                self.kind(),
            )),
        }
    }

    /// Key type of a map.
    pub fn key(&self) -> Result<Type> {
        match &self.0.kind {
            TypeKind::Map(m) => Ok(m.key_type.clone()),
            _ => Err(Error::kind_mismatch("Type::key", "map", self.kind())),
        }
    }

    /// Length of an array type.
    pub fn len(&self) -> Result<usize> {
        match &self.0.kind {
            TypeKind::Array(arr) => Ok(arr.length),
            _ => Err(Error::kind_mismatch("Type::len", "array", self.kind())),
        }
    }

    pub fn chan_dir(&self) -> Result<ChanDir> {
        match &self.0.kind {
            TypeKind::Chan(c) => Ok(c.dir),
            _ => Err(Error::kind_mismatch("Type::chan_dir", "chan", self.kind())),
        }
    }

    fn signature(&self, op: &'static str) -> Result<&FuncDescriptor> {
        match &self.0.kind {
            TypeKind::Func(sig) => Ok(sig),
            _ => Err(Error::kind_mismatch(op, "func", self.kind())),
        }
    }

    pub fn is_variadic(&self) -> Result<bool> {
        Ok(self.signature("Type::is_variadic")?.variadic)
    }

    pub fn num_in(&self) -> Result<usize> {
        Ok(self.signature("Type::num_in")?.ins.len())
    }

    pub fn num_out(&self) -> Result<usize> {
        Ok(self.signature("Type::num_out")?.outs.len())
    }

    pub fn in_(&self, i: usize) -> Result<Type> {
        let sig = self.signature("Type::in")?;
        sig.ins.get(i).cloned().ok_or(Error::OutOfRange {
            op: "Type::in",
            index: i,
            len: sig.ins.len(),
        })
    }

    pub fn out(&self, i: usize) -> Result<Type> {
        let sig = self.signature("Type::out")?;
        sig.outs.get(i).cloned().ok_or(Error::OutOfRange {
            op: "Type::out",
            index: i,
            len: sig.outs.len(),
        })
    }

    fn struct_fields(&self, op: &'static str) -> Result<&[FieldDescriptor]> {
        self.0
            .fields()
            .ok_or_else(|| Error::kind_mismatch(op, "struct", self.kind()))
    }

    pub fn num_field(&self) -> Result<usize> {
        Ok(self.struct_fields("Type::num_field")?.len())
    }

    /// The i'th field of a struct type.
    pub fn field(&self, i: usize) -> Result<StructField> {
        let fields = self.struct_fields("Type::field")?;
        fields
            .get(i)
            .map(|f| StructField::from_descriptor(f, vec![i]))
            .ok_or(Error::OutOfRange {
                op: "Type::field",
                index: i,
                len: fields.len(),
            })
    }

    /// Nested field reached by following `index` through struct fields.
    pub fn field_by_index(&self, index: &[usize]) -> Result<StructField> {
        if index.is_empty() {
            return Err(Error::shape("Type::field_by_index: empty index path"));
        }
        let mut ty = self.clone();
        let mut offset = 0;
        let mut field = None;
        for &i in index {
            let found = ty.field(i)?;
            offset += found.offset;
            ty = found.ty.clone();
            field = Some(found);
        }
        let mut field = field.ok_or_else(|| Error::shape("Type::field_by_index: empty path"))?;
        field.offset = offset;
        field.index = index.to_vec();
        Ok(field)
    }

    /// Field by name, including fields promoted from embedded structs.
    ///
    /// Fails when the type is not a struct; `Ok(None)` when no field (or more
    /// than one field at the shallowest depth) matches.
    pub fn field_by_name(&self, name: &str) -> Result<Option<StructField>> {
        self.struct_fields("Type::field_by_name")?;
        Ok(self.find_field(&|candidate| candidate == name))
    }

    /// First field whose name satisfies `matcher`, searched breadth-first.
    pub fn field_by_name_func(&self, matcher: impl Fn(&str) -> bool) -> Result<Option<StructField>> {
        self.struct_fields("Type::field_by_name_func")?;
        Ok(self.find_field(&matcher))
    }

    fn find_field(&self, matcher: &dyn Fn(&str) -> bool) -> Option<StructField> {
        let mut level: Vec<(Type, Vec<usize>)> = vec![(self.clone(), Vec::new())];
        while !level.is_empty() {
            let mut found = Vec::new();
            let mut next = Vec::new();
            for (ty, path) in &level {
                let Some(fields) = ty.0.fields() else {
                    continue;
                };
                for (i, field) in fields.iter().enumerate() {
                    let mut index = path.clone();
                    index.push(i);
                    if matcher(&field.name) {
                        found.push(StructField::from_descriptor(field, index));
                    } else if field.embedded && field.ty.kind() == Kind::Struct {
                        next.push((field.ty.clone(), index));
                    }
                }
            }
            match found.len() {
                0 => level = next,
                1 => return found.pop(),
                // Ambiguous at this depth.
                _ => return None,
            }
        }
        None
    }

    pub fn num_method(&self) -> usize {
        match &self.0.kind {
            TypeKind::Interface(sigs) => sigs.len(),
            _ => self.0.methods.len(),
        }
    }

    pub fn method(&self, i: usize) -> Result<Method> {
        let found = match &self.0.kind {
            TypeKind::Interface(sigs) => sigs.get(i).map(|sig| Method {
                name: sig.name.clone(),
                ty: sig.ty.clone(),
                func: None,
                index: i,
            }),
            _ => self.0.methods.get(i).cloned(),
        };
        found.ok_or(Error::OutOfRange {
            op: "Type::method",
            index: i,
            len: self.num_method(),
        })
    }

    pub fn method_by_name(&self, name: &str) -> Option<Method> {
        match &self.0.kind {
            TypeKind::Interface(sigs) => sigs.iter().enumerate().find(|(_, s)| s.name == name).map(
                |(i, sig)| Method {
                    name: sig.name.clone(),
                    ty: sig.ty.clone(),
                    func: None,
                    index: i,
                },
            ),
            _ => self.0.methods.iter().find(|m| m.name == name).cloned(),
        }
    }

    /// Whether this type's method set covers the interface `iface`.
    pub fn implements(&self, iface: &Type) -> Result<bool> {
        let TypeKind::Interface(required) = &iface.0.kind else {
            return Err(Error::kind_mismatch(
                "Type::implements",
                "interface",
                iface.kind(),
            ));
        };
        Ok(required.iter().all(|sig| {
            self.method_by_name(&sig.name)
                .is_some_and(|m| m.ty == sig.ty)
        }))
    }

    /// Whether a value of this type may be stored into a slot of type `target`.
    pub fn assignable_to(&self, target: &Type) -> bool {
        if self == target {
            return true;
        }
        if target.kind() == Kind::Interface {
            return self.implements(target).unwrap_or(false);
        }
        (self.name().is_empty() || target.name().is_empty()) && self.same_underlying(target)
    }

    /// Whether `Value::convert` can turn a value of this type into `target`.
    pub fn convertible_to(&self, target: &Type) -> bool {
        if self.assignable_to(target) || self.same_underlying(target) {
            return true;
        }
        if self.kind().is_numeric() && target.kind().is_numeric() {
            return true;
        }
        let is_bytes = |t: &Type| {
            t.kind() == Kind::Slice && t.elem().map(|e| e.kind() == Kind::U8).unwrap_or(false)
        };
        (self.kind() == Kind::String && is_bytes(target))
            || (is_bytes(self) && target.kind() == Kind::String)
    }

    pub(crate) fn same_underlying(&self, other: &Type) -> bool {
        self.0.kind == other.0.kind
    }

    /// Unnamed sequence type with elements of `elem`.
    pub fn slice_of(elem: &Type) -> Type {
        Self::from_descriptor(TypeDescriptor::new("", TypeKind::Sequence(elem.clone())))
    }

    /// Unnamed fixed-length array type.
    pub fn array_of(elem: &Type, length: usize) -> Type {
        Self::from_descriptor(TypeDescriptor::new(
            "",
            TypeKind::Array(ArrayDescriptor {
                element_type: elem.clone(),
                length,
            }),
        ))
    }

    pub fn pointer_to(elem: &Type) -> Type {
        Self::from_descriptor(TypeDescriptor::new("", TypeKind::Pointer(elem.clone())))
    }

    /// Map type; the key type must be comparable.
    pub fn map_of(key: &Type, elem: &Type) -> Result<Type> {
        if !key.comparable() {
            return Err(Error::shape(format!(
                "map_of: key type {} is not comparable",
                key
            )));
        }
        Ok(Self::from_descriptor(TypeDescriptor::new(
            "",
            TypeKind::Map(MapDescriptor {
                key_type: key.clone(),
                element_type: elem.clone(),
            }),
        )))
    }

    /// Map type whose key is comparable by construction.
    pub(crate) fn map_unchecked(key: Type, elem: Type) -> Type {
        Self::from_descriptor(TypeDescriptor::new(
            "",
            TypeKind::Map(MapDescriptor {
                key_type: key,
                element_type: elem,
            }),
        ))
    }

    pub fn chan_of(dir: ChanDir, elem: &Type) -> Type {
        Self::from_descriptor(TypeDescriptor::new(
            "",
            TypeKind::Chan(ChanDescriptor {
                element_type: elem.clone(),
                dir,
            }),
        ))
    }

    /// Function type. A variadic signature needs a trailing slice input.
    pub fn func_of(ins: Vec<Type>, outs: Vec<Type>, variadic: bool) -> Result<Type> {
        if variadic && ins.last().map(Type::kind) != Some(Kind::Slice) {
            return Err(Error::shape(
                "func_of: variadic function needs a trailing slice parameter",
            ));
        }
        Ok(Self::from_descriptor(TypeDescriptor::new(
            "",
            TypeKind::Func(FuncDescriptor {
                ins,
                outs,
                variadic,
            }),
        )))
    }

    /// Interface type from method signatures (sorted by name, unique, func-typed).
    pub fn interface_of(mut methods: Vec<MethodSig>) -> Result<Type> {
        let mut seen = HashSet::new();
        for sig in &methods {
            if sig.name.is_empty() {
                return Err(Error::shape("interface_of: method has no name"));
            }
            if sig.ty.kind() != Kind::Func {
                return Err(Error::shape(format!(
                    "interface_of: method {} has non-func type {}",
                    sig.name, sig.ty
                )));
            }
            if !seen.insert(sig.name.as_str()) {
                return Err(Error::shape(format!(
                    "interface_of: duplicate method {}",
                    sig.name
                )));
            }
        }
        methods.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self::from_descriptor(TypeDescriptor::new(
            "",
            TypeKind::Interface(methods),
        )))
    }

    /// Anonymous record type built from `fields`.
    ///
    /// Rejects an empty field list, empty or non-identifier names, unset
    /// types and duplicate names before anything is constructed.
    pub fn struct_of(fields: Vec<FieldSpec>) -> Result<Type> {
        if fields.is_empty() {
            return Err(Error::shape("struct_of: struct type needs at least one field"));
        }
        let mut seen = HashSet::new();
        let mut offset = 0;
        let mut built = Vec::with_capacity(fields.len());
        for (i, spec) in fields.into_iter().enumerate() {
            let Some(ty) = spec.ty else {
                return Err(Error::shape(format!(
                    "struct_of: field {} has no type",
                    if spec.name.is_empty() { i.to_string() } else { spec.name }
                )));
            };
            if spec.name.is_empty() {
                return Err(Error::shape(format!(
                    "struct_of: field {} of type {} has no name",
                    i, ty
                )));
            }
            if !is_identifier(&spec.name) {
                return Err(Error::shape(format!(
                    "struct_of: field name {:?} is not a valid identifier",
                    spec.name
                )));
            }
            if !seen.insert(spec.name.clone()) {
                return Err(Error::shape(format!(
                    "struct_of: duplicate field {}",
                    spec.name
                )));
            }
            let field_offset = align_up(offset, ty.field_align());
            offset = field_offset + ty.size();
            built.push(FieldDescriptor {
                name: spec.name,
                ty,
                tag: spec.tag,
                offset: field_offset,
                embedded: spec.embedded,
            });
        }
        let ty = Self::from_descriptor(TypeDescriptor::new("", TypeKind::Struct(built)));
        log::debug!(
            "[types] struct_of: built {} (size {}, align {})",
            ty,
            ty.size(),
            ty.align()
        );
        Ok(ty)
    }

    /// A named type with the same structure as `underlying` and no methods.
    pub fn named(name: impl Into<String>, underlying: &Type) -> Result<Type> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(Error::shape(format!(
                "named: {:?} is not a valid type name",
                name
            )));
        }
        Ok(Self::from_descriptor(TypeDescriptor::new(
            name,
            underlying.0.kind.clone(),
        )))
    }

    /// A copy of this named type with one more method. `func_ty` is the
    /// method's signature without the receiver.
    pub fn with_method(
        &self,
        name: impl Into<String>,
        func_ty: &Type,
        func: MethodFn,
    ) -> Result<Type> {
        let name = name.into();
        if self.name().is_empty() {
            return Err(Error::shape(format!(
                "with_method: unnamed type {} cannot carry methods",
                self
            )));
        }
        if self.kind() == Kind::Interface {
            return Err(Error::shape("with_method: interface types declare methods via interface_of"));
        }
        if !is_identifier(&name) {
            return Err(Error::shape(format!(
                "with_method: {:?} is not a valid method name",
                name
            )));
        }
        if func_ty.kind() != Kind::Func {
            return Err(Error::shape(format!(
                "with_method: method {} has non-func type {}",
                name, func_ty
            )));
        }
        if self.0.methods.iter().any(|m| m.name == name) {
            return Err(Error::shape(format!(
                "with_method: duplicate method {}",
                name
            )));
        }
        let mut desc = (*self.0).clone();
        desc.methods.push(Method {
            name,
            ty: func_ty.clone(),
            func: Some(func),
            index: 0,
        });
        desc.methods.sort_by(|a, b| a.name.cmp(&b.name));
        for (i, m) in desc.methods.iter_mut().enumerate() {
            m.index = i;
        }
        Ok(Self::from_descriptor(desc))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self)
    }
}
