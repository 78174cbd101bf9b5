// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime type information.

use super::{StructTag, Type};
use crate::kind::Kind;
use crate::value::MethodFn;
use std::fmt;

const WORD: usize = std::mem::size_of::<usize>();

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Isize,
    I8,
    I16,
    I32,
    I64,
    Usize,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
}

impl PrimitiveKind {
    /// Size in bytes. Strings count as a (pointer, length) header.
    pub fn size(&self) -> usize {
        match self {
            Self::Bool | Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
            Self::Isize | Self::Usize => WORD,
            Self::String => 2 * WORD,
        }
    }

    /// Natural alignment.
    pub fn alignment(&self) -> usize {
        match self {
            Self::String => WORD,
            other => other.size(),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Self::Bool => Kind::Bool,
            Self::Isize => Kind::Isize,
            Self::I8 => Kind::I8,
            Self::I16 => Kind::I16,
            Self::I32 => Kind::I32,
            Self::I64 => Kind::I64,
            Self::Usize => Kind::Usize,
            Self::U8 => Kind::U8,
            Self::U16 => Kind::U16,
            Self::U32 => Kind::U32,
            Self::U64 => Kind::U64,
            Self::F32 => Kind::F32,
            Self::F64 => Kind::F64,
            Self::String => Kind::String,
        }
    }
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Recv,
    Send,
    Both,
}

impl ChanDir {
    pub fn can_send(self) -> bool {
        matches!(self, ChanDir::Send | ChanDir::Both)
    }

    pub fn can_recv(self) -> bool {
        matches!(self, ChanDir::Recv | ChanDir::Both)
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Primitive type.
    Primitive(PrimitiveKind),
    /// Struct with named fields.
    Struct(Vec<FieldDescriptor>),
    /// Sequence (dynamic length).
    Sequence(Type),
    /// Array (fixed length).
    Array(ArrayDescriptor),
    /// Associative container.
    Map(MapDescriptor),
    /// Reference to a value of the element type.
    Pointer(Type),
    /// Channel.
    Chan(ChanDescriptor),
    /// Function signature.
    Func(FuncDescriptor),
    /// Interface (method set).
    Interface(Vec<MethodSig>),
}

/// A complete type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Type name (empty for unnamed composite types).
    pub name: String,
    /// Type kind.
    pub kind: TypeKind,
    /// Methods attached to a named type, sorted by name.
    pub methods: Vec<Method>,
    size: usize,
    align: usize,
}

impl TypeDescriptor {
    /// Create a new type descriptor; size and alignment are derived from `kind`.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        let (size, align) = layout_of(&kind);
        Self {
            name: name.into(),
            kind,
            methods: Vec::new(),
            size,
            align,
        }
    }

    /// Create a primitive type descriptor.
    pub fn primitive(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self::new(name, TypeKind::Primitive(kind))
    }

    pub fn kind(&self) -> Kind {
        match &self.kind {
            TypeKind::Primitive(p) => p.kind(),
            TypeKind::Struct(_) => Kind::Struct,
            TypeKind::Sequence(_) => Kind::Slice,
            TypeKind::Array(_) => Kind::Array,
            TypeKind::Map(_) => Kind::Map,
            TypeKind::Pointer(_) => Kind::Pointer,
            TypeKind::Chan(_) => Kind::Chan,
            TypeKind::Func(_) => Kind::Func,
            TypeKind::Interface(_) => Kind::Interface,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn alignment(&self) -> usize {
        self.align
    }

    /// Get fields if this is a struct.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.kind {
            TypeKind::Struct(fields) => Some(fields),
            _ => None,
        }
    }
}

fn layout_of(kind: &TypeKind) -> (usize, usize) {
    match kind {
        TypeKind::Primitive(p) => (p.size(), p.alignment()),
        TypeKind::Struct(fields) => {
            let align = fields
                .iter()
                .map(|f| f.ty.align())
                .max()
                .unwrap_or(1);
            let end = fields
                .last()
                .map(|f| f.offset + f.ty.size())
                .unwrap_or(0);
            (align_up(end, align), align)
        }
        TypeKind::Sequence(_) => (3 * WORD, WORD),
        TypeKind::Array(arr) => (arr.element_type.size() * arr.length, arr.element_type.align()),
        TypeKind::Map(_) | TypeKind::Pointer(_) | TypeKind::Chan(_) | TypeKind::Func(_) => {
            (WORD, WORD)
        }
        TypeKind::Interface(_) => (2 * WORD, WORD),
    }
}

pub(crate) fn align_up(offset: usize, align: usize) -> usize {
    let align = align.max(1);
    offset.div_ceil(align) * align
}

/// Field descriptor for struct members.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Field type.
    pub ty: Type,
    /// Field tag.
    pub tag: StructTag,
    /// Byte offset within the struct.
    pub offset: usize,
    /// Is an embedded field (fields are promoted).
    pub embedded: bool,
}

impl FieldDescriptor {
    /// A field is exported when its name starts with an upper-case letter.
    pub fn is_exported(&self) -> bool {
        is_exported_name(&self.name)
    }
}

pub(crate) fn is_exported_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Array type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDescriptor {
    /// Element type.
    pub element_type: Type,
    /// Fixed length.
    pub length: usize,
}

/// Map type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDescriptor {
    pub key_type: Type,
    pub element_type: Type,
}

/// Channel type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ChanDescriptor {
    pub element_type: Type,
    pub dir: ChanDir,
}

/// Function signature descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDescriptor {
    pub ins: Vec<Type>,
    pub outs: Vec<Type>,
    /// The last input is a slice receiving trailing arguments.
    pub variadic: bool,
}

/// Interface method signature.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSig {
    pub name: String,
    /// Function type of the method, without receiver.
    pub ty: Type,
}

/// Method attached to a named type (or an interface method).
#[derive(Clone)]
pub struct Method {
    pub name: String,
    /// Function type of the method, without receiver.
    pub ty: Type,
    /// Implementation; `None` for interface methods.
    pub func: Option<MethodFn>,
    /// Position in the sorted method set.
    pub index: usize,
}

impl Method {
    pub fn is_exported(&self) -> bool {
        is_exported_name(&self.name)
    }
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.ty == other.ty
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.name.is_empty() {
            return f.write_str(&self.name);
        }
        match &self.kind {
            TypeKind::Primitive(p) => f.write_str(p.kind().name()),
            TypeKind::Struct(fields) => {
                if fields.is_empty() {
                    return f.write_str("struct {}");
                }
                f.write_str("struct { ")?;
                for (idx, field) in fields.iter().enumerate() {
                    if idx > 0 {
                        f.write_str("; ")?;
                    }
                    if field.embedded {
                        write!(f, "{}", field.ty)?;
                    } else {
                        write!(f, "{} {}", field.name, field.ty)?;
                    }
                    if !field.tag.is_empty() {
                        write!(f, " {:?}", field.tag.as_str())?;
                    }
                }
                f.write_str(" }")
            }
            TypeKind::Sequence(elem) => write!(f, "[]{}", elem),
            TypeKind::Array(arr) => write!(f, "[{}]{}", arr.length, arr.element_type),
            TypeKind::Map(m) => write!(f, "map[{}]{}", m.key_type, m.element_type),
            TypeKind::Pointer(elem) => write!(f, "*{}", elem),
            TypeKind::Chan(c) => match c.dir {
                ChanDir::Both => write!(f, "chan {}", c.element_type),
                ChanDir::Send => write!(f, "chan<- {}", c.element_type),
                ChanDir::Recv => write!(f, "<-chan {}", c.element_type),
            },
            TypeKind::Func(sig) => write_signature(f, "fn", sig),
            TypeKind::Interface(methods) => {
                if methods.is_empty() {
                    return f.write_str("interface {}");
                }
                f.write_str("interface { ")?;
                for (idx, m) in methods.iter().enumerate() {
                    if idx > 0 {
                        f.write_str("; ")?;
                    }
                    match &m.ty.descriptor().kind {
                        TypeKind::Func(sig) => write_signature(f, &m.name, sig)?,
                        _ => write!(f, "{} {}", m.name, m.ty)?,
                    }
                }
                f.write_str(" }")
            }
        }
    }
}

fn write_signature(f: &mut fmt::Formatter<'_>, head: &str, sig: &FuncDescriptor) -> fmt::Result {
    write!(f, "{}(", head)?;
    for (idx, input) in sig.ins.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        if sig.variadic && idx + 1 == sig.ins.len() {
            match &input.descriptor().kind {
                TypeKind::Sequence(elem) => write!(f, "...{}", elem)?,
                _ => write!(f, "{}", input)?,
            }
        } else {
            write!(f, "{}", input)?;
        }
    }
    f.write_str(")")?;
    match sig.outs.len() {
        0 => Ok(()),
        1 => write!(f, " -> {}", sig.outs[0]),
        _ => {
            f.write_str(" -> (")?;
            for (idx, out) in sig.outs.iter().enumerate() {
                if idx > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", out)?;
            }
            f.write_str(")")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_size() {
        assert_eq!(PrimitiveKind::Bool.size(), 1);
        assert_eq!(PrimitiveKind::U32.size(), 4);
        assert_eq!(PrimitiveKind::F64.size(), 8);
        assert_eq!(PrimitiveKind::String.size(), 2 * WORD);
    }

    #[test]
    fn test_primitive_alignment() {
        assert_eq!(PrimitiveKind::U8.alignment(), 1);
        assert_eq!(PrimitiveKind::U16.alignment(), 2);
        assert_eq!(PrimitiveKind::U32.alignment(), 4);
        assert_eq!(PrimitiveKind::F64.alignment(), 8);
    }

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 8), 0);
        assert_eq!(align_up(1, 8), 8);
        assert_eq!(align_up(9, 4), 12);
        assert_eq!(align_up(3, 0), 3);
    }

    #[test]
    fn test_exported_name() {
        assert!(is_exported_name("Name"));
        assert!(!is_exported_name("name"));
        assert!(!is_exported_name(""));
    }
}
