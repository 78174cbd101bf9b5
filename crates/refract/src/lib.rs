// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # refract - safe runtime types and values
//!
//! Build composite types (structs, slices, maps) whose shape is only known at
//! runtime, and read or mutate their values through guarded handles. Misuse
//! never panics: every kind, bounds, addressability and assignability check
//! runs before storage is touched and reports a typed [`Error`].
//!
//! ## Quick Start
//!
//! ```rust
//! use refract::builder::{self, new_field};
//! use refract::ops;
//! use refract::value::value_of;
//!
//! # fn main() -> refract::Result<()> {
//! let item = builder::new_struct_definition(vec![new_field("name", String::new(), "")])?;
//!
//! let a = builder::new_type_instance(&item);
//! builder::set_struct_field_value(&a, "Name", &value_of("a"))?;
//!
//! let list = builder::new_slice_of_type(&item)?;
//! let list = ops::append(&list, &[a])?;
//! assert_eq!(ops::len(&list)?, 1);
//!
//! let first = ops::get_index_value(&list, 0)?;
//! assert_eq!(builder::get_struct_field_value::<String>(&first, "Name")?, "a");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  builder: field specs, struct definitions, instances          |
//! |  ops:     append / prepend / index / map helpers              |
//! +---------------------------------------------------------------+
//! |  value:   Value handles over shared storage places            |
//! +---------------------------------------------------------------+
//! |  types:   immutable Type descriptors       kind: Kind         |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Kind`] | Closed taxonomy of runtime shapes |
//! | [`Type`] | Immutable, shareable type descriptor |
//! | [`Value`] | Guarded handle to a runtime value |
//! | [`Error`] | Typed failure of any guarded operation |
//!
//! `Type` is `Send + Sync`. `Value` is single-threaded; handles that alias the
//! same storage must be serialized by the caller.

pub mod builder;
pub mod config;
pub mod error;
pub mod kind;
pub mod ops;
pub mod types;
pub mod value;

pub use builder::TypeBuilder;
pub use config::NamingConfig;
pub use error::{Error, ErrorClass, Result};
pub use kind::Kind;
pub use types::{FieldSpec, StructField, StructTag, Type};
pub use value::{value_of, DynamicValue, FromReflect, Reflect, Value};

#[cfg(test)]
mod tests;
