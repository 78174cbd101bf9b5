// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # refract-dict - JSON dictionaries for dynamic data
//!
//! Helpers for poking at JSON documents whose shape is not known up front:
//!
//! - [`JsonDict`] / [`JsonDictSlice`]: one level decoded, values kept raw
//! - [`JsonNode`]: whole tree decoded, navigation never fails until
//!   [`JsonNode::get_value`]
//! - [`unmarshal_single_key`]: pull one key out of an object
//! - [`to_value`] / [`to_struct`]: JSON as refract value handles
//!
//! # Example
//!
//! ```rust
//! use refract_dict::JsonDict;
//!
//! let dict = JsonDict::from_json(r#"{"a":{"b":"c"},"d":[1,2,"e","f"]}"#).unwrap();
//! let d = dict.get_slice("d").unwrap();
//! assert_eq!(d.get_index(3).unwrap(), serde_json::json!("f"));
//! assert!(d.get_index(4).is_err());
//! ```

mod error;
mod raw;
mod reflect;
mod single_key;
mod tree;

pub use error::{DictError, Result};
pub use raw::{JsonDict, JsonDictSlice};
pub use reflect::{to_struct, to_value};
pub use single_key::{unmarshal_single_key, unmarshal_single_key_into};
pub use tree::{JsonNode, Step};
