// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Single-level dictionaries over undecoded JSON.
//!
//! Only the top level is parsed; every value stays raw until it is asked for,
//! either generically (`get_key`, `get_index`), into a concrete type
//! (`unmarshal_from_key`) or as a nested dictionary (`get_dict`, `get_slice`).

use crate::error::{DictError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::collections::BTreeMap;

/// JSON object whose values are left undecoded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonDict(BTreeMap<String, Box<RawValue>>);

/// JSON array whose elements are left undecoded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonDictSlice(Vec<Box<RawValue>>);

impl JsonDict {
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Raw JSON text under `key`.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|raw| raw.get())
    }

    fn entry(&self, key: &str) -> Result<&RawValue> {
        self.0
            .get(key)
            .map(|raw| &**raw)
            .ok_or_else(|| DictError::KeyNotFound(key.to_string()))
    }

    /// Decode the value under `key` generically.
    pub fn get_key(&self, key: &str) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(self.entry(key)?.get())?)
    }

    /// Decode the value under `key` into `T`.
    pub fn unmarshal_from_key<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        Ok(serde_json::from_str(self.entry(key)?.get())?)
    }

    /// Nested object under `key`; `None` if absent or not an object.
    pub fn get_dict(&self, key: &str) -> Option<JsonDict> {
        let raw = self.0.get(key)?;
        serde_json::from_str(raw.get()).ok()
    }

    /// Nested array under `key`; `None` if absent or not an array.
    pub fn get_slice(&self, key: &str) -> Option<JsonDictSlice> {
        let raw = self.0.get(key)?;
        serde_json::from_str(raw.get()).ok()
    }
}

impl JsonDictSlice {
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn element(&self, index: usize) -> Result<&RawValue> {
        self.0.get(index).map(|raw| &**raw).ok_or_else(|| {
            DictError::Value(refract::Error::OutOfRange {
                op: "JsonDictSlice::get_index",
                index,
                len: self.0.len(),
            })
        })
    }

    /// Decode element `index` generically.
    pub fn get_index(&self, index: usize) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(self.element(index)?.get())?)
    }

    /// Decode element `index` into `T`.
    pub fn unmarshal_from_index<T: DeserializeOwned>(&self, index: usize) -> Result<T> {
        Ok(serde_json::from_str(self.element(index)?.get())?)
    }

    /// Object at `index`; `None` if out of range or not an object.
    pub fn get_dict_at_index(&self, index: usize) -> Option<JsonDict> {
        let raw = self.0.get(index)?;
        serde_json::from_str(raw.get()).ok()
    }
}
