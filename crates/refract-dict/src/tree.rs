// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fully decoded JSON trees with forgiving navigation.
//!
//! [`JsonNode::get`] never fails: a wrong key, an index past the end or a
//! step into a scalar yields [`JsonNode::Missing`], and the error surfaces
//! only when [`JsonNode::get_value`] is finally called.

use crate::error::{DictError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as Json;
use std::collections::BTreeMap;

/// One level of a decoded JSON document.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsonNode {
    /// Result of navigating past the document.
    #[default]
    Missing,
    Null,
    Dict(BTreeMap<String, JsonNode>),
    Slice(Vec<JsonNode>),
    /// Bool, number or string.
    Scalar(Json),
}

/// Navigation step: a key for dicts, an index for slices.
#[derive(Debug, Clone, Copy)]
pub enum Step<'a> {
    Key(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for Step<'a> {
    fn from(key: &'a str) -> Self {
        Step::Key(key)
    }
}

impl From<usize> for Step<'_> {
    fn from(index: usize) -> Self {
        Step::Index(index)
    }
}

static MISSING: JsonNode = JsonNode::Missing;

impl JsonNode {
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str::<Json>(data)?.into())
    }

    /// Child under `step`, or [`JsonNode::Missing`].
    pub fn get<'a>(&self, step: impl Into<Step<'a>>) -> &JsonNode {
        match (self, step.into()) {
            (JsonNode::Dict(map), Step::Key(key)) => map.get(key).unwrap_or(&MISSING),
            (JsonNode::Slice(items), Step::Index(i)) => items.get(i).unwrap_or(&MISSING),
            _ => &MISSING,
        }
    }

    /// Scalar at this level; `Json::Null` for a JSON null.
    pub fn get_value(&self) -> Result<&Json> {
        static NULL: Json = Json::Null;
        match self {
            JsonNode::Scalar(v) => Ok(v),
            JsonNode::Null => Ok(&NULL),
            JsonNode::Missing => Err(DictError::Missing),
            JsonNode::Dict(_) => Err(DictError::NotAScalar("map")),
            JsonNode::Slice(_) => Err(DictError::NotAScalar("slice")),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, JsonNode::Missing)
    }

    /// Number of entries of a dict or slice; 0 otherwise.
    pub fn len(&self) -> usize {
        match self {
            JsonNode::Dict(map) => map.len(),
            JsonNode::Slice(items) => items.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Back to a plain JSON value. `Missing` becomes `null`.
    pub fn to_json(&self) -> Json {
        match self {
            JsonNode::Missing | JsonNode::Null => Json::Null,
            JsonNode::Scalar(v) => v.clone(),
            JsonNode::Slice(items) => Json::Array(items.iter().map(JsonNode::to_json).collect()),
            JsonNode::Dict(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<Json> for JsonNode {
    fn from(value: Json) -> Self {
        match value {
            Json::Null => JsonNode::Null,
            Json::Object(map) => {
                JsonNode::Dict(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
            Json::Array(items) => JsonNode::Slice(items.into_iter().map(Into::into).collect()),
            scalar => JsonNode::Scalar(scalar),
        }
    }
}

impl<'de> Deserialize<'de> for JsonNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Json::deserialize(deserializer).map(JsonNode::from)
    }
}

impl Serialize for JsonNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
