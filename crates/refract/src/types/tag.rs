// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct field tags.
//!
//! A tag is an opaque string attached to a record field. By convention it is a
//! space-separated list of `key:"value"` pairs, e.g. `json:"name" db:"user_name"`.

use std::fmt;

/// Metadata string attached to a struct field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StructTag(String);

impl StructTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value associated with `key`, or an empty string.
    pub fn get(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_default()
    }

    /// Value associated with `key`, distinguishing an absent key from an
    /// explicitly empty value. Malformed trailing input ends the scan.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let mut rest = self.0.as_bytes();
        loop {
            while let Some((&b' ', tail)) = rest.split_first() {
                rest = tail;
            }
            if rest.is_empty() {
                return None;
            }

            let mut i = 0;
            while i < rest.len()
                && rest[i] > b' '
                && rest[i] != b':'
                && rest[i] != b'"'
                && rest[i] != 0x7f
            {
                i += 1;
            }
            if i == 0 || i + 1 >= rest.len() || rest[i] != b':' || rest[i + 1] != b'"' {
                return None;
            }
            let name = &rest[..i];
            rest = &rest[i + 1..];

            // Quoted value, honouring backslash escapes.
            let mut j = 1;
            while j < rest.len() && rest[j] != b'"' {
                if rest[j] == b'\\' {
                    j += 1;
                }
                j += 1;
            }
            if j >= rest.len() {
                return None;
            }
            let quoted = &rest[1..j];
            rest = &rest[j + 1..];

            if name == key.as_bytes() {
                return unquote(quoted);
            }
        }
    }
}

fn unquote(raw: &[u8]) -> Option<String> {
    let raw = std::str::from_utf8(raw).ok()?;
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            other => out.push(other),
        }
    }
    Some(out)
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StructTag {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

impl From<String> for StructTag {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}
