// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field-name normalization policy for the builder.
//!
//! Defaults can be overridden from the environment:
//!
//! - `REFRACT_STRIP_SPACES`: remove every space from field names (default: true)
//! - `REFRACT_CAPITALIZE_FIELDS`: upper-case the first character so the field
//!   is exported (default: true)
//!
//! Flags accept `1`/`true`/`yes`/`on` and `0`/`false`/`no`/`off`; anything
//! else keeps the default.
//!
//! # Example
//!
//! ```bash
//! export REFRACT_CAPITALIZE_FIELDS=false
//! ```

use std::env;

/// Environment variable names
pub const ENV_STRIP_SPACES: &str = "REFRACT_STRIP_SPACES";
pub const ENV_CAPITALIZE_FIELDS: &str = "REFRACT_CAPITALIZE_FIELDS";

/// How builder field names are normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingConfig {
    /// Remove embedded spaces ("first name" -> "firstname").
    pub strip_spaces: bool,

    /// Upper-case the first character ("name" -> "Name").
    pub capitalize_first: bool,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            strip_spaces: true,
            capitalize_first: true,
        }
    }
}

fn parse_flag(raw: Option<String>) -> Option<bool> {
    let raw = raw?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl NamingConfig {
    /// Create a new config builder
    pub fn builder() -> NamingConfigBuilder {
        NamingConfigBuilder::default()
    }

    /// Defaults overridden by the `REFRACT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let config = Self {
            strip_spaces: parse_flag(lookup(ENV_STRIP_SPACES)).unwrap_or(defaults.strip_spaces),
            capitalize_first: parse_flag(lookup(ENV_CAPITALIZE_FIELDS))
                .unwrap_or(defaults.capitalize_first),
        };
        log::debug!("[config] naming policy: {:?}", config);
        config
    }

    /// Apply the policy to `name`.
    pub fn normalize(&self, name: &str) -> String {
        let name: String = if self.strip_spaces {
            name.chars().filter(|c| *c != ' ').collect()
        } else {
            name.to_string()
        };
        if !self.capitalize_first {
            return name;
        }
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if !first.is_uppercase() => first.to_uppercase().chain(chars).collect(),
            _ => name,
        }
    }
}

/// Builder for [`NamingConfig`]
#[derive(Debug, Default)]
pub struct NamingConfigBuilder {
    strip_spaces: Option<bool>,
    capitalize_first: Option<bool>,
}

impl NamingConfigBuilder {
    pub fn strip_spaces(mut self, strip: bool) -> Self {
        self.strip_spaces = Some(strip);
        self
    }

    pub fn capitalize_first(mut self, capitalize: bool) -> Self {
        self.capitalize_first = Some(capitalize);
        self
    }

    /// Build the configuration
    pub fn build(self) -> NamingConfig {
        let defaults = NamingConfig::default();

        NamingConfig {
            strip_spaces: self.strip_spaces.unwrap_or(defaults.strip_spaces),
            capitalize_first: self.capitalize_first.unwrap_or(defaults.capitalize_first),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_normalization() {
        let config = NamingConfig::default();
        assert_eq!(config.normalize("first name"), "Firstname");
        assert_eq!(config.normalize("Age"), "Age");
        assert_eq!(config.normalize("éclair"), "Éclair");
        assert_eq!(config.normalize(""), "");
        assert_eq!(config.normalize("   "), "");
    }

    #[test]
    fn test_builder_overrides() {
        let config = NamingConfig::builder().capitalize_first(false).build();
        assert!(config.strip_spaces);
        assert_eq!(config.normalize("a b"), "ab");

        let config = NamingConfig::builder().strip_spaces(false).build();
        assert_eq!(config.normalize("a b"), "A b");
    }

    #[test]
    fn test_lookup_parsing() {
        let config = NamingConfig::from_lookup(|key| match key {
            ENV_STRIP_SPACES => Some("off".into()),
            ENV_CAPITALIZE_FIELDS => Some("maybe".into()),
            _ => None,
        });
        assert!(!config.strip_spaces);
        assert!(config.capitalize_first);

        assert_eq!(NamingConfig::from_lookup(|_| None), NamingConfig::default());
    }
}
