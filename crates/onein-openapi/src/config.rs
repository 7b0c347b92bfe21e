//! Conversion config loaded from YAML.
//!
//! # File format
//!
//! ```yaml
//! # onein.yaml
//! # Prepended to every path before flattening.
//! prefix: /onein
//!
//! # Merged into every operation's request body.
//! commonParameters:
//!   - name: X-Tenant
//!     in: header
//!     required: true
//!     schema:
//!       type: string
//!
//! # Added to every response envelope next to `_jsonBody`.
//! commonResponse:
//!   code:
//!     type: integer
//!   message:
//!     type: string
//! ```
//!
//! Every field is optional; a missing file means all defaults.

use std::path::Path;

use serde::Deserialize;
use serde_yaml_ng::{Mapping, Value};

use crate::parameter::Parameter;

/// Default path prefix.
pub const DEFAULT_PREFIX: &str = "/onein";

/// Conversion settings. Immutable once handed to [`convert`](crate::convert).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Prepended to every path key.
    pub prefix: String,

    /// Parameters merged into every operation ahead of path-level and
    /// operation-level ones.
    pub common_parameters: Vec<Parameter>,

    /// Fields (name → schema) carried by every response envelope.
    pub common_response: Mapping,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            common_parameters: Vec::new(),
            common_response: Mapping::new(),
        }
    }
}

impl Config {
    /// Load config from a YAML file.
    ///
    /// An empty file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Load config from `path`, falling back to defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> crate::error::Result<Self> {
        if path.exists() {
            tracing::info!(path = %path.display(), "reading config file");
            Self::load(path)
        } else {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Set the path prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Set the common parameters.
    #[must_use]
    pub fn common_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.common_parameters = parameters;
        self
    }

    /// Add one common response field.
    #[must_use]
    pub fn common_response_field(mut self, name: &str, schema: Value) -> Self {
        self.common_response
            .insert(Value::String(name.to_string()), schema);
        self
    }
}
