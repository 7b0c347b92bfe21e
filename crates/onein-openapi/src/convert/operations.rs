//! Operation flattening.
//!
//! Every `(path, method)` pair becomes its own path item whose only
//! operation is `post`:
//!
//! ```text
//! /onein/users/{id}  get    →  /onein/users/[id]/get     post
//! /onein/users/{id}  delete →  /onein/users/[id]/delete  post
//! ```

use serde_yaml_ng::{Mapping, Value};

use crate::error::{Error, Result};

use super::helpers::{val_s, HTTP_METHODS};
use super::{request, responses, Context};

/// Where an operation came from, for synthesized names and error messages.
#[derive(Debug, Clone)]
pub struct OperationInfo {
    /// Original (prefixed) path.
    pub path: String,
    /// Original HTTP method.
    pub method: &'static str,
    /// Declared `operationId`.
    pub id: Option<String>,
}

impl OperationInfo {
    fn new(path: &str, method: &'static str, operation: &Mapping) -> Self {
        Self {
            path: path.to_string(),
            method,
            id: operation
                .get("operationId")
                .and_then(Value::as_str)
                .map(ToString::to_string),
        }
    }

    /// `operationId`, or `METHOD path` when there is none.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("{} {}", self.method.to_uppercase(), self.path),
        }
    }

    /// `operationId`, needed whenever a schema is synthesized for the operation.
    pub fn require_id(&self) -> Result<&str> {
        self.id.as_deref().ok_or_else(|| Error::MissingOperationId {
            path: self.path.clone(),
            method: self.method.to_string(),
        })
    }
}

/// Flattened path key: `<path>/<method>` with `{name}` placeholders as `[name]`.
#[must_use]
pub fn flattened_path(path: &str, method: &str) -> String {
    format!("{path}/{method}")
        .chars()
        .map(|c| match c {
            '{' => '[',
            '}' => ']',
            other => other,
        })
        .collect()
}

/// Flatten every operation, merging its parameters and wrapping its response
/// on the way.
pub fn flatten_operations(ctx: &mut Context<'_>, paths: Mapping) -> Result<Mapping> {
    tracing::info!("converting api format");
    let mut flattened = Mapping::new();

    for (path_key, path_item) in paths {
        let path = path_key
            .as_str()
            .ok_or_else(|| Error::invalid_document(format!("non-string path key {path_key:?}")))?;
        let Value::Mapping(mut item) = path_item else {
            return Err(Error::invalid_document(format!(
                "path item '{path}' is not a mapping"
            )));
        };

        let shared_parameters = match item.remove("parameters") {
            Some(Value::Sequence(params)) => params,
            _ => Vec::new(),
        };

        for &method in HTTP_METHODS {
            let Some(operation) = item.remove(method) else {
                continue;
            };
            let Value::Mapping(mut operation) = operation else {
                return Err(Error::invalid_document(format!(
                    "operation {} {path} is not a mapping",
                    method.to_uppercase()
                )));
            };

            let info = OperationInfo::new(path, method, &operation);
            let key = flattened_path(path, method);
            tracing::debug!(
                operation = %info.label(),
                method,
                from = %path,
                to = %key,
                "flattening operation"
            );

            request::merge_parameters_and_body(ctx, &shared_parameters, &mut operation, &info)?;
            responses::wrap_ok_response(ctx, &mut operation, &info)?;

            let key = val_s(&key);
            if flattened.contains_key(&key) {
                return Err(Error::PathCollision {
                    path: key.as_str().unwrap_or_default().to_string(),
                });
            }
            let mut new_item = Mapping::new();
            new_item.insert(val_s("post"), Value::Mapping(operation));
            flattened.insert(key, Value::Mapping(new_item));
        }
    }

    Ok(flattened)
}
