//! Typed error enum for the `onein-openapi` library API.
//!
//! Library consumers can match on specific variants. The CLI (`main.rs`)
//! converts these to `anyhow::Error` at the binary boundary for richer
//! context messages.
//!
//! Every variant aborts the whole conversion: no partial output is written.

/// Errors produced by `onein-openapi` library operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// File I/O failure (reading the document or config, writing the output).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing failure.
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization failure while writing the output document.
    #[error("failed to serialize output document: {0}")]
    Json(#[from] serde_json::Error),

    /// The document does not have the shape of an `OpenAPI` object.
    #[error("invalid OpenAPI document: {reason}")]
    InvalidDocument {
        /// What was wrong with the document structure.
        reason: String,
    },

    /// A `$ref` names a schema that is not in `components.schemas`.
    #[error("ref target not found: {reference}")]
    BrokenReference {
        /// The unresolved reference string.
        reference: String,
    },

    /// A `$ref` is not of the form `#/components/schemas/<name>`.
    ///
    /// External documents and other component sections are not supported.
    #[error("unsupported non-local ref: {reference}")]
    UnsupportedReferenceForm {
        /// The rejected reference string.
        reference: String,
    },

    /// An array's items resolve to another array.
    ///
    /// The onein platform cannot represent arrays of arrays.
    #[error("unsupported nested array type: [{schema}]")]
    UnsupportedNestedArray {
        /// Schema path of the offending array (`Schema` or `Schema.property`).
        schema: String,
    },

    /// An operation declares no `200` response.
    #[error("200 response not found for operation: {operation}")]
    MissingOkResponse {
        /// Operation ID (or `METHOD path` when the operation has none).
        operation: String,
    },

    /// An `allOf`/`anyOf` composition references itself transitively.
    #[error("cyclic composition through schema '{schema}'")]
    CyclicComposition {
        /// The schema that closes the cycle.
        schema: String,
    },

    /// Schema aliases (`$ref`-only entries) refer back to themselves.
    #[error("cyclic ref chain through {reference}")]
    CyclicReference {
        /// The reference that closes the loop.
        reference: String,
    },

    /// An operation needs a synthesized schema name but has no `operationId`.
    #[error("operation {method} {path} has no operationId")]
    MissingOperationId {
        /// Original (prefixed) path of the operation.
        path: String,
        /// HTTP method of the operation.
        method: String,
    },

    /// A synthesized schema name is already taken in `components.schemas`.
    #[error("synthesized schema name '{name}' already exists in components.schemas")]
    SchemaNameCollision {
        /// The colliding schema name.
        name: String,
    },

    /// Two operations flatten onto the same path key.
    #[error("flattened path '{path}' produced by more than one operation")]
    PathCollision {
        /// The duplicated flattened path.
        path: String,
    },

    /// A parameter object could not be decoded.
    #[error("invalid parameter in operation {operation}: {source}")]
    InvalidParameter {
        /// Operation ID (or `METHOD path`) owning the parameter.
        operation: String,
        /// Underlying decode error.
        source: serde_yaml_ng::Error,
    },
}

/// Convenience alias used throughout the library's public API.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_document(reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            reason: reason.into(),
        }
    }
}
