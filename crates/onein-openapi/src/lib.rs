#![allow(clippy::doc_markdown)] // README uses "OpenAPI" proper noun throughout
#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! ## API Reference

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod catalog;
mod config;
mod convert;
mod error;
mod invoke;
mod parameter;
mod schema;

pub use catalog::{Catalog, Resolve};
pub use config::{Config, DEFAULT_PREFIX};
pub use convert::{
    convert, flattened_path, transform, COMMON_RESPONSE_SCHEMA, JSON_BODY_PROPERTY,
    MAX_DESCRIPTION_LEN,
};
pub use error::{Error, Result};
pub use invoke::{
    read_document, run, write_output, Invocation, ResolvedPaths, DEFAULT_CONFIG_FILE,
    DEFAULT_INPUT_FILE, OUTPUT_SUFFIX,
};
pub use parameter::{Parameter, ParameterLocation};
pub use schema::{schema_name, schema_ref, Primitive, SchemaKind, SCHEMA_REF_PREFIX};
