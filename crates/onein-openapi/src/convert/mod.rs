//! The onein conversion pipeline.
//!
//! Rewrites a parsed `OpenAPI` document into the dialect the onein platform
//! accepts: POST-only flattened paths, one object-shaped JSON request body
//! per operation, every response wrapped in an envelope, and no
//! compositions left in `components.schemas`.
//!
//! Passes are grouped into modules:
//! - [`prefix`]: path prefixing
//! - [`wrappers`]: `_array_*`, `_primitive_*` and `_commonResponse` synthesis
//! - [`arrays`]: primitive array items → wrappers, nested arrays rejected
//! - [`operations`]: `(path, method)` → `<path>/<method>` POST flattening
//! - [`request`]: parameters + request body → `_req_<operationId>`
//! - [`responses`]: `200` body → `_res_<operationId>` envelope
//! - [`compose`]: `allOf`/`anyOf` → plain objects
//! - [`descriptions`]: description length limit

mod arrays;
mod compose;
mod descriptions;
mod helpers;
mod operations;
mod prefix;
mod request;
mod responses;
mod wrappers;

use serde_yaml_ng::{Mapping, Value};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{Error, Result};

pub use descriptions::MAX_DESCRIPTION_LEN;
pub use operations::flattened_path;
pub use responses::JSON_BODY_PROPERTY;
pub use wrappers::COMMON_RESPONSE_SCHEMA;

/// State threaded through every pass of one conversion run.
///
/// The catalog is owned here and only ever borrowed by the passes, so a
/// schema synthesized by one pass is visible to all later ones.
#[derive(Debug)]
pub(crate) struct Context<'c> {
    pub(crate) catalog: Catalog,
    pub(crate) config: &'c Config,
}

impl<'c> Context<'c> {
    pub(crate) fn new(catalog: Catalog, config: &'c Config) -> Self {
        Self { catalog, config }
    }

    /// Create every wrapper schema later passes may resolve to.
    pub(crate) fn synthesize_wrappers(&mut self) -> Result<()> {
        tracing::info!("creating wrapper schemas");
        wrappers::create_array_wrappers(&mut self.catalog)?;
        wrappers::create_primitive_wrappers(&mut self.catalog)?;
        wrappers::create_common_response(&mut self.catalog, &self.config.common_response)
    }
}

/// Convert an `OpenAPI` YAML (or JSON) document and return pretty JSON.
///
/// # Errors
///
/// Returns an error if the input cannot be parsed, any conversion pass
/// fails (see [`transform`]), or the result cannot be serialized.
pub fn convert(input_yaml: &str, config: &Config) -> Result<String> {
    let doc: Value = serde_yaml_ng::from_str(input_yaml)?;
    let doc = transform(doc, config)?;
    serde_json::to_string_pretty(&doc).map_err(Error::from)
}

/// Apply the conversion pipeline to a parsed document.
///
/// # Phase Ordering
///
/// - **Prefix** runs first so flattened keys and error messages carry the
///   final path.
/// - **Wrapper synthesis** must precede every [`Resolve::Wrapped`] lookup
///   (request merging, composition flattening).
/// - **Nested-array guard** runs over the original catalog before any
///   operation is touched; synthesized request/response schemas are
///   guarded as they are created.
/// - **Operation flattening** merges parameters and wraps responses per
///   operation, adding `_req_*`/`_res_*` schemas.
/// - **Composition flattening** runs after all schemas exist, so merged
///   request bodies (`anyOf`/`allOf`) are flattened too. Each flattened
///   result is guarded again, as its properties were hidden in branches.
/// - **Description truncation** runs last, over final schemas.
///
/// Other top-level sections (`info`, `servers`, `tags`, other `components`)
/// pass through unchanged. The output is not valid input for a second run:
/// synthesized names assume an unconverted document.
///
/// [`Resolve::Wrapped`]: crate::Resolve::Wrapped
///
/// # Errors
///
/// Returns the first failing pass's error; see [`Error`] for the variants.
pub fn transform(mut doc: Value, config: &Config) -> Result<Value> {
    let root = doc
        .as_mapping_mut()
        .ok_or_else(|| Error::invalid_document("document root is not a mapping"))?;

    let paths = take_mapping(root, "paths")?;
    let components = take_mapping(root, "components")?;
    let mut components = components;
    let schemas = take_mapping(&mut components, "schemas")?;

    let mut ctx = Context::new(Catalog::new(schemas), config);

    let paths = prefix::add_prefix(paths, &config.prefix)?;
    ctx.synthesize_wrappers()?;
    arrays::guard_catalog(&mut ctx.catalog)?;
    let paths = operations::flatten_operations(&mut ctx, paths)?;
    compose::flatten_compositions(&mut ctx.catalog)?;
    descriptions::truncate_descriptions(&mut ctx.catalog);

    components.insert(
        helpers::val_s("schemas"),
        Value::Mapping(ctx.catalog.into_inner()),
    );
    root.insert(helpers::val_s("components"), Value::Mapping(components));
    root.insert(helpers::val_s("paths"), Value::Mapping(paths));
    Ok(doc)
}

/// Detach `key` from `map` as a mapping; absent or `null` gives an empty one.
///
/// The key keeps its position: it is re-inserted by the caller.
fn take_mapping(map: &mut Mapping, key: &str) -> Result<Mapping> {
    match map.get_mut(key).map(std::mem::take) {
        None | Some(Value::Null) => Ok(Mapping::new()),
        Some(Value::Mapping(inner)) => Ok(inner),
        Some(_) => Err(Error::invalid_document(format!("'{key}' is not a mapping"))),
    }
}
