//! Wrapper schema synthesis.
//!
//! The platform only accepts object-shaped bodies, so every array schema and
//! every primitive kind gets an object wrapper with a single required `_v`
//! property. [`Resolve::Wrapped`](crate::Resolve::Wrapped) hands these out in
//! place of the raw schema.

use serde_yaml_ng::Mapping;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::schema::{array_wrapper_name, Primitive, SchemaKind};

use super::helpers::{object_schema, schema_ref_value, type_schema, value_wrapper};

/// Name of the shared envelope for responses without a JSON body.
pub const COMMON_RESPONSE_SCHEMA: &str = "_commonResponse";

/// Create `_array_<Name>` for every array schema in the catalog.
pub fn create_array_wrappers(catalog: &mut Catalog) -> Result<()> {
    let arrays: Vec<String> = catalog
        .names()
        .into_iter()
        .filter(|name| {
            catalog
                .get(name)
                .is_some_and(|schema| SchemaKind::of(schema) == SchemaKind::Array)
        })
        .collect();

    for name in arrays {
        let wrapper = value_wrapper(schema_ref_value(&name));
        catalog.insert_synthesized(array_wrapper_name(&name), wrapper)?;
    }
    Ok(())
}

/// Create one `_primitive_<kind>` wrapper per primitive kind.
pub fn create_primitive_wrappers(catalog: &mut Catalog) -> Result<()> {
    for primitive in Primitive::ALL {
        catalog.insert_synthesized(
            primitive.wrapper_name(),
            value_wrapper(type_schema(primitive.as_str())),
        )?;
    }
    Ok(())
}

/// Create the shared `_commonResponse` envelope holding only the common fields.
pub fn create_common_response(catalog: &mut Catalog, common_response: &Mapping) -> Result<()> {
    catalog.insert_synthesized(
        COMMON_RESPONSE_SCHEMA.to_string(),
        object_schema(common_response.clone(), Vec::new()),
    )
}
