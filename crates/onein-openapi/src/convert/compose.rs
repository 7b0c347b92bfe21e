//! `allOf` / `anyOf` flattening.
//!
//! The platform has no composition keywords. Each composed catalog entry
//! is replaced by a plain object holding the union of its branches'
//! properties. `allOf` also unions `required`; `anyOf` does not, since a
//! property required by one alternative is not required by all of them.

use std::borrow::Cow;

use serde_yaml_ng::{Mapping, Value};

use crate::catalog::{Catalog, Resolve};
use crate::error::{Error, Result};
use crate::schema::{schema_name, SchemaKind};

use super::arrays::guard_schema;
use super::helpers::{add_required, object_schema, properties, required, val_s};

/// Flatten every composed schema in the catalog, in document order.
///
/// Each flattened result goes through the nested-array guard, since its
/// properties come from branches the guard never saw as objects.
pub fn flatten_compositions(catalog: &mut Catalog) -> Result<()> {
    tracing::info!("flattening allOf/anyOf schemas");
    for name in catalog.names() {
        let flattened = {
            let Some(schema) = catalog.get(&name) else {
                continue;
            };
            let mut visiting = vec![name.clone()];
            let mut flat = match flatten_schema(catalog, schema, &mut visiting)? {
                Cow::Owned(flat) => flat,
                Cow::Borrowed(_) => continue,
            };
            guard_schema(catalog, &name, &mut flat)?;
            flat
        };
        tracing::debug!(schema = %name, "flattened composition");
        catalog.replace(&name, flattened);
    }
    Ok(())
}

/// Flatten one schema. Non-compositions come back borrowed and unchanged.
///
/// `visiting` holds the names of the referenced schemas on the current
/// recursion path.
pub fn flatten_schema<'a>(
    catalog: &'a Catalog,
    schema: &'a Value,
    visiting: &mut Vec<String>,
) -> Result<Cow<'a, Value>> {
    let (branches, union_required) = match SchemaKind::of(schema) {
        SchemaKind::AllOf(branches) => (branches, true),
        SchemaKind::AnyOf(branches) => (branches, false),
        SchemaKind::Object
        | SchemaKind::Array
        | SchemaKind::Primitive(_)
        | SchemaKind::Reference(_)
        | SchemaKind::Untyped => return Ok(Cow::Borrowed(schema)),
    };

    let mut merged_properties = Mapping::new();
    let mut required_names = Vec::new();

    for branch in branches {
        let referenced = match SchemaKind::of(branch) {
            SchemaKind::Reference(reference) => Some(schema_name(reference)?.to_string()),
            _ => None,
        };
        if let Some(name) = &referenced {
            if visiting.contains(name) {
                return Err(Error::CyclicComposition {
                    schema: name.clone(),
                });
            }
            visiting.push(name.clone());
        }

        let resolved = catalog.deref(branch, Resolve::Wrapped)?;
        let flat = flatten_schema(catalog, resolved, visiting)?;

        if referenced.is_some() {
            visiting.pop();
        }

        if let Some(props) = properties(&flat) {
            for (key, value) in props {
                merged_properties.insert(key.clone(), value.clone());
            }
        }
        if union_required {
            add_required(&mut required_names, required(&flat));
        }
    }

    let mut flattened = object_schema(merged_properties, required_names);
    if let (Some(description), Some(map)) = (schema.get("description"), flattened.as_mapping_mut())
    {
        map.insert(val_s("description"), description.clone());
    }
    Ok(Cow::Owned(flattened))
}
