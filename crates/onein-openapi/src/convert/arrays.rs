//! Nested-array guard.
//!
//! Primitive array items are swapped for references to the primitive
//! wrappers; arrays of arrays are rejected outright.

use serde_yaml_ng::Value;

use crate::catalog::{Catalog, Resolve};
use crate::error::{Error, Result};
use crate::schema::SchemaKind;

use super::helpers::{schema_ref_value, val_s};

/// Run the guard over every schema in the catalog.
pub fn guard_catalog(catalog: &mut Catalog) -> Result<()> {
    tracing::info!("wrapping primitive array items");
    for name in catalog.names() {
        let Some(mut schema) = catalog.get(&name).cloned() else {
            continue;
        };
        if guard_schema(catalog, &name, &mut schema)? {
            catalog.replace(&name, schema);
        }
    }
    Ok(())
}

/// Guard one named schema. Returns whether anything was rewritten.
///
/// Object schemas have each inline array property checked (referenced
/// properties are checked when the catalog loop reaches their target);
/// array schemas are checked themselves. Everything else passes through.
pub fn guard_schema(catalog: &Catalog, name: &str, schema: &mut Value) -> Result<bool> {
    match SchemaKind::of(schema) {
        SchemaKind::Object => {
            let Some(properties) = schema
                .get_mut("properties")
                .and_then(Value::as_mapping_mut)
            else {
                return Ok(false);
            };
            let mut changed = false;
            for (key, property) in properties.iter_mut() {
                if matches!(SchemaKind::of(property), SchemaKind::Reference(_)) {
                    continue;
                }
                let location = format!("{name}.{}", key.as_str().unwrap_or_default());
                changed |= guard_array(catalog, &location, property)?;
            }
            Ok(changed)
        }
        SchemaKind::Array => guard_array(catalog, name, schema),
        SchemaKind::Reference(_)
        | SchemaKind::Primitive(_)
        | SchemaKind::AllOf(_)
        | SchemaKind::AnyOf(_)
        | SchemaKind::Untyped => Ok(false),
    }
}

fn guard_array(catalog: &Catalog, location: &str, schema: &mut Value) -> Result<bool> {
    if SchemaKind::of(schema) != SchemaKind::Array {
        return Ok(false);
    }
    let Some(items) = schema.get("items") else {
        return Ok(false);
    };

    let replacement = match SchemaKind::of(catalog.deref(items, Resolve::Raw)?) {
        SchemaKind::Array => {
            return Err(Error::UnsupportedNestedArray {
                schema: location.to_string(),
            })
        }
        SchemaKind::Primitive(primitive) => schema_ref_value(&primitive.wrapper_name()),
        SchemaKind::Object
        | SchemaKind::Reference(_)
        | SchemaKind::AllOf(_)
        | SchemaKind::AnyOf(_)
        | SchemaKind::Untyped => return Ok(false),
    };

    if let Some(map) = schema.as_mapping_mut() {
        map.insert(val_s("items"), replacement);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::catalog_from_yaml;

    #[test]
    fn primitive_items_point_at_primitive_wrappers() {
        let mut catalog = catalog_from_yaml(indoc! {r##"
            Names:
              type: array
              items: {type: string}
            Page:
              type: object
              properties:
                ids:
                  type: array
                  items:
                    $ref: "#/components/schemas/Id"
                total:
                  type: integer
            Id:
              type: integer
              format: int64
        "##});
        guard_catalog(&mut catalog).unwrap();

        assert_eq!(
            catalog.get("Names").unwrap()["items"]["$ref"].as_str(),
            Some("#/components/schemas/_primitive_string")
        );
        assert_eq!(
            catalog.get("Page").unwrap()["properties"]["ids"]["items"]["$ref"].as_str(),
            Some("#/components/schemas/_primitive_integer")
        );
        assert_eq!(
            catalog.get("Page").unwrap()["properties"]["total"]["type"].as_str(),
            Some("integer")
        );
    }

    #[test]
    fn object_items_are_untouched() {
        let yaml = indoc! {r##"
            Users:
              type: array
              items:
                $ref: "#/components/schemas/User"
            User:
              type: object
              properties:
                pets:
                  type: array
                  items:
                    type: object
                    properties:
                      name: {type: string}
        "##};
        let mut catalog = catalog_from_yaml(yaml);
        guard_catalog(&mut catalog).unwrap();
        assert_eq!(catalog, catalog_from_yaml(yaml));
    }

    #[test]
    fn referenced_properties_are_skipped() {
        let yaml = indoc! {r##"
            Holder:
              type: object
              properties:
                tags:
                  $ref: "#/components/schemas/Tags"
            Tags:
              type: array
              items:
                type: object
        "##};
        let mut catalog = catalog_from_yaml(yaml);
        guard_catalog(&mut catalog).unwrap();
        assert_eq!(catalog, catalog_from_yaml(yaml));
    }

    #[test]
    fn inline_nested_array_is_rejected() {
        let mut catalog = catalog_from_yaml(indoc! {"
            Matrix:
              type: object
              properties:
                rows:
                  type: array
                  items:
                    type: array
                    items: {type: number}
        "});
        let err = guard_catalog(&mut catalog).unwrap_err();
        assert!(matches!(err, Error::UnsupportedNestedArray { schema } if schema == "Matrix.rows"));
    }

    #[test]
    fn referenced_nested_array_is_rejected() {
        let mut catalog = catalog_from_yaml(indoc! {r##"
            Grid:
              type: array
              items:
                $ref: "#/components/schemas/Row"
            Row:
              type: array
              items: {type: string}
        "##});
        let err = guard_catalog(&mut catalog).unwrap_err();
        assert!(matches!(err, Error::UnsupportedNestedArray { schema } if schema == "Grid"));
    }

    #[test]
    fn broken_item_reference_fails() {
        let mut catalog = catalog_from_yaml(indoc! {r##"
            Things:
              type: array
              items:
                $ref: "#/components/schemas/Missing"
        "##});
        assert!(matches!(
            guard_catalog(&mut catalog),
            Err(Error::BrokenReference { .. })
        ));
    }
}
