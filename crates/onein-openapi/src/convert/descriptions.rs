//! Description length limit.

use serde_yaml_ng::Value;

use crate::catalog::Catalog;

/// Longest description the platform accepts, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 64;

const ELLIPSIS: &str = "...";

/// Clip descriptions of every schema and of its direct properties.
///
/// Only one level deep: properties of nested inline objects keep their
/// descriptions as they are.
pub fn truncate_descriptions(catalog: &mut Catalog) {
    tracing::info!(max = MAX_DESCRIPTION_LEN, "cutting long descriptions");
    for schema in catalog.values_mut() {
        truncate_description(schema);
        if let Some(properties) = schema
            .get_mut("properties")
            .and_then(Value::as_mapping_mut)
        {
            for property in properties.values_mut() {
                truncate_description(property);
            }
        }
    }
}

fn truncate_description(schema: &mut Value) {
    let Some(Value::String(description)) = schema.get_mut("description") else {
        return;
    };
    if description.chars().count() <= MAX_DESCRIPTION_LEN {
        return;
    }
    let mut clipped: String = description
        .chars()
        .take(MAX_DESCRIPTION_LEN - ELLIPSIS.len())
        .collect();
    clipped.push_str(ELLIPSIS);
    *description = clipped;
}

#[cfg(test)]
mod tests {
    use indoc::formatdoc;

    use super::*;
    use crate::catalog::catalog_from_yaml;

    #[test]
    fn long_descriptions_are_clipped_with_ellipsis() {
        let long = "x".repeat(100);
        let exact = "y".repeat(MAX_DESCRIPTION_LEN);
        let mut catalog = catalog_from_yaml(&formatdoc! {"
            Thing:
              description: {long}
              type: object
              properties:
                a:
                  type: string
                  description: {long}
                b:
                  type: string
                  description: {exact}
                c:
                  type: object
                  properties:
                    deep:
                      type: string
                      description: {long}
            ",
            long = long,
            exact = exact,
        });
        truncate_descriptions(&mut catalog);

        let thing = catalog.get("Thing").unwrap();
        let clipped = thing["description"].as_str().unwrap();
        assert_eq!(clipped.chars().count(), MAX_DESCRIPTION_LEN);
        assert!(clipped.ends_with("..."));
        assert_eq!(clipped, format!("{}...", "x".repeat(61)));

        let a = thing["properties"]["a"]["description"].as_str().unwrap();
        assert_eq!(a.chars().count(), MAX_DESCRIPTION_LEN);

        let b = thing["properties"]["b"]["description"].as_str().unwrap();
        assert_eq!(b, exact, "descriptions at the limit are kept");
        assert!(!b.ends_with("..."));

        let deep = thing["properties"]["c"]["properties"]["deep"]["description"]
            .as_str()
            .unwrap();
        assert_eq!(deep, long, "only one level deep");
    }

    #[test]
    fn counts_characters_not_bytes() {
        let wide = "é".repeat(70);
        let mut catalog = catalog_from_yaml(&formatdoc! {"
            Accent:
              type: string
              description: {wide}
            ",
            wide = wide,
        });
        truncate_descriptions(&mut catalog);

        let clipped = catalog.get("Accent").unwrap()["description"]
            .as_str()
            .unwrap();
        assert_eq!(clipped.chars().count(), MAX_DESCRIPTION_LEN);
        assert!(clipped.starts_with('é'));
    }

    #[test]
    fn non_string_descriptions_are_ignored() {
        let mut catalog = catalog_from_yaml("Odd: {type: object, description: 12}");
        truncate_descriptions(&mut catalog);
        assert_eq!(
            catalog.get("Odd").unwrap()["description"].as_u64(),
            Some(12)
        );
    }
}
