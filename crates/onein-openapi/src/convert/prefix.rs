//! Path prefixing.

use serde_yaml_ng::{Mapping, Value};

use crate::error::{Error, Result};

use super::helpers::val_s;

/// Prepend `prefix` to every path key, keeping the original order.
pub fn add_prefix(paths: Mapping, prefix: &str) -> Result<Mapping> {
    tracing::info!(prefix, "adding prefix");
    paths
        .into_iter()
        .map(|(key, item)| {
            let path = key
                .as_str()
                .ok_or_else(|| Error::invalid_document(format!("non-string path key {key:?}")))?;
            Ok((val_s(&format!("{prefix}{path}")), item))
        })
        .collect::<Result<Mapping>>()
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn prefixes_every_path_in_order() {
        let paths: Mapping = serde_yaml_ng::from_str(indoc! {"
            /users: {}
            /users/{id}: {}
        "})
        .unwrap();

        let prefixed = add_prefix(paths, "/onein").unwrap();
        let keys: Vec<_> = prefixed.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["/onein/users", "/onein/users/{id}"]);
    }

    #[test]
    fn empty_prefix_is_identity() {
        let paths: Mapping = serde_yaml_ng::from_str("/a: {}").unwrap();
        let prefixed = add_prefix(paths.clone(), "").unwrap();
        assert_eq!(prefixed, paths);
    }

    #[test]
    fn non_string_key_is_rejected() {
        let paths: Mapping = serde_yaml_ng::from_str("42: {}").unwrap();
        assert!(matches!(
            add_prefix(paths, "/p"),
            Err(Error::InvalidDocument { .. })
        ));
    }
}
