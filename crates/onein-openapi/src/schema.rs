//! Tagged view over raw schema values.
//!
//! Schemas stay as [`serde_yaml_ng::Value`] so that every keyword we do not
//! rewrite (`format`, `enum`, `example`, ...) survives untouched. Passes
//! never poke at `type`/`$ref`/`allOf` directly; they classify a value with
//! [`SchemaKind::of`] and match on the result.

use serde_yaml_ng::Value;

use crate::error::{Error, Result};

/// Prefix of every supported `$ref` string.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Build the `$ref` string for a catalog entry.
#[must_use]
pub fn schema_ref(name: &str) -> String {
    format!("{SCHEMA_REF_PREFIX}{name}")
}

/// Extract the catalog name from a `$ref` string.
///
/// # Errors
///
/// Returns [`Error::UnsupportedReferenceForm`] for anything other than
/// `#/components/schemas/<name>`.
pub fn schema_name(reference: &str) -> Result<&str> {
    match reference.strip_prefix(SCHEMA_REF_PREFIX) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(Error::UnsupportedReferenceForm {
            reference: reference.to_string(),
        }),
    }
}

/// The four JSON primitive types, each with one shared wrapper schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// `type: integer`
    Integer,
    /// `type: number`
    Number,
    /// `type: string`
    String,
    /// `type: boolean`
    Boolean,
}

impl Primitive {
    /// All kinds, in wrapper creation order.
    pub const ALL: [Self; 4] = [Self::Integer, Self::Number, Self::String, Self::Boolean];

    /// The `type` keyword value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
        }
    }

    /// Name of the shared wrapper schema, e.g. `_primitive_string`.
    #[must_use]
    pub fn wrapper_name(self) -> String {
        format!("_primitive_{}", self.as_str())
    }

    fn parse(ty: &str) -> Option<Self> {
        match ty {
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }
}

/// Name of the wrapper synthesized for the array schema `name`.
#[must_use]
pub fn array_wrapper_name(name: &str) -> String {
    format!("_array_{name}")
}

/// Structural classification of a schema value.
///
/// Precedence: `$ref`, then non-empty `allOf`, then non-empty `anyOf`, then
/// `type`. A schema without a recognizable `type` is [`SchemaKind::Untyped`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaKind<'a> {
    /// `{$ref: ...}` (the raw reference string).
    Reference(&'a str),
    /// `type: object`
    Object,
    /// `type: array`
    Array,
    /// One of the primitive types.
    Primitive(Primitive),
    /// `allOf: [...]` (the branches).
    AllOf(&'a [Value]),
    /// `anyOf: [...]` (the branches).
    AnyOf(&'a [Value]),
    /// No type, an unknown type, or not a mapping at all.
    Untyped,
}

impl<'a> SchemaKind<'a> {
    /// Classify a schema value.
    #[must_use]
    pub fn of(schema: &'a Value) -> Self {
        if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
            return Self::Reference(reference);
        }
        if let Some(branches) = non_empty_sequence(schema, "allOf") {
            return Self::AllOf(branches);
        }
        if let Some(branches) = non_empty_sequence(schema, "anyOf") {
            return Self::AnyOf(branches);
        }
        match schema.get("type").and_then(Value::as_str) {
            Some("object") => Self::Object,
            Some("array") => Self::Array,
            Some(other) => Primitive::parse(other).map_or(Self::Untyped, Self::Primitive),
            None => Self::Untyped,
        }
    }
}

fn non_empty_sequence<'a>(schema: &'a Value, key: &str) -> Option<&'a [Value]> {
    schema
        .get(key)
        .and_then(Value::as_sequence)
        .filter(|seq| !seq.is_empty())
        .map(Vec::as_slice)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    fn kind_of(yaml: &str) -> String {
        let value: Value = serde_yaml_ng::from_str(yaml).unwrap();
        format!("{:?}", SchemaKind::of(&value))
    }

    #[test]
    fn classifies_by_type() {
        assert_eq!(kind_of("type: object"), "Object");
        assert_eq!(kind_of("type: array\nitems: {type: string}"), "Array");
        assert_eq!(kind_of("type: integer"), "Primitive(Integer)");
        assert_eq!(kind_of("description: free form"), "Untyped");
        assert_eq!(kind_of("type: 'null'"), "Untyped");
    }

    #[test]
    fn reference_wins_over_siblings() {
        let yaml = indoc! {r##"
            $ref: "#/components/schemas/User"
            description: the owner
            type: object
        "##};
        assert!(kind_of(yaml).starts_with("Reference"));
    }

    #[test]
    fn composition_wins_over_type() {
        let value: Value = serde_yaml_ng::from_str(indoc! {"
            type: object
            allOf:
              - type: object
        "})
        .unwrap();
        assert!(matches!(SchemaKind::of(&value), SchemaKind::AllOf(b) if b.len() == 1));
    }

    #[test]
    fn empty_composition_falls_back_to_type() {
        assert_eq!(kind_of("anyOf: []\ntype: string"), "Primitive(String)");
    }

    #[test]
    fn schema_name_accepts_only_local_schema_refs() {
        assert_eq!(schema_name("#/components/schemas/Pet").unwrap(), "Pet");
        assert!(matches!(
            schema_name("#/components/parameters/Id"),
            Err(Error::UnsupportedReferenceForm { .. })
        ));
        assert!(matches!(
            schema_name("https://example.com/schemas.yaml#/Pet"),
            Err(Error::UnsupportedReferenceForm { .. })
        ));
        assert!(schema_name("#/components/schemas/").is_err());
    }

    #[test]
    fn wrapper_names() {
        assert_eq!(Primitive::Boolean.wrapper_name(), "_primitive_boolean");
        assert_eq!(array_wrapper_name("Tags"), "_array_Tags");
        assert_eq!(schema_ref("Tags"), "#/components/schemas/Tags");
    }
}
