//! Shared YAML construction and lookup helpers used across passes.

use serde_yaml_ng::{Mapping, Value};

use crate::schema::schema_ref;

/// Media type of every body the platform accepts.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Property holding the wrapped value in array/primitive wrappers.
pub const WRAPPED_VALUE_PROPERTY: &str = "_v";

/// HTTP methods flattened into POST operations, in flattening order.
///
/// Path items can also contain `summary`, `description`, `parameters`, and
/// `servers` keys; those are never treated as operations.
pub const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "head", "options", "trace", "patch",
];

/// Shorthand for `Value::String`.
pub fn val_s(s: &str) -> Value {
    Value::String(s.to_string())
}

/// `{$ref: "#/components/schemas/<name>"}`.
pub fn schema_ref_value(name: &str) -> Value {
    let mut schema = Mapping::new();
    schema.insert(val_s("$ref"), val_s(&schema_ref(name)));
    Value::Mapping(schema)
}

/// `{type: <ty>}`.
pub fn type_schema(ty: &str) -> Value {
    let mut schema = Mapping::new();
    schema.insert(val_s("type"), val_s(ty));
    Value::Mapping(schema)
}

/// `{type: object, properties, required}`; `required` is omitted when empty.
pub fn object_schema(properties: Mapping, required: Vec<Value>) -> Value {
    let mut schema = Mapping::new();
    schema.insert(val_s("type"), val_s("object"));
    schema.insert(val_s("properties"), Value::Mapping(properties));
    if !required.is_empty() {
        schema.insert(val_s("required"), Value::Sequence(required));
    }
    Value::Mapping(schema)
}

/// Object with the single required property `_v` holding `inner`.
pub fn value_wrapper(inner: Value) -> Value {
    let mut properties = Mapping::new();
    properties.insert(val_s(WRAPPED_VALUE_PROPERTY), inner);
    object_schema(properties, vec![val_s(WRAPPED_VALUE_PROPERTY)])
}

/// Build `content` object for `application/json` with a schema `$ref`.
pub fn json_content_with_schema_ref(name: &str) -> Value {
    let mut media_type = Mapping::new();
    media_type.insert(val_s("schema"), schema_ref_value(name));

    let mut content = Mapping::new();
    content.insert(val_s(JSON_MEDIA_TYPE), Value::Mapping(media_type));

    Value::Mapping(content)
}

/// Schema of the `application/json` media type under a `content` map.
pub fn json_schema(content: &Value) -> Option<&Value> {
    content.get(JSON_MEDIA_TYPE)?.get("schema")
}

/// The `properties` mapping of a schema, if any.
pub fn properties(schema: &Value) -> Option<&Mapping> {
    schema.get("properties").and_then(Value::as_mapping)
}

/// The `required` names of a schema (empty when absent).
pub fn required(schema: &Value) -> &[Value] {
    schema
        .get("required")
        .and_then(Value::as_sequence)
        .map_or(&[][..], Vec::as_slice)
}

/// Append `names` to `into`, skipping ones already present.
pub fn add_required<'a>(into: &mut Vec<Value>, names: impl IntoIterator<Item = &'a Value>) {
    for name in names {
        if !into.contains(name) {
            into.push(name.clone());
        }
    }
}

/// Find a response by status code.
///
/// YAML allows both `'200':` (string) and `200:` (integer) keys.
pub fn response_mut<'a>(responses: &'a mut Mapping, status: u16) -> Option<&'a mut Value> {
    let as_string = val_s(&status.to_string());
    let key = if responses.contains_key(&as_string) {
        as_string
    } else {
        Value::Number(status.into())
    };
    responses.get_mut(&key)
}
