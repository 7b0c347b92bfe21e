//! Parameter and request body merging.
//!
//! The platform has no path, query, header or cookie parameters: everything
//! travels in one JSON body. Each parameter becomes a `_<in>_<name>`
//! property of a synthesized `_req_<operationId>` schema, merged with the
//! operation's original JSON body.

use serde_yaml_ng::{Mapping, Value};

use crate::catalog::Resolve;
use crate::error::{Error, Result};
use crate::parameter::Parameter;
use crate::schema::{schema_ref, SchemaKind};

use super::arrays::guard_schema;
use super::helpers::{
    add_required, json_content_with_schema_ref, json_schema, object_schema, properties, required,
    type_schema, val_s, value_wrapper,
};
use super::operations::OperationInfo;
use super::Context;

/// Name of the merged request schema for an operation.
#[must_use]
pub fn request_schema_name(operation_id: &str) -> String {
    format!("_req_{operation_id}")
}

/// Merge config-wide, path-level and operation-level parameters plus the
/// JSON request body into `_req_<operationId>`.
///
/// No-op when the operation has neither parameters nor a request body.
pub fn merge_parameters_and_body(
    ctx: &mut Context<'_>,
    path_parameters: &[Value],
    operation: &mut Mapping,
    info: &OperationInfo,
) -> Result<()> {
    let label = info.label();
    let operation_parameters = match operation.get("parameters") {
        Some(Value::Sequence(params)) => params.as_slice(),
        _ => &[][..],
    };

    let mut parameters = ctx.config.common_parameters.clone();
    for raw in path_parameters.iter().chain(operation_parameters) {
        parameters.push(Parameter::from_value(raw, &label)?);
    }

    let Some(body) = operation.get("requestBody") else {
        if parameters.is_empty() {
            return Ok(());
        }
        return replace_request(ctx, operation, info, parameters_schema(&parameters), None);
    };
    if let Some(reference) = body.get("$ref").and_then(Value::as_str) {
        return Err(Error::UnsupportedReferenceForm {
            reference: reference.to_string(),
        });
    }
    tracing::debug!(operation = %label, "merging parameters and request body");

    let synthesized = parameters_schema(&parameters);
    let merged = match body.get("content").and_then(json_schema) {
        Some(original) => {
            let original = object_shape(ctx, original)?;
            merge_body(original, synthesized)
        }
        None => synthesized,
    };
    let description = body.get("description").cloned();
    replace_request(ctx, operation, info, merged, description)
}

/// `{type: object}` with one property per parameter.
fn parameters_schema(parameters: &[Parameter]) -> Value {
    let mut props = Mapping::new();
    let mut required_names = Vec::new();

    for parameter in parameters {
        let name = parameter.body_property_name();
        let mut schema = parameter
            .schema
            .clone()
            .unwrap_or_else(|| type_schema("string"));
        if let (Some(description), Some(map)) = (&parameter.description, schema.as_mapping_mut()) {
            map.insert(val_s("description"), val_s(description));
        }
        if parameter.required {
            add_required(&mut required_names, &[val_s(&name)]);
        }
        props.insert(val_s(&name), schema);
    }

    object_schema(props, required_names)
}

/// Resolve the original body schema to something with object shape.
///
/// References go through [`Resolve::Wrapped`]. Inline primitives use the
/// shared primitive wrapper and inline arrays get wrapped in place.
fn object_shape(ctx: &Context<'_>, schema: &Value) -> Result<Value> {
    let resolved = ctx.catalog.deref(schema, Resolve::Wrapped)?;
    match SchemaKind::of(resolved) {
        SchemaKind::Primitive(primitive) => {
            let wrapper = schema_ref(&primitive.wrapper_name());
            Ok(ctx.catalog.resolve(&wrapper, Resolve::Raw)?.clone())
        }
        SchemaKind::Array => Ok(value_wrapper(resolved.clone())),
        SchemaKind::Object
        | SchemaKind::Reference(_)
        | SchemaKind::AllOf(_)
        | SchemaKind::AnyOf(_)
        | SchemaKind::Untyped => Ok(resolved.clone()),
    }
}

/// Combine the original body (object-shaped) with the parameter schema.
///
/// Parameter properties win over body properties of the same name.
fn merge_body(original: Value, synthesized: Value) -> Value {
    match SchemaKind::of(&original) {
        SchemaKind::AnyOf(_) => {
            let mut schema = Mapping::new();
            schema.insert(
                val_s("anyOf"),
                Value::Sequence(vec![original, synthesized]),
            );
            Value::Mapping(schema)
        }
        SchemaKind::AllOf(branches) => {
            let mut branches = branches.to_vec();
            branches.push(synthesized);
            let mut schema = Mapping::new();
            schema.insert(val_s("allOf"), Value::Sequence(branches));
            Value::Mapping(schema)
        }
        SchemaKind::Object
        | SchemaKind::Array
        | SchemaKind::Primitive(_)
        | SchemaKind::Reference(_)
        | SchemaKind::Untyped => {
            let mut props = properties(&synthesized).cloned().unwrap_or_default();
            if let Some(original_props) = properties(&original) {
                for (key, value) in original_props {
                    if !props.contains_key(key) {
                        props.insert(key.clone(), value.clone());
                    }
                }
            }
            let mut required_names = required(&synthesized).to_vec();
            add_required(&mut required_names, required(&original));
            object_schema(props, required_names)
        }
    }
}

fn replace_request(
    ctx: &mut Context<'_>,
    operation: &mut Mapping,
    info: &OperationInfo,
    mut merged: Value,
    description: Option<Value>,
) -> Result<()> {
    let name = request_schema_name(info.require_id()?);
    guard_schema(&ctx.catalog, &name, &mut merged)?;

    let mut body = Mapping::new();
    if let Some(description) = description {
        body.insert(val_s("description"), description);
    }
    body.insert(val_s("content"), json_content_with_schema_ref(&name));

    operation.shift_remove("parameters");
    operation.insert(val_s("requestBody"), Value::Mapping(body));
    ctx.catalog.insert_synthesized(name, merged)
}
