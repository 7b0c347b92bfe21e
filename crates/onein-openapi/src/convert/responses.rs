//! Response envelopes.
//!
//! - `200` with a JSON schema → `_res_<operationId>` envelope holding the
//!   common response fields plus `_jsonBody`
//! - `200` without one → the shared `_commonResponse` envelope
//! - no `200` at all → error

use serde_yaml_ng::{Mapping, Value};

use crate::error::{Error, Result};

use super::arrays::guard_schema;
use super::helpers::{object_schema, response_mut, schema_ref_value, val_s, JSON_MEDIA_TYPE};
use super::operations::OperationInfo;
use super::wrappers::COMMON_RESPONSE_SCHEMA;
use super::Context;

/// Envelope property holding the original response schema.
pub const JSON_BODY_PROPERTY: &str = "_jsonBody";

/// Name of the response envelope for an operation.
#[must_use]
pub fn response_schema_name(operation_id: &str) -> String {
    format!("_res_{operation_id}")
}

/// Wrap the `200` response body of `operation` in an envelope.
pub fn wrap_ok_response(
    ctx: &mut Context<'_>,
    operation: &mut Mapping,
    info: &OperationInfo,
) -> Result<()> {
    tracing::debug!(operation = %info.label(), "wrapping response body");
    let missing = || Error::MissingOkResponse {
        operation: info.label(),
    };

    let ok = operation
        .get_mut("responses")
        .and_then(Value::as_mapping_mut)
        .and_then(|responses| response_mut(responses, 200))
        .ok_or_else(missing)?;
    if let Some(reference) = ok.get("$ref").and_then(Value::as_str) {
        return Err(Error::UnsupportedReferenceForm {
            reference: reference.to_string(),
        });
    }
    let ok = ok.as_mapping_mut().ok_or_else(missing)?;

    if !ok.get("content").is_some_and(Value::is_mapping) {
        ok.insert(val_s("content"), Value::Mapping(Mapping::new()));
    }
    let Some(Value::Mapping(content)) = ok.get_mut("content") else {
        return Err(missing());
    };

    let original = content
        .get(JSON_MEDIA_TYPE)
        .and_then(|media| media.get("schema"))
        .cloned();

    let target = match original {
        Some(schema) => {
            let name = response_schema_name(info.require_id()?);
            let mut properties = ctx.config.common_response.clone();
            properties.insert(val_s(JSON_BODY_PROPERTY), schema);
            let mut envelope = object_schema(properties, Vec::new());
            guard_schema(&ctx.catalog, &name, &mut envelope)?;
            ctx.catalog.insert_synthesized(name.clone(), envelope)?;
            name
        }
        None => COMMON_RESPONSE_SCHEMA.to_string(),
    };

    match content
        .get_mut(JSON_MEDIA_TYPE)
        .and_then(Value::as_mapping_mut)
    {
        Some(media) => {
            media.insert(val_s("schema"), schema_ref_value(&target));
        }
        None => {
            let mut media = Mapping::new();
            media.insert(val_s("schema"), schema_ref_value(&target));
            content.insert(val_s(JSON_MEDIA_TYPE), Value::Mapping(media));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Config;

    fn info(id: &str) -> OperationInfo {
        OperationInfo {
            path: "/onein/pets".to_string(),
            method: "get",
            id: Some(id.to_string()),
        }
    }

    fn wrap(config: &Config, operation: &str) -> Result<(Value, Catalog)> {
        let mut ctx = Context::new(Catalog::default(), config);
        ctx.synthesize_wrappers()?;
        let mut operation: Mapping = serde_yaml_ng::from_str(operation).unwrap();
        wrap_ok_response(&mut ctx, &mut operation, &info("listPets"))?;
        Ok((Value::Mapping(operation), ctx.catalog))
    }

    fn yaml(s: &str) -> Value {
        serde_yaml_ng::from_str(s).unwrap()
    }

    #[test]
    fn json_body_is_wrapped_in_envelope() {
        let (operation, catalog) = wrap(
            &Config::default(),
            indoc! {"
                responses:
                  '200':
                    description: OK
                    content:
                      application/json:
                        schema: {type: string}
            "},
        )
        .unwrap();

        assert_eq!(
            operation["responses"]["200"]["content"]["application/json"]["schema"],
            yaml("{$ref: '#/components/schemas/_res_listPets'}")
        );
        assert_eq!(
            catalog.get("_res_listPets").unwrap(),
            &yaml("{type: object, properties: {_jsonBody: {type: string}}}")
        );
    }

    #[test]
    fn common_response_fields_come_first() {
        let config = Config::default()
            .common_response_field("code", yaml("{type: integer}"))
            .common_response_field("message", yaml("{type: string}"));
        let (_, catalog) = wrap(
            &config,
            indoc! {r##"
                responses:
                  200:
                    description: OK
                    content:
                      application/json:
                        schema: {$ref: "#/components/schemas/Pet"}
            "##},
        )
        .unwrap();

        let envelope = catalog.get("_res_listPets").unwrap();
        let names: Vec<_> = envelope["properties"]
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(names, vec!["code", "message", "_jsonBody"]);
    }

    #[test]
    fn missing_body_points_at_shared_envelope() {
        let (operation, catalog) = wrap(
            &Config::default(),
            "responses: {'200': {description: No body}}",
        )
        .unwrap();

        assert_eq!(
            operation["responses"]["200"]["content"],
            yaml(indoc! {"
                application/json:
                  schema: {$ref: '#/components/schemas/_commonResponse'}
            "})
        );
        assert!(catalog.get("_res_listPets").is_none());
    }

    #[test]
    fn non_json_content_is_kept_next_to_shared_envelope() {
        let (operation, _) = wrap(
            &Config::default(),
            indoc! {"
                responses:
                  '200':
                    description: CSV
                    content:
                      text/csv:
                        schema: {type: string}
            "},
        )
        .unwrap();

        let content = operation["responses"]["200"]["content"].as_mapping().unwrap();
        assert!(content.contains_key("text/csv"));
        assert_eq!(
            content.get("application/json").unwrap()["schema"]["$ref"].as_str(),
            Some("#/components/schemas/_commonResponse")
        );
    }

    #[test]
    fn inline_array_response_is_guarded() {
        let (_, catalog) = wrap(
            &Config::default(),
            indoc! {"
                responses:
                  '200':
                    description: OK
                    content:
                      application/json:
                        schema:
                          type: array
                          items: {type: boolean}
            "},
        )
        .unwrap();

        assert_eq!(
            catalog.get("_res_listPets").unwrap()["properties"]["_jsonBody"]["items"]["$ref"]
                .as_str(),
            Some("#/components/schemas/_primitive_boolean")
        );
    }

    #[test]
    fn missing_ok_response_is_an_error() {
        let err = wrap(
            &Config::default(),
            "responses: {'404': {description: Not found}}",
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingOkResponse { operation } if operation == "listPets"));
    }

    #[test]
    fn missing_responses_map_is_an_error() {
        let err = wrap(&Config::default(), "operationId: listPets").unwrap_err();
        assert!(matches!(err, Error::MissingOkResponse { .. }));
    }

    #[test]
    fn referenced_response_is_rejected() {
        let err = wrap(
            &Config::default(),
            "responses: {'200': {$ref: '#/components/responses/Ok'}}",
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedReferenceForm { .. }));
    }
}
