//! Operation parameters, as declared in the document or in the config.

use serde::Deserialize;
use serde_yaml_ng::Value;

use crate::error::{Error, Result};

/// Where a parameter is carried in the original HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Templated path segment (`/users/{id}`).
    Path,
    /// Query string.
    Query,
    /// Request header.
    Header,
    /// Cookie.
    Cookie,
}

impl ParameterLocation {
    /// The `in` keyword value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

/// A parameter object.
///
/// Only the fields the request merger consumes are decoded; everything else
/// (`style`, `example`, ...) is dropped together with the parameter list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,

    /// Location (`in`).
    #[serde(rename = "in")]
    pub location: ParameterLocation,

    /// Whether the caller must supply it.
    #[serde(default)]
    pub required: bool,

    /// Inline or referenced schema; a bare string schema when absent.
    #[serde(default)]
    pub schema: Option<Value>,

    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Parameter {
    /// Create a parameter with no schema and no description.
    #[must_use]
    pub fn new(name: &str, location: ParameterLocation) -> Self {
        Self {
            name: name.to_string(),
            location,
            required: false,
            schema: None,
            description: None,
        }
    }

    /// Mark the parameter as required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the parameter schema.
    #[must_use]
    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Decode a parameter object found on `operation`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedReferenceForm`] for `$ref` parameters.
    /// - [`Error::InvalidParameter`] if required fields are missing or malformed.
    pub fn from_value(raw: &Value, operation: &str) -> Result<Self> {
        if let Some(reference) = raw.get("$ref").and_then(Value::as_str) {
            return Err(Error::UnsupportedReferenceForm {
                reference: reference.to_string(),
            });
        }
        serde_yaml_ng::from_value(raw.clone()).map_err(|source| Error::InvalidParameter {
            operation: operation.to_string(),
            source,
        })
    }

    /// Property name inside the merged request body, e.g. `_query_limit`.
    ///
    /// The location prefix keeps a path `id` and a query `id` apart.
    #[must_use]
    pub fn body_property_name(&self) -> String {
        format!("_{}_{}", self.location.as_str(), self.name)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    fn parse(yaml: &str) -> Result<Parameter> {
        let raw: Value = serde_yaml_ng::from_str(yaml).unwrap();
        Parameter::from_value(&raw, "listPets")
    }

    #[test]
    fn decodes_full_parameter() {
        let param = parse(indoc! {"
            name: limit
            in: query
            required: true
            description: Page size
            style: form
            schema:
              type: integer
              format: int32
        "})
        .unwrap();
        assert_eq!(param.name, "limit");
        assert_eq!(param.location, ParameterLocation::Query);
        assert!(param.required);
        assert_eq!(param.description.as_deref(), Some("Page size"));
        assert_eq!(param.schema.unwrap()["format"].as_str(), Some("int32"));
    }

    #[test]
    fn required_defaults_to_false() {
        let param = parse("name: X-Trace\nin: header").unwrap();
        assert!(!param.required);
        assert!(param.schema.is_none());
        assert_eq!(param.body_property_name(), "_header_X-Trace");
    }

    #[test]
    fn reference_parameters_are_rejected() {
        let err = parse("$ref: '#/components/parameters/Limit'").unwrap_err();
        assert!(matches!(err, Error::UnsupportedReferenceForm { .. }));
    }

    #[test]
    fn unknown_location_is_invalid() {
        let err = parse("name: x\nin: body").unwrap_err();
        assert!(
            matches!(&err, Error::InvalidParameter { operation, .. } if operation == "listPets"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn builder() {
        let param = Parameter::new("token", ParameterLocation::Cookie)
            .required(true)
            .description("Session");
        assert_eq!(param.body_property_name(), "_cookie_token");
        assert!(param.required);
    }
}
