//! The schema catalog (`components.schemas`) and reference resolution.

use serde_yaml_ng::{Mapping, Value};

use crate::error::{Error, Result};
use crate::schema::{array_wrapper_name, schema_name, schema_ref, SchemaKind};

/// How a reference to a non-object schema should be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolve {
    /// Return the named schema as declared.
    Raw,
    /// Substitute the synthesized wrapper when the target is an array or a
    /// primitive, so the result always has object shape.
    ///
    /// Compositions and untyped schemas are returned as declared.
    Wrapped,
}

/// Named schemas of the document, owned by one conversion run.
///
/// Passes receive it by `&mut` through the conversion context; entries
/// synthesized by an earlier pass are visible to every later one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    schemas: Mapping,
}

impl Catalog {
    /// Wrap the `components.schemas` mapping of a document.
    #[must_use]
    pub fn new(schemas: Mapping) -> Self {
        Self { schemas }
    }

    /// Give back the underlying mapping.
    #[must_use]
    pub fn into_inner(self) -> Mapping {
        self.schemas
    }

    /// Look up a schema by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Whether `name` is taken.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Snapshot of the current schema names, in document order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.schemas
            .keys()
            .filter_map(|k| k.as_str().map(ToString::to_string))
            .collect()
    }

    /// Number of schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the catalog holds no schemas.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Add a schema under a synthesized name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaNameCollision`] if the name is already taken,
    /// either by a user schema or by an earlier synthesized one.
    pub fn insert_synthesized(&mut self, name: String, schema: Value) -> Result<()> {
        if self.contains(&name) {
            return Err(Error::SchemaNameCollision { name });
        }
        tracing::debug!(schema = %name, "synthesized schema");
        self.schemas.insert(Value::String(name), schema);
        Ok(())
    }

    /// Overwrite an existing entry in place, keeping its position.
    pub fn replace(&mut self, name: &str, schema: Value) {
        if let Some(slot) = self.schemas.get_mut(name) {
            *slot = schema;
        }
    }

    /// Mutable access to every schema.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.schemas.values_mut()
    }

    /// Resolve a `$ref` string to the schema it names.
    ///
    /// Aliases (entries that are themselves a bare `$ref`) are followed until
    /// a non-reference schema is reached; wrapped mode then applies to that
    /// final target.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedReferenceForm`] if a reference is not local.
    /// - [`Error::BrokenReference`] if a name (or, in wrapped mode, its
    ///   wrapper) is missing from the catalog.
    /// - [`Error::CyclicReference`] if aliases loop back on themselves.
    pub fn resolve<'a>(&'a self, reference: &'a str, mode: Resolve) -> Result<&'a Value> {
        let (name, schema) = self.follow(reference)?;
        if mode == Resolve::Raw {
            return Ok(schema);
        }
        match SchemaKind::of(schema) {
            SchemaKind::Array => self.lookup(&array_wrapper_name(name)),
            SchemaKind::Primitive(primitive) => self.lookup(&primitive.wrapper_name()),
            SchemaKind::Object
            | SchemaKind::Reference(_)
            | SchemaKind::AllOf(_)
            | SchemaKind::AnyOf(_)
            | SchemaKind::Untyped => Ok(schema),
        }
    }

    /// Follow `schema` if it is a reference, otherwise return it unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`Catalog::resolve`].
    pub fn deref<'a>(&'a self, schema: &'a Value, mode: Resolve) -> Result<&'a Value> {
        match SchemaKind::of(schema) {
            SchemaKind::Reference(reference) => self.resolve(reference, mode),
            _ => Ok(schema),
        }
    }

    /// Walk an alias chain to its first non-reference entry.
    fn follow<'a>(&'a self, reference: &'a str) -> Result<(&'a str, &'a Value)> {
        let mut name = schema_name(reference)?;
        let mut seen = Vec::new();
        loop {
            let schema = self.lookup(name)?;
            let SchemaKind::Reference(next) = SchemaKind::of(schema) else {
                return Ok((name, schema));
            };
            seen.push(name);
            name = schema_name(next)?;
            if seen.contains(&name) {
                return Err(Error::CyclicReference {
                    reference: schema_ref(name),
                });
            }
        }
    }

    fn lookup(&self, name: &str) -> Result<&Value> {
        self.get(name).ok_or_else(|| Error::BrokenReference {
            reference: schema_ref(name),
        })
    }
}

#[cfg(test)]
pub(crate) fn catalog_from_yaml(yaml: &str) -> Catalog {
    Catalog::new(serde_yaml_ng::from_str(yaml).unwrap())
}
