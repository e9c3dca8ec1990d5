//! Field schemas describing what to extract from a page
//!
//! A [`FieldSchema`] is an ordered list of `(name, description)` pairs. The
//! order is part of the contract: request composition enumerates the fields
//! in exactly this order.

use crate::ExtractError;

/// A single field to extract: a root key plus a natural-language
/// description of its semantics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub description: String,
}

/// Ordered set of fields declared by the caller for one extraction task.
///
/// Valid by construction: a `FieldSchema` always holds at least one field,
/// every name is non-empty, and names are distinct. Violations are caller
/// bugs and are rejected at [`FieldSchemaBuilder::build`] time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<Field>,
}

impl FieldSchema {
    pub fn builder() -> FieldSchemaBuilder {
        FieldSchemaBuilder::new()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }
}

#[derive(Debug, Default)]
pub struct FieldSchemaBuilder {
    fields: Vec<Field>,
}

impl FieldSchemaBuilder {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn field(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            description: description.into(),
        });
        self
    }

    pub fn build(self) -> Result<FieldSchema, ExtractError> {
        if self.fields.is_empty() {
            return Err(ExtractError::InvalidSchema(
                "schema must declare at least one field".to_string(),
            ));
        }

        for (i, field) in self.fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(ExtractError::InvalidSchema(format!(
                    "field at position {} has an empty name",
                    i
                )));
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(ExtractError::InvalidSchema(format!(
                    "duplicate field name: {}",
                    field.name
                )));
            }
        }

        Ok(FieldSchema {
            fields: self.fields,
        })
    }
}
