use serde::Serialize;
use serde_json::Value;

use super::types::TypeRef;

/// A named type produced by the schema compiler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDeclaration {
    Alias(ScalarAlias),
    Record(Record),
}

impl TypeDeclaration {
    pub fn name(&self) -> &str {
        match self {
            TypeDeclaration::Alias(a) => &a.name,
            TypeDeclaration::Record(r) => &r.name,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            TypeDeclaration::Record(r) => Some(r),
            TypeDeclaration::Alias(_) => None,
        }
    }
}

/// A top-level non-object schema, e.g. `simple_item = string`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalarAlias {
    pub name: String,
    pub target: TypeRef,
}

/// An object schema. `fields` keeps property declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Constructor parameter order: fields without a default in reverse
    /// declaration order, then fields with a default in declaration order.
    pub fn constructor_fields(&self) -> Vec<&Field> {
        let required = self.fields.iter().filter(|f| !f.has_default).rev();
        let optional = self.fields.iter().filter(|f| f.has_default);
        required.chain(optional).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: TypeRef,
    pub has_default: bool,
    /// `null` whenever `has_default` is false.
    pub default_value: Value,
}
