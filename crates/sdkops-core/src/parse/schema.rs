use serde_json::{Map, Value};

use crate::error::CompileError;

/// A JSON Schema scalar `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

impl ScalarType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" => Some(ScalarType::String),
            "integer" => Some(ScalarType::Integer),
            "number" => Some(ScalarType::Number),
            "boolean" => Some(ScalarType::Boolean),
            "null" => Some(ScalarType::Null),
            _ => None,
        }
    }
}

/// A schema fragment classified by the one construct the compiler dispatches on.
///
/// Classification borrows from the document tree; nothing is copied.
#[derive(Debug, Clone, Copy)]
pub enum SchemaOrRef<'a> {
    Ref(&'a str),
    Node(SchemaNode<'a>),
}

#[derive(Debug, Clone, Copy)]
pub enum SchemaNode<'a> {
    Scalar(ScalarType),
    Array { items: Option<&'a Value> },
    Object(ObjectNode<'a>),
    AnyOf(&'a [Value]),
}

/// The `properties` and `required` keywords of an object schema.
#[derive(Debug, Clone, Copy)]
pub struct ObjectNode<'a> {
    properties: Option<&'a Map<String, Value>>,
    required: &'a [Value],
}

impl<'a> ObjectNode<'a> {
    /// Declared properties in document order.
    pub fn properties(&self) -> impl Iterator<Item = (&'a String, &'a Value)> + use<'a> {
        self.properties.into_iter().flat_map(|props| props.iter())
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r.as_str() == Some(name))
    }
}

impl<'a> SchemaOrRef<'a> {
    /// `$ref` wins over everything else in the fragment, then `anyOf`, then `type`.
    pub fn classify(value: &'a Value) -> Result<Self, CompileError> {
        let Some(map) = value.as_object() else {
            return Err(CompileError::unsupported(value, "schema is not an object"));
        };

        if let Some(pointer) = map.get("$ref").and_then(Value::as_str) {
            return Ok(SchemaOrRef::Ref(pointer));
        }

        if let Some(branches) = map.get("anyOf") {
            return match branches.as_array() {
                Some(branches) if !branches.is_empty() => {
                    Ok(SchemaOrRef::Node(SchemaNode::AnyOf(branches)))
                }
                _ => Err(CompileError::unsupported(
                    value,
                    "anyOf must be a non-empty array",
                )),
            };
        }

        let Some(keyword) = map.get("type").and_then(Value::as_str) else {
            return Err(CompileError::unsupported(
                value,
                "no type, anyOf or $ref keyword",
            ));
        };

        let node = match keyword {
            "array" => SchemaNode::Array {
                items: map.get("items"),
            },
            "object" => SchemaNode::Object(ObjectNode {
                properties: map.get("properties").and_then(Value::as_object),
                required: map
                    .get("required")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default(),
            }),
            other => match ScalarType::from_keyword(other) {
                Some(scalar) => SchemaNode::Scalar(scalar),
                None => {
                    return Err(CompileError::unsupported(
                        value,
                        format!("unknown type '{other}'"),
                    ));
                }
            },
        };
        Ok(SchemaOrRef::Node(node))
    }
}
