use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use super::operations::MethodDeclaration;
use super::schemas::TypeDeclaration;
use crate::parse::schema::ScalarType;

/// The complete compiler output for one document, handed to an emitter.
#[derive(Debug, Clone, Serialize)]
pub struct SdkIr {
    pub info: IrInfo,
    pub client: ClientDeclaration,
    /// In document traversal order: paths, operations, request body, responses.
    pub declarations: Vec<TypeDeclaration>,
    pub methods: Vec<MethodDeclaration>,
}

/// API metadata.
#[derive(Debug, Clone, Serialize)]
pub struct IrInfo {
    pub title: String,
    pub description: Option<String>,
    pub version: String,
}

/// The generated client type that owns every method.
#[derive(Debug, Clone, Serialize)]
pub struct ClientDeclaration {
    /// PascalCase client type name.
    pub name: String,
    /// snake_case name of the module-level instance.
    pub instance_name: String,
    pub base_url: Option<String>,
    /// Sent with every request; per-call headers are merged over these.
    pub headers: IndexMap<String, String>,
    pub timeout_secs: u64,
    pub auth: AuthSetter,
}

/// A setter that stores `"{scheme} {value}"` under one header, plus its clearing counterpart.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSetter {
    pub header: String,
    pub set_method: String,
    pub clear_method: String,
}

impl Default for AuthSetter {
    fn default() -> Self {
        Self {
            header: "authorization".to_string(),
            set_method: "auth".to_string(),
            clear_method: "deauth".to_string(),
        }
    }
}

/// A type as it appears in a field, parameter or return position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    String,
    Integer,
    Number,
    Boolean,
    /// The none/optional marker.
    Null,
    Any,
    List(Box<TypeRef>),
    /// String-keyed map.
    Map(Box<TypeRef>),
    /// A declared record or alias.
    Named(String),
    /// Members in declaration order; never nested, never a single member.
    Union(Vec<TypeRef>),
}

impl TypeRef {
    /// Build a union, flattening nested unions. One member is returned as-is;
    /// no members yields `Any`.
    pub fn union(members: Vec<TypeRef>) -> TypeRef {
        let mut flat = Vec::with_capacity(members.len());
        for member in members {
            match member {
                TypeRef::Union(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => TypeRef::Any,
            1 => flat.remove(0),
            _ => TypeRef::Union(flat),
        }
    }

    /// The candidate types of this position: union members, or the type itself.
    pub fn members(&self) -> &[TypeRef] {
        match self {
            TypeRef::Union(members) => members,
            other => std::slice::from_ref(other),
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.members().contains(&TypeRef::Null)
    }
}

impl From<ScalarType> for TypeRef {
    fn from(scalar: ScalarType) -> Self {
        match scalar {
            ScalarType::String => TypeRef::String,
            ScalarType::Integer => TypeRef::Integer,
            ScalarType::Number => TypeRef::Number,
            ScalarType::Boolean => TypeRef::Boolean,
            ScalarType::Null => TypeRef::Null,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::String => f.write_str("string"),
            TypeRef::Integer => f.write_str("int"),
            TypeRef::Number => f.write_str("float"),
            TypeRef::Boolean => f.write_str("bool"),
            TypeRef::Null => f.write_str("null"),
            TypeRef::Any => f.write_str("any"),
            TypeRef::List(inner) => write!(f, "list<{inner}>"),
            TypeRef::Map(inner) => write!(f, "map<string,{inner}>"),
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for TypeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_flattens_and_collapses() {
        let nested = TypeRef::union(vec![
            TypeRef::String,
            TypeRef::Union(vec![TypeRef::Null, TypeRef::Integer]),
        ]);
        assert_eq!(
            nested,
            TypeRef::Union(vec![TypeRef::String, TypeRef::Null, TypeRef::Integer])
        );
        assert_eq!(TypeRef::union(vec![TypeRef::Boolean]), TypeRef::Boolean);
        assert_eq!(TypeRef::union(vec![]), TypeRef::Any);
    }

    #[test]
    fn test_display() {
        let ty = TypeRef::union(vec![
            TypeRef::Named("MePoint".to_string()),
            TypeRef::Null,
            TypeRef::List(Box::new(TypeRef::Integer)),
        ]);
        assert_eq!(ty.to_string(), "MePoint | null | list<int>");
        assert_eq!(
            TypeRef::Map(Box::new(TypeRef::String)).to_string(),
            "map<string,string>"
        );
    }
}
