use sdkops_core::ir::TypeRef;
use serde_json::Value;

/// Map a `TypeRef` to its Python annotation.
pub fn type_ref_to_python(ty: &TypeRef) -> String {
    match ty {
        TypeRef::String => "str".to_string(),
        TypeRef::Integer => "int".to_string(),
        TypeRef::Number => "float".to_string(),
        TypeRef::Boolean => "bool".to_string(),
        TypeRef::Null => "None".to_string(),
        TypeRef::Any => "Any".to_string(),
        TypeRef::Named(name) => name.clone(),
        TypeRef::List(inner) => format!("list[{}]", type_ref_to_python(inner)),
        TypeRef::Map(value) => format!("dict[str, {}]", type_ref_to_python(value)),
        TypeRef::Union(members) => {
            let members: Vec<String> = members.iter().map(type_ref_to_python).collect();
            members.join(" | ")
        }
    }
}

/// The annotation of a position whose default is `None`.
pub fn optional_type_to_python(ty: &TypeRef) -> String {
    let base = type_ref_to_python(ty);
    if ty.is_nullable() || *ty == TypeRef::Any {
        base
    } else {
        format!("{base} | None")
    }
}

/// Whether the annotation needs `typing.Any`.
pub fn mentions_any(ty: &TypeRef) -> bool {
    match ty {
        TypeRef::Any => true,
        TypeRef::List(inner) | TypeRef::Map(inner) => mentions_any(inner),
        TypeRef::Union(members) => members.iter().any(mentions_any),
        _ => false,
    }
}

/// Render a JSON default as a Python literal.
pub fn python_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(python_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quote(k), python_literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// A double-quoted Python string literal. JSON escapes are valid Python escapes.
pub fn quote(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}
