use minijinja::context;
use sdkops_core::ir::{Field, Record, SdkIr, TypeDeclaration};

use crate::type_mapper::{optional_type_to_python, python_literal, type_ref_to_python};

/// Template contexts for every declaration, in IR order.
pub fn declaration_contexts(ir: &SdkIr) -> Vec<minijinja::Value> {
    ir.declarations.iter().map(declaration_to_ctx).collect()
}

fn declaration_to_ctx(decl: &TypeDeclaration) -> minijinja::Value {
    match decl {
        TypeDeclaration::Alias(alias) => context! {
            kind => "alias",
            name => alias.name.clone(),
            target => type_ref_to_python(&alias.target),
        },
        TypeDeclaration::Record(record) => record_to_ctx(record),
    }
}

fn record_to_ctx(record: &Record) -> minijinja::Value {
    let mut params = vec!["self".to_string()];
    params.extend(constructor_parameters(record));

    let forwards: Vec<String> = record
        .fields
        .iter()
        .map(|f| format!("{0}={0}", f.name))
        .collect();

    let fields: Vec<minijinja::Value> = record
        .fields
        .iter()
        .map(|f| {
            context! {
                name => f.name.clone(),
                annotation => type_ref_to_python(&f.field_type),
            }
        })
        .collect();

    context! {
        kind => "record",
        name => record.name.clone(),
        params => params,
        forwards => forwards,
        fields => fields,
    }
}

/// `__init__` parameters after `self`, in constructor order.
pub fn constructor_parameters(record: &Record) -> Vec<String> {
    record
        .constructor_fields()
        .into_iter()
        .map(field_parameter)
        .collect()
}

fn field_parameter(field: &Field) -> String {
    if !field.has_default {
        return format!("{}: {}", field.name, type_ref_to_python(&field.field_type));
    }
    let default = python_literal(&field.default_value);
    let annotation = if field.default_value.is_null() {
        optional_type_to_python(&field.field_type)
    } else {
        type_ref_to_python(&field.field_type)
    };
    format!("{}: {annotation} = {default}", field.name)
}

#[cfg(test)]
mod tests {
    use sdkops_core::ir::TypeRef;
    use serde_json::{Value, json};

    use super::*;

    fn field(name: &str, field_type: TypeRef, default: Option<Value>) -> Field {
        Field {
            name: name.to_string(),
            field_type,
            has_default: default.is_some(),
            default_value: default.unwrap_or(Value::Null),
        }
    }

    #[test]
    fn test_constructor_parameters() {
        let record = Record {
            name: "Order".to_string(),
            fields: vec![
                field("id", TypeRef::String, None),
                field("tags", TypeRef::List(Box::new(TypeRef::String)), Some(json!([]))),
                field("total", TypeRef::Number, None),
                field("note", TypeRef::String, Some(Value::Null)),
            ],
        };
        assert_eq!(
            constructor_parameters(&record),
            vec![
                "total: float",
                "id: str",
                "tags: list[str] = []",
                "note: str | None = None",
            ]
        );
    }

    #[test]
    fn test_union_field_keeps_branch_order() {
        let point = TypeRef::union(vec![
            TypeRef::Named("MePoint".to_string()),
            TypeRef::Null,
            TypeRef::Integer,
        ]);
        let record = Record {
            name: "Me".to_string(),
            fields: vec![
                field("id", TypeRef::Integer, Some(json!(0))),
                field("point", point, Some(Value::Null)),
            ],
        };
        assert_eq!(
            constructor_parameters(&record),
            vec!["id: int = 0", "point: MePoint | None | int = None"]
        );
    }
}
