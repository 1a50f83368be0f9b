use serde_json::{Value, json};

use crate::ir::TypeRef;

/// Pick a default value for a position whose candidate types are `types`.
///
/// Priority is fixed and independent of member order: null, string, number,
/// bool, map, list. Anything else (named records, `any`) defaults to `null`.
pub fn synthesize_default(types: &[TypeRef]) -> Value {
    let has = |pred: fn(&TypeRef) -> bool| types.iter().any(pred);

    if has(|t| matches!(t, TypeRef::Null)) {
        Value::Null
    } else if has(|t| matches!(t, TypeRef::String)) {
        json!("")
    } else if has(|t| matches!(t, TypeRef::Integer | TypeRef::Number)) {
        json!(0)
    } else if has(|t| matches!(t, TypeRef::Boolean)) {
        json!(false)
    } else if has(|t| matches!(t, TypeRef::Map(_))) {
        json!({})
    } else if has(|t| matches!(t, TypeRef::List(_))) {
        json!([])
    } else {
        Value::Null
    }
}
