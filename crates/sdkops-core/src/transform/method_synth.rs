use log::{debug, warn};
use serde_json::Value;

use crate::error::CompileError;
use crate::ir::{
    MethodDeclaration, MethodParameter, ParameterSource, RequestSpec, ResponseKind, TypeRef,
    UrlTemplate,
};
use crate::parse::document::{Content, Document, Operation};
use crate::parse::parameter::ParameterLocation;
use crate::parse::ref_resolve::RefResolver;

use super::defaults::synthesize_default;
use super::schema_compiler::{collect_types, compilation_root, root_declaration_name};

pub const JSON_PARAM: &str = "json";
pub const HEADERS_PARAM: &str = "headers";
pub const TEXT_ACCEPT: &str = "text/plain";

/// The declaration name the schema compiler gives a content entry's root
/// schema, or `None` when the content carries no schema.
pub fn content_type_name(
    sdk_name: &str,
    content: &Content,
    document: &Document,
) -> Result<Option<String>, CompileError> {
    let Some(schema) = &content.schema else {
        return Ok(None);
    };
    let root = compilation_root(schema, document.components());
    let name = root_declaration_name(&root, &format!("{sdk_name}_{}", content.id))?;
    Ok(Some(name))
}

/// The content whose schema is compiled for a body or response. Its media
/// types share one id and so one declaration: the first JSON content with a
/// schema wins, then the first content with any schema.
pub fn declared_content(contents: &[Content]) -> Option<&Content> {
    contents
        .iter()
        .find(|c| c.is_json() && c.schema.is_some())
        .or_else(|| contents.iter().find(|c| c.schema.is_some()))
}

/// Build the client method for one operation.
pub fn synthesize(
    path: &str,
    operation: &Operation,
    sdk_name: &str,
    document: &Document,
) -> Result<MethodDeclaration, CompileError> {
    let (return_type, response_kind) = return_type(operation, sdk_name, document)?;

    let mut parameters = Vec::new();

    let request_contents = operation
        .request_body
        .as_ref()
        .map(|body| body.contents.as_slice())
        .unwrap_or_default();
    let json_content = request_contents.iter().find(|c| c.is_json());
    if let Some(content) = json_content {
        parameters.push(MethodParameter {
            name: JSON_PARAM.to_string(),
            param_type: content_schema_type(sdk_name, content, request_contents, document)?,
            has_default: false,
            default_value: Value::Null,
            source: ParameterSource::JsonBody,
        });
    }

    let mut query_param_names = Vec::new();
    for param in &operation.parameters {
        let source = match param.location {
            ParameterLocation::Path => ParameterSource::Path,
            ParameterLocation::Query => ParameterSource::Query,
            ParameterLocation::Header | ParameterLocation::Cookie => continue,
        };
        if source == ParameterSource::Query {
            query_param_names.push(param.name.clone());
        }

        let (types, explicit_default) = match &param.schema {
            Some(schema) => {
                let root = compilation_root(schema, document.components());
                let mut resolver = RefResolver::new(&root);
                let types = collect_types(&mut resolver, &root)?;
                (types, schema.get("default").cloned())
            }
            None => (Vec::new(), None),
        };

        // Required parameters get a synthesized default; an explicit schema
        // default replaces it.
        let mut default_value = if param.required {
            synthesize_default(&types)
        } else {
            Value::Null
        };
        if let Some(explicit) = &explicit_default {
            default_value = explicit.clone();
        }

        parameters.push(MethodParameter {
            name: param.name.clone(),
            param_type: TypeRef::union(types),
            has_default: param.required || explicit_default.is_some(),
            default_value,
            source,
        });
    }

    parameters.push(MethodParameter {
        name: HEADERS_PARAM.to_string(),
        param_type: TypeRef::Map(Box::new(TypeRef::String)),
        has_default: true,
        default_value: Value::Null,
        source: ParameterSource::Headers,
    });

    let url = UrlTemplate::from_pattern(path);
    if let UrlTemplate::Interpolated { placeholders, .. } = &url {
        for placeholder in placeholders {
            let declared = parameters
                .iter()
                .any(|p| p.source == ParameterSource::Path && &p.name == placeholder);
            if !declared {
                warn!(
                    "{}: path placeholder '{placeholder}' has no matching path parameter",
                    operation.operation_id
                );
            }
        }
    }

    let request = RequestSpec {
        method: operation.method,
        url,
        json_body_param: json_content.map(|_| JSON_PARAM.to_string()),
        query_param_names,
        accept_override: (response_kind == ResponseKind::Text).then(|| TEXT_ACCEPT.to_string()),
    };

    debug!(
        "method {} {} {} -> {return_type}",
        operation.operation_id,
        operation.method.as_str(),
        path
    );

    Ok(MethodDeclaration {
        name: operation.operation_id.clone(),
        summary: operation.summary.clone(),
        parameters,
        request,
        response_kind,
        return_type,
    })
}

/// JSON contents contribute their generated type, plain-text contents
/// contribute `string`. Any text branch makes the method return raw text.
fn return_type(
    operation: &Operation,
    sdk_name: &str,
    document: &Document,
) -> Result<(TypeRef, ResponseKind), CompileError> {
    let mut members: Vec<TypeRef> = Vec::new();
    let mut returns_text = false;

    let contents = operation
        .responses
        .iter()
        .flat_map(|r| r.contents.iter().map(move |c| (c, r.contents.as_slice())));
    for (content, siblings) in contents {
        let member = if content.is_json() {
            content_schema_type(sdk_name, content, siblings, document)?
        } else if content.is_plain_text() {
            returns_text = true;
            TypeRef::String
        } else {
            continue;
        };
        if !members.contains(&member) {
            members.push(member);
        }
    }

    let kind = if returns_text {
        ResponseKind::Text
    } else {
        ResponseKind::DecodedJson
    };
    Ok((TypeRef::union(members), kind))
}

/// `siblings` are all contents of the same body or response; the declared one
/// names the type for every sibling that carries a schema.
fn content_schema_type(
    sdk_name: &str,
    content: &Content,
    siblings: &[Content],
    document: &Document,
) -> Result<TypeRef, CompileError> {
    if content.schema.is_none() {
        return Ok(TypeRef::Any);
    }
    let declared = declared_content(siblings).unwrap_or(content);
    Ok(match content_type_name(sdk_name, declared, document)? {
        Some(name) => TypeRef::Named(name),
        None => TypeRef::Any,
    })
}
