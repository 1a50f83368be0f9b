use indexmap::IndexMap;
use log::warn;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ParseError;
use crate::transform::name_normalizer::operation_id_from_route;

use super::media_type::MediaType;
use super::operation::{self as wire, HttpMethod};
use super::parameter::{self as wire_param, ParameterLocation, ParameterOrRef};
use super::ref_resolve::RefResolver;
use super::request_body::RequestBodyOrRef;
use super::response::ResponseOrRef;
use super::spec::{Info, OpenApiSpec};

/// A parsed OpenAPI document, ready for compilation.
///
/// The raw tree is kept next to the structured view: schemas are compiled
/// against it, so `$ref` pointers inside content schemas still resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub openapi_version: String,
    pub info: Info,
    pub servers: Vec<Server>,
    pub paths: Vec<PathItem>,
    raw: Value,
}

impl Document {
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The document's `components` section, `null` when absent.
    pub fn components(&self) -> &Value {
        self.raw.get("components").unwrap_or(&Value::Null)
    }

    pub fn operations(&self) -> impl Iterator<Item = (&PathItem, &Operation)> {
        self.paths
            .iter()
            .flat_map(|path| path.operations.iter().map(move |op| (path, op)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Server {
    /// URL with server variables replaced by their defaults.
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathItem {
    pub pattern: String,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub method: HttpMethod,
    pub operation_id: String,
    pub summary: Option<String>,
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    pub responses: Vec<Response>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    /// Always true for path parameters.
    pub required: bool,
    pub schema: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
    pub required: bool,
    pub description: String,
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// `"200"`, `"404"`, `"default"`, ...
    pub status_code: String,
    pub description: String,
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    pub media_type: String,
    pub schema: Option<Value>,
    pub examples: IndexMap<String, Value>,
    /// Seed for the generated type name, e.g. `get_item_response_200`.
    pub id: String,
}

impl Content {
    pub fn is_json(&self) -> bool {
        self.media_type.contains("json")
    }

    /// Matches `text/plain` with or without parameters such as `charset`.
    pub fn is_plain_text(&self) -> bool {
        self.media_type
            .split(';')
            .next()
            .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("text/plain"))
    }
}

impl Response {
    /// Numeric status, `None` for `default`.
    pub fn status(&self) -> Option<u16> {
        self.status_code.parse().ok()
    }
}

/// Build the structured view of an already version-checked wire document.
pub(crate) fn build(spec: OpenApiSpec, raw: Value) -> Result<Document, ParseError> {
    let mut resolver = RefResolver::new(&raw);

    let servers = spec
        .servers
        .iter()
        .map(|server| Server {
            url: server.expanded_url(),
            description: server.description.clone().unwrap_or_default(),
        })
        .collect();

    let mut paths = Vec::with_capacity(spec.paths.len());
    for (pattern, item) in &spec.paths {
        let mut operations = Vec::new();
        for (key, entry) in &item.entries {
            let Some(method) = HttpMethod::from_key(key) else {
                warn!("ignoring unknown key '{key}' in path item {pattern}");
                continue;
            };
            let op = wire::Operation::deserialize(entry)?;
            operations.push(build_operation(
                pattern,
                method,
                op,
                &item.parameters,
                &mut resolver,
            )?);
        }
        paths.push(PathItem {
            pattern: pattern.clone(),
            operations,
        });
    }

    drop(resolver);
    Ok(Document {
        openapi_version: spec.openapi,
        info: spec.info,
        servers,
        paths,
        raw,
    })
}

fn build_operation(
    pattern: &str,
    method: HttpMethod,
    op: wire::Operation,
    path_parameters: &[ParameterOrRef],
    resolver: &mut RefResolver<'_>,
) -> Result<Operation, ParseError> {
    let operation_id = match op.operation_id {
        Some(id) if !id.is_empty() => id,
        _ => operation_id_from_route(pattern, method.key()),
    };

    let own: Vec<Parameter> = op
        .parameters
        .iter()
        .map(|p| resolve_parameter(p, resolver))
        .collect::<Result<_, _>>()?;

    // Path-level parameters come first unless the operation redeclares them.
    let mut parameters = Vec::with_capacity(path_parameters.len() + own.len());
    for p in path_parameters {
        let inherited = resolve_parameter(p, resolver)?;
        let overridden = own
            .iter()
            .any(|o| o.name == inherited.name && o.location == inherited.location);
        if !overridden {
            parameters.push(inherited);
        }
    }
    parameters.extend(own);

    let request_body = op
        .request_body
        .map(|body| {
            let body = match body {
                RequestBodyOrRef::RequestBody(body) => body,
                RequestBodyOrRef::Ref { ref_path } => resolve_wire(resolver, &ref_path)?,
            };
            Ok::<_, ParseError>(RequestBody {
                required: body.required,
                description: body.description.unwrap_or_default(),
                contents: build_contents(&body.content, &format!("{operation_id}_request_body")),
            })
        })
        .transpose()?;

    let mut responses = Vec::with_capacity(op.responses.len());
    for (status_code, response) in op.responses {
        let status = validate_status(&status_code)?;
        let response = match response {
            ResponseOrRef::Response(response) => response,
            ResponseOrRef::Ref { ref_path } => resolve_wire(resolver, &ref_path)?,
        };
        let id = format!("{operation_id}_response_{status_code}");
        let mut contents = build_contents(&response.content, &id);
        if contents.is_empty() && status.is_some_and(|s| (300..=399).contains(&s)) {
            contents.push(Content {
                media_type: "text/plain".to_string(),
                schema: Some(json!({"type": "string"})),
                examples: IndexMap::new(),
                id,
            });
        }
        responses.push(Response {
            status_code,
            description: response.description,
            contents,
        });
    }

    Ok(Operation {
        method,
        operation_id,
        summary: op.summary,
        parameters,
        request_body,
        responses,
    })
}

fn resolve_parameter(
    param: &ParameterOrRef,
    resolver: &mut RefResolver<'_>,
) -> Result<Parameter, ParseError> {
    let param = match param {
        ParameterOrRef::Parameter(p) => p.clone(),
        ParameterOrRef::Ref { ref_path } => {
            resolve_wire::<wire_param::Parameter>(resolver, ref_path)?
        }
    };
    Ok(Parameter {
        required: param.required || param.location == ParameterLocation::Path,
        name: param.name,
        location: param.location,
        schema: param.schema,
    })
}

fn resolve_wire<T: for<'de> Deserialize<'de>>(
    resolver: &mut RefResolver<'_>,
    pointer: &str,
) -> Result<T, ParseError> {
    let target = resolver.resolve(pointer)?;
    Ok(T::deserialize(target)?)
}

fn build_contents(content: &IndexMap<String, MediaType>, id: &str) -> Vec<Content> {
    content
        .iter()
        .map(|(media_type, media)| {
            let mut examples = media.examples.clone();
            if examples.is_empty()
                && let Some(example) = &media.example
            {
                examples.insert("default".to_string(), example.clone());
            }
            Content {
                media_type: media_type.clone(),
                schema: media.schema.clone(),
                examples,
                id: id.to_string(),
            }
        })
        .collect()
}

/// `default` or a three-digit code in 100..=599. Returns the numeric code.
fn validate_status(status_code: &str) -> Result<Option<u16>, ParseError> {
    if status_code == "default" {
        return Ok(None);
    }
    match status_code.parse::<u16>() {
        Ok(code) if status_code.len() == 3 && (100..=599).contains(&code) => Ok(Some(code)),
        _ => Err(ParseError::InvalidStatusCode(status_code.to_string())),
    }
}
