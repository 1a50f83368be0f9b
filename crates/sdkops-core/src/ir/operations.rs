use serde::Serialize;
use serde_json::Value;

pub use crate::parse::operation::HttpMethod;

use super::types::TypeRef;

/// One callable method on the generated client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDeclaration {
    pub name: String,
    pub summary: Option<String>,
    /// `json`, then path/query parameters, then `headers`.
    pub parameters: Vec<MethodParameter>,
    pub request: RequestSpec,
    pub response_kind: ResponseKind,
    pub return_type: TypeRef,
}

impl MethodDeclaration {
    pub fn parameter(&self, name: &str) -> Option<&MethodParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: TypeRef,
    pub has_default: bool,
    pub default_value: Value,
    pub source: ParameterSource,
}

/// Where an argument ends up in the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterSource {
    JsonBody,
    Path,
    Query,
    /// Extra headers merged over the client's baseline headers.
    Headers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    /// Return the raw payload.
    Text,
    DecodedJson,
}

/// How the generated method builds its request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub url: UrlTemplate,
    pub json_body_param: Option<String>,
    /// Query parameters, keyed by their own names.
    pub query_param_names: Vec<String>,
    /// Replaces the default `accept` header before dispatch.
    pub accept_override: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UrlTemplate {
    Literal { path: String },
    /// `pattern` keeps its `{name}` placeholders, listed in order of appearance.
    Interpolated {
        pattern: String,
        placeholders: Vec<String>,
    },
}

impl UrlTemplate {
    pub fn from_pattern(pattern: &str) -> Self {
        let placeholders = placeholders(pattern);
        if placeholders.is_empty() {
            UrlTemplate::Literal {
                path: pattern.to_string(),
            }
        } else {
            UrlTemplate::Interpolated {
                pattern: pattern.to_string(),
                placeholders,
            }
        }
    }

    pub fn pattern(&self) -> &str {
        match self {
            UrlTemplate::Literal { path } => path,
            UrlTemplate::Interpolated { pattern, .. } => pattern,
        }
    }
}

fn placeholders(pattern: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = pattern;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        if end > 0 {
            names.push(after[..end].to_string());
        }
        rest = &after[end + 1..];
    }
    names
}
