use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid response status code: {0}")]
    InvalidStatusCode(String),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),
}

/// A `$ref` pointer could not be walked to completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("invalid reference format: {0} (a reference must start with '#/')")]
    InvalidRefFormat(String),

    #[error("reference target not found: {pointer} (no key '{segment}')")]
    RefTargetNotFound { pointer: String, segment: String },

    #[error("circular reference detected: {0}")]
    CircularRef(String),
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("unsupported schema ({reason}): {schema}")]
    UnsupportedSchema { schema: String, reason: String },
}

impl CompileError {
    pub(crate) fn unsupported(schema: &serde_json::Value, reason: impl Into<String>) -> Self {
        CompileError::UnsupportedSchema {
            schema: schema.to_string(),
            reason: reason.into(),
        }
    }
}

/// The base URL could not be picked without help from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BaseUrlError {
    #[error("couldn't find a base url: the document declares no servers. pass --url or set client.base_url")]
    NoServers,

    #[error(
        "couldn't find a base url: the document declares {count} servers and none can be picked. pass --url or set client.base_url"
    )]
    Ambiguous { count: usize },
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("template error: {0}")]
    Template(String),

    #[error("emit failed: {0}")]
    Other(String),
}
