pub mod document;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod ref_resolve;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod server;
pub mod spec;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;
pub use document::Document;
use spec::OpenApiSpec;

/// Parse an OpenAPI document from YAML.
pub fn from_yaml(input: &str) -> Result<Document, ParseError> {
    let raw: Value = serde_yaml_ng::from_str(input)?;
    from_value(raw)
}

/// Parse an OpenAPI document from JSON.
pub fn from_json(input: &str) -> Result<Document, ParseError> {
    let raw: Value = serde_json::from_str(input)?;
    from_value(raw)
}

/// Build a document from an already decoded tree.
pub fn from_value(raw: Value) -> Result<Document, ParseError> {
    if raw.get("openapi").is_none() {
        return Err(ParseError::MissingField("openapi".to_string()));
    }
    let spec = OpenApiSpec::deserialize(&raw)?;
    validate_version(&spec)?;
    document::build(spec, raw)
}

fn validate_version(spec: &OpenApiSpec) -> Result<(), ParseError> {
    if !spec.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(spec.openapi.clone()));
    }
    Ok(())
}
