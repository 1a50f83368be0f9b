use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, info};

use crate::config::ReferencePolicy;
use crate::error::CompileError;
use crate::ir::*;
use crate::parse::document::{Content, Document};

use super::method_synth::{declared_content, synthesize};
use super::name_normalizer::to_pascal;
use super::schema_compiler::{SchemaCompiler, compilation_root};

/// Options for one compilation run.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// snake_case SDK name; seeds every generated type name.
    pub sdk_name: String,
    /// Already resolved base URL, if any.
    pub base_url: Option<String>,
    pub reference_policy: ReferencePolicy,
    pub timeout_secs: u64,
    /// Defaults to `sdk_name`.
    pub user_agent: Option<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            sdk_name: String::new(),
            base_url: None,
            reference_policy: ReferencePolicy::default(),
            timeout_secs: 10,
            user_agent: None,
        }
    }
}

impl CompileOptions {
    pub fn new(sdk_name: impl Into<String>) -> Self {
        Self {
            sdk_name: sdk_name.into(),
            ..Self::default()
        }
    }
}

/// Compile a parsed document into the SDK IR.
///
/// Any failing schema or operation aborts the whole run.
pub fn compile(document: &Document, options: &CompileOptions) -> Result<SdkIr, CompileError> {
    let declarations = compile_declarations(document, options)?;

    let mut methods = Vec::new();
    for (path, operation) in document.operations() {
        methods.push(synthesize(
            &path.pattern,
            operation,
            &options.sdk_name,
            document,
        )?);
    }

    info!(
        "compiled {} declarations and {} methods for {}",
        declarations.len(),
        methods.len(),
        document.info.title
    );

    Ok(SdkIr {
        info: IrInfo {
            title: document.info.title.clone(),
            description: document.info.description.clone(),
            version: document.info.version.clone(),
        },
        client: client_declaration(options),
        declarations,
        methods,
    })
}

/// Paths, then operations, then the request body before the responses, each
/// in declared order.
fn compile_declarations(
    document: &Document,
    options: &CompileOptions,
) -> Result<Vec<TypeDeclaration>, CompileError> {
    let mut declarations = Vec::new();
    let mut compiled_ids = HashSet::new();

    for (_, operation) in document.operations() {
        let request_contents = operation
            .request_body
            .iter()
            .map(|body| body.contents.as_slice());
        let response_contents = operation.responses.iter().map(|r| r.contents.as_slice());

        for contents in request_contents.chain(response_contents) {
            let Some(content) = declared_content(contents) else {
                continue;
            };
            if !compiled_ids.insert(content.id.clone()) {
                continue;
            }
            declarations.extend(compile_content(document, content, options)?);
        }
    }
    Ok(declarations)
}

fn compile_content(
    document: &Document,
    content: &Content,
    options: &CompileOptions,
) -> Result<Vec<TypeDeclaration>, CompileError> {
    let Some(schema) = &content.schema else {
        return Ok(Vec::new());
    };
    let seed = format!("{}_{}", options.sdk_name, content.id);
    debug!("compiling {} ({})", seed, content.media_type);

    let root = compilation_root(schema, document.components());
    SchemaCompiler::new(&root, seed)
        .with_policy(options.reference_policy)
        .compile()
}

fn client_declaration(options: &CompileOptions) -> ClientDeclaration {
    let user_agent = options
        .user_agent
        .clone()
        .unwrap_or_else(|| options.sdk_name.clone());

    let mut headers = IndexMap::new();
    headers.insert("user-agent".to_string(), user_agent);
    headers.insert("accept".to_string(), "application/json".to_string());

    ClientDeclaration {
        name: to_pascal(&options.sdk_name),
        instance_name: options.sdk_name.clone(),
        base_url: options.base_url.clone(),
        headers,
        timeout_secs: options.timeout_secs,
        auth: AuthSetter::default(),
    }
}
