pub mod client;
pub mod models;

use minijinja::{Environment, context};
use sdkops_core::error::EmitError;
use sdkops_core::ir::{SdkIr, TypeDeclaration};

use crate::type_mapper::mentions_any;

/// Escape triple-quote sequences that would prematurely close Python docstrings.
fn escape_docstring(value: String) -> String {
    value.replace("\"\"\"", "\\\"\\\"\\\"")
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_filter("escape_docstring", escape_docstring);
    env.add_template("module.py.j2", include_str!("../../templates/module.py.j2"))
        .expect("template should be valid");
    env.add_template("models.py.j2", include_str!("../../templates/models.py.j2"))
        .expect("template should be valid");
    env.add_template("client.py.j2", include_str!("../../templates/client.py.j2"))
        .expect("template should be valid");
    env
}

/// Emit the single client module: record classes, aliases, the client class
/// and its module-level instance.
pub fn emit_module(ir: &SdkIr) -> Result<String, EmitError> {
    let env = environment();
    let tmpl = env
        .get_template("module.py.j2")
        .map_err(|e| EmitError::Template(e.to_string()))?;

    tmpl.render(context! {
        title => ir.info.title.clone(),
        version => ir.info.version.clone(),
        description => ir.info.description.clone(),
        uses_any => uses_any(ir),
        declarations => models::declaration_contexts(ir),
        client => client::client_context(ir),
        methods => client::method_contexts(ir),
    })
    .map_err(|e| EmitError::Template(e.to_string()))
}

fn uses_any(ir: &SdkIr) -> bool {
    let in_declarations = ir.declarations.iter().any(|decl| match decl {
        TypeDeclaration::Alias(alias) => mentions_any(&alias.target),
        TypeDeclaration::Record(record) => record.fields.iter().any(|f| mentions_any(&f.field_type)),
    });
    let in_methods = ir.methods.iter().any(|m| {
        mentions_any(&m.return_type) || m.parameters.iter().any(|p| mentions_any(&p.param_type))
    });
    in_declarations || in_methods
}
