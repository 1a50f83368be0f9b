pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod transform;

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Renders the compiled IR into source files for one target language.
pub trait Emitter {
    /// Short identifier used in progress output, e.g. `python-client`.
    fn id(&self) -> &'static str;

    fn emit(&self, ir: &ir::SdkIr) -> Result<Vec<GeneratedFile>, error::EmitError>;
}
