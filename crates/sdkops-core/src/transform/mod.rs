pub mod base_url;
pub mod defaults;
pub mod method_synth;
pub mod name_normalizer;
pub mod schema_compiler;
pub mod spec_to_ir;

pub use base_url::resolve_base_url;
pub use method_synth::synthesize;
pub use schema_compiler::SchemaCompiler;
pub use spec_to_ir::{CompileOptions, compile};
