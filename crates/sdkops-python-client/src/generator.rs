use log::debug;
use sdkops_core::error::EmitError;
use sdkops_core::ir::SdkIr;
use sdkops_core::{Emitter, GeneratedFile};

use crate::emitters;

/// Python client emitter: one `{instance_name}.py` module built on httpx.
pub struct PythonClientEmitter;

impl Emitter for PythonClientEmitter {
    fn id(&self) -> &'static str {
        "python-client"
    }

    fn emit(&self, ir: &SdkIr) -> Result<Vec<GeneratedFile>, EmitError> {
        if ir.client.instance_name.is_empty() {
            return Err(EmitError::Other(
                "the python client needs a non-empty sdk name".to_string(),
            ));
        }
        let path = format!("{}.py", ir.client.instance_name);
        let content = emitters::emit_module(ir)?;
        debug!("rendered {path} ({} bytes)", content.len());
        Ok(vec![GeneratedFile { path, content }])
    }
}
