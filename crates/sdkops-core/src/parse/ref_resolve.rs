use std::collections::HashMap;

use log::trace;
use serde_json::Value;

use crate::error::ResolveError;

/// Resolves `#/a/b/c` JSON pointers against one document root.
///
/// Both caches live as long as the resolver, and a resolver is created per
/// compilation root, so two documents compiled in the same process never share
/// entries. Resolved targets are borrowed from the root, which keeps repeated
/// references to the same pointer pointing at the very same node.
#[derive(Debug)]
pub struct RefResolver<'a> {
    root: &'a Value,
    targets: HashMap<String, &'a Value>,
    names: HashMap<String, String>,
}

impl<'a> RefResolver<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self {
            root,
            targets: HashMap::new(),
            names: HashMap::new(),
        }
    }

    pub fn root(&self) -> &'a Value {
        self.root
    }

    /// Walk `pointer` from the root and return the node it addresses.
    pub fn resolve(&mut self, pointer: &str) -> Result<&'a Value, ResolveError> {
        if let Some(target) = self.targets.get(pointer) {
            trace!("resolve cache hit: {pointer}");
            return Ok(target);
        }

        let mut current = self.root;
        for segment in pointer_segments(pointer)? {
            current = step(current, &segment, pointer)?;
        }

        self.targets.insert(pointer.to_string(), current);
        Ok(current)
    }

    /// Derive the name chain a pointer stands for.
    ///
    /// Every key following a `properties` segment contributes one element.
    /// A terminal object reached without a `properties` segment right before it
    /// (`#/components/schemas/Address`, `#/definitions/address`) contributes its
    /// own key. Walking stops early, keeping the chain so far, as soon as it
    /// stands on a scalar schema.
    pub fn name_from_pointer(&mut self, pointer: &str) -> Result<String, ResolveError> {
        if let Some(name) = self.names.get(pointer) {
            trace!("name cache hit: {pointer}");
            return Ok(name.clone());
        }

        let segments = pointer_segments(pointer)?;
        let mut chain: Vec<&str> = Vec::new();
        let mut current = self.root;

        for (i, segment) in segments.iter().enumerate() {
            let next = segments.get(i + 1).map(String::as_str);
            let prev = i.checked_sub(1).map(|p| segments[p].as_str());

            let schema_type = if current.get("anyOf").is_some() {
                None
            } else {
                current.get("type").and_then(Value::as_str)
            };

            match schema_type {
                Some("string" | "integer" | "number" | "boolean") => break,
                Some("object") if segment == "properties" => {
                    if let Some(next) = next
                        && current
                            .get("properties")
                            .and_then(Value::as_object)
                            .is_some_and(|props| props.contains_key(next))
                    {
                        chain.push(next);
                    }
                }
                _ => {}
            }

            current = step(current, segment, pointer)?;

            if next.is_none()
                && prev != Some("properties")
                && segment != "properties"
                && current.get("type").and_then(Value::as_str) == Some("object")
            {
                chain.push(segment);
            }
        }

        let name = chain.join("_");
        self.names.insert(pointer.to_string(), name.clone());
        Ok(name)
    }
}

/// True when the pointer addresses something inside the root's own `properties`
/// tree rather than a shared section such as `components` or `definitions`.
pub fn is_properties_pointer(pointer: &str) -> bool {
    pointer
        .strip_prefix("#/")
        .and_then(|rest| rest.split('/').next())
        .is_some_and(|first| first == "properties")
}

/// Split a pointer into decoded segments. `#` and `#/` address the root.
fn pointer_segments(pointer: &str) -> Result<Vec<String>, ResolveError> {
    if pointer == "#" || pointer == "#/" {
        return Ok(Vec::new());
    }
    let rest = pointer
        .strip_prefix("#/")
        .ok_or_else(|| ResolveError::InvalidRefFormat(pointer.to_string()))?;
    Ok(rest.split('/').map(decode_segment).collect())
}

fn decode_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

fn step<'a>(current: &'a Value, segment: &str, pointer: &str) -> Result<&'a Value, ResolveError> {
    current
        .as_object()
        .and_then(|map| map.get(segment))
        .ok_or_else(|| ResolveError::RefTargetNotFound {
            pointer: pointer.to_string(),
            segment: segment.to_string(),
        })
}
