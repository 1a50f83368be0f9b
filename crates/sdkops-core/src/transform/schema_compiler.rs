use std::collections::HashSet;

use log::{debug, trace, warn};
use serde_json::{Value, json};

use crate::config::ReferencePolicy;
use crate::error::{CompileError, ResolveError};
use crate::ir::{Field, Record, ScalarAlias, TypeDeclaration, TypeRef};
use crate::parse::ref_resolve::{RefResolver, is_properties_pointer};
use crate::parse::schema::{ObjectNode, SchemaNode, SchemaOrRef};

use super::defaults::synthesize_default;
use super::name_normalizer::to_pascal;

/// Compiles one JSON Schema root into type declarations.
///
/// A compiler is single-use: it owns the resolver (and so the resolver's
/// caches) for exactly one compilation root.
pub struct SchemaCompiler<'a> {
    resolver: RefResolver<'a>,
    root_seed: String,
    policy: ReferencePolicy,
    declarations: Vec<TypeDeclaration>,
    emitted_refs: HashSet<String>,
    in_progress: Vec<Visit>,
}

/// The first `$ref` followed on the way to a structural node.
struct Reference {
    pointer: String,
    name: String,
    on_properties_path: bool,
}

/// A referenced node whose compilation has not finished yet.
struct Visit {
    pointer: String,
    /// Name of the record being declared for it; `None` for arrays, unions
    /// and scalars.
    record: Option<String>,
}

impl<'a> SchemaCompiler<'a> {
    pub fn new(root: &'a Value, root_seed: impl Into<String>) -> Self {
        Self {
            resolver: RefResolver::new(root),
            root_seed: root_seed.into(),
            policy: ReferencePolicy::default(),
            declarations: Vec::new(),
            emitted_refs: HashSet::new(),
            in_progress: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: ReferencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Compile the root. Nested records come before the records that use them.
    ///
    /// An object root becomes a record named by the PascalCase seed; anything
    /// else becomes an alias named by the raw seed.
    pub fn compile(mut self) -> Result<Vec<TypeDeclaration>, CompileError> {
        let seed = vec![self.root_seed.clone()];
        let root = self.resolver.root();

        let (node, reference) = self.dereference(root)?;
        match node {
            SchemaNode::Object(object) => {
                let name = seed_name(&seed);
                self.enter(reference.as_ref(), Some(&name), |c| {
                    c.compile_record(&seed, name.clone(), object)
                })?;
            }
            other => {
                let target =
                    self.enter(reference.as_ref(), None, |c| c.compile_inline(&seed, other))?;
                let name = self.root_seed.clone();
                trace!("alias {name} = {target}");
                self.declarations
                    .push(TypeDeclaration::Alias(ScalarAlias { name, target }));
            }
        }
        Ok(self.declarations)
    }

    fn compile_record(
        &mut self,
        seed: &[String],
        name: String,
        object: ObjectNode<'a>,
    ) -> Result<(), CompileError> {
        let mut record = Record::new(name);
        for (property, schema) in object.properties() {
            let field_seed = child_seed(seed, property);
            let field_type = self.compile_field_type(&field_seed, schema)?;
            let required = object.is_required(property);
            let default_value = if required {
                Value::Null
            } else {
                synthesize_default(field_type.members())
            };
            record.fields.push(Field {
                name: property.clone(),
                field_type,
                has_default: !required,
                default_value,
            });
        }
        trace!("record {} ({} fields)", record.name, record.fields.len());
        self.declarations.push(TypeDeclaration::Record(record));
        Ok(())
    }

    /// The type of a property of an enclosing record, emitting whatever
    /// declarations it needs along the way.
    fn compile_field_type(
        &mut self,
        seed: &[String],
        value: &'a Value,
    ) -> Result<TypeRef, CompileError> {
        let (node, reference) = self.dereference(value)?;
        if let Some(found) = self.revisit(reference.as_ref())? {
            return Ok(found);
        }
        let object = match node {
            SchemaNode::Object(object) => object,
            other => {
                return self.enter(reference.as_ref(), None, |c| c.compile_inline(seed, other));
            }
        };

        let Some(reference) = reference else {
            let name = seed_name(seed);
            self.compile_record(seed, name.clone(), object)?;
            return Ok(TypeRef::Named(name));
        };

        // A reference into the root's own properties tree names a record that
        // is declared at its natural location; only shared sections are
        // compiled again here.
        let name = to_pascal(&format!("{}_{}", self.root_seed, reference.name));
        if !reference.on_properties_path && self.should_emit(&reference.pointer, &name) {
            self.enter(Some(&reference), Some(&name), |c| {
                c.compile_record(seed, name.clone(), object)
            })?;
        }
        Ok(TypeRef::Named(name))
    }

    /// Types for array, anyOf and scalar nodes. Callers handle objects
    /// themselves; an object reaching here is declared under the seed name.
    fn compile_inline(
        &mut self,
        seed: &[String],
        node: SchemaNode<'a>,
    ) -> Result<TypeRef, CompileError> {
        match node {
            SchemaNode::Scalar(scalar) => Ok(scalar.into()),
            SchemaNode::Array { items } => self.compile_array(seed, items),
            SchemaNode::AnyOf(branches) => {
                let mut members = Vec::with_capacity(branches.len());
                let mut objects = 0usize;
                for branch in branches {
                    let (node, reference) = self.dereference(branch)?;
                    if let Some(found) = self.revisit(reference.as_ref())? {
                        members.push(found);
                        continue;
                    }
                    match node {
                        SchemaNode::Object(object) => {
                            objects += 1;
                            let mut name = seed_name(seed);
                            if objects > 1 {
                                name.push_str(&objects.to_string());
                            }
                            self.enter(reference.as_ref(), Some(&name), |c| {
                                c.compile_record(seed, name.clone(), object)
                            })?;
                            members.push(TypeRef::Named(name));
                        }
                        other => members.push(self.enter(reference.as_ref(), None, |c| {
                            c.compile_inline(seed, other)
                        })?),
                    }
                }
                Ok(TypeRef::union(members))
            }
            SchemaNode::Object(object) => {
                let name = seed_name(seed);
                self.compile_record(seed, name.clone(), object)?;
                Ok(TypeRef::Named(name))
            }
        }
    }

    fn compile_array(
        &mut self,
        seed: &[String],
        items: Option<&'a Value>,
    ) -> Result<TypeRef, CompileError> {
        let Some(items) = items else {
            return Err(CompileError::unsupported(
                &json!({"type": "array"}),
                "array schema without items",
            ));
        };
        let (node, reference) = self.dereference(items)?;
        if let Some(found) = self.revisit(reference.as_ref())? {
            return Ok(TypeRef::List(Box::new(found)));
        }
        let item_type = match node {
            SchemaNode::Object(object) => {
                let name = seed_name(seed);
                self.enter(reference.as_ref(), Some(&name), |c| {
                    c.compile_record(seed, name.clone(), object)
                })?;
                TypeRef::Named(name)
            }
            SchemaNode::AnyOf(_) => {
                return Err(CompileError::unsupported(
                    items,
                    "array items must declare a type",
                ));
            }
            other => self.enter(reference.as_ref(), None, |c| c.compile_inline(seed, other))?,
        };
        Ok(TypeRef::List(Box::new(item_type)))
    }

    /// Follow `$ref`s until a structural node is reached.
    fn dereference(
        &mut self,
        value: &'a Value,
    ) -> Result<(SchemaNode<'a>, Option<Reference>), CompileError> {
        let (node, pointer) = follow_refs(&mut self.resolver, value)?;
        let reference = match pointer {
            Some(pointer) => Some(Reference {
                name: self.resolver.name_from_pointer(pointer)?,
                on_properties_path: is_properties_pointer(pointer),
                pointer: pointer.to_string(),
            }),
            None => None,
        };
        Ok((node, reference))
    }

    /// A reference back into a node still being compiled. Records are referred
    /// to by name; any other kind would expand forever.
    fn revisit(&self, reference: Option<&Reference>) -> Result<Option<TypeRef>, CompileError> {
        let Some(reference) = reference else {
            return Ok(None);
        };
        let Some(visit) = self
            .in_progress
            .iter()
            .rev()
            .find(|v| v.pointer == reference.pointer)
        else {
            return Ok(None);
        };
        match &visit.record {
            Some(name) => {
                trace!("{} is being compiled; referring to {name}", reference.pointer);
                Ok(Some(TypeRef::Named(name.clone())))
            }
            None => Err(ResolveError::CircularRef(reference.pointer.clone()).into()),
        }
    }

    /// Run `compile` with the referenced node marked as in progress.
    fn enter<T>(
        &mut self,
        reference: Option<&Reference>,
        record: Option<&str>,
        compile: impl FnOnce(&mut Self) -> Result<T, CompileError>,
    ) -> Result<T, CompileError> {
        let Some(reference) = reference else {
            return compile(self);
        };
        self.in_progress.push(Visit {
            pointer: reference.pointer.clone(),
            record: record.map(str::to_string),
        });
        let result = compile(self);
        self.in_progress.pop();
        result
    }

    fn should_emit(&mut self, pointer: &str, name: &str) -> bool {
        match self.policy {
            ReferencePolicy::Duplicate => true,
            ReferencePolicy::Deduplicate => {
                let first = self.emitted_refs.insert(pointer.to_string());
                if !first {
                    warn!("skipping repeated declaration {name} for {pointer}");
                }
                first
            }
        }
    }
}

/// Name of the declaration [`SchemaCompiler::compile`] emits for `root`
/// under `seed`, without compiling it.
pub fn root_declaration_name(root: &Value, seed: &str) -> Result<String, CompileError> {
    let mut resolver = RefResolver::new(root);
    let (node, _) = follow_refs(&mut resolver, root)?;
    Ok(match node {
        SchemaNode::Object(_) => to_pascal(seed),
        _ => seed.to_string(),
    })
}

/// Collect the candidate types of a parameter schema without emitting any
/// declarations. Objects are plain maps here, and a schema without a
/// recognised kind contributes nothing.
pub fn collect_types<'a>(
    resolver: &mut RefResolver<'a>,
    value: &'a Value,
) -> Result<Vec<TypeRef>, CompileError> {
    collect_from(resolver, value, &mut Vec::new())
}

/// `visiting` holds the pointers on the path from the parameter schema down
/// to `value`.
fn collect_from<'a>(
    resolver: &mut RefResolver<'a>,
    value: &'a Value,
    visiting: &mut Vec<&'a str>,
) -> Result<Vec<TypeRef>, CompileError> {
    if value.get("type").is_none() && value.get("anyOf").is_none() && value.get("$ref").is_none()
    {
        return Ok(Vec::new());
    }
    let (node, pointer) = follow_refs(resolver, value)?;
    if let Some(pointer) = pointer {
        if visiting.contains(&pointer) {
            return Err(ResolveError::CircularRef(pointer.to_string()).into());
        }
        visiting.push(pointer);
    }

    let types = collect_node(resolver, node, visiting);

    if pointer.is_some() {
        visiting.pop();
    }
    types
}

fn collect_node<'a>(
    resolver: &mut RefResolver<'a>,
    node: SchemaNode<'a>,
    visiting: &mut Vec<&'a str>,
) -> Result<Vec<TypeRef>, CompileError> {
    let types = match node {
        SchemaNode::Scalar(scalar) => vec![scalar.into()],
        SchemaNode::Object(_) => vec![TypeRef::Map(Box::new(TypeRef::Any))],
        SchemaNode::Array { items } => {
            let item = match items {
                Some(items) => TypeRef::union(collect_from(resolver, items, visiting)?),
                None => TypeRef::Any,
            };
            vec![TypeRef::List(Box::new(item))]
        }
        SchemaNode::AnyOf(branches) => {
            let mut types = Vec::new();
            for branch in branches {
                types.extend(collect_from(resolver, branch, visiting)?);
            }
            types
        }
    };
    Ok(types)
}

/// The schema to compile a content entry against: the fragment itself with the
/// document's `components` merged in, so component pointers resolve.
pub fn compilation_root(schema: &Value, components: &Value) -> Value {
    let mut root = schema.clone();
    if let (Some(map), false) = (root.as_object_mut(), components.is_null()) {
        map.insert("components".to_string(), components.clone());
    }
    root
}

/// Returns the structural node and the first pointer followed, if any.
fn follow_refs<'a>(
    resolver: &mut RefResolver<'a>,
    value: &'a Value,
) -> Result<(SchemaNode<'a>, Option<&'a str>), CompileError> {
    let mut current = value;
    let mut chain: Vec<&'a str> = Vec::new();
    loop {
        match SchemaOrRef::classify(current)? {
            SchemaOrRef::Node(node) => return Ok((node, chain.first().copied())),
            SchemaOrRef::Ref(pointer) => {
                if chain.contains(&pointer) {
                    return Err(ResolveError::CircularRef(pointer.to_string()).into());
                }
                chain.push(pointer);
                debug!("following {pointer}");
                current = resolver.resolve(pointer)?;
            }
        }
    }
}

fn child_seed(seed: &[String], segment: &str) -> Vec<String> {
    let mut child = seed.to_vec();
    child.push(segment.to_string());
    child
}

fn seed_name(seed: &[String]) -> String {
    to_pascal(&seed.join("_"))
}
