use indexmap::IndexMap;
use serde_json::Value;

use crate::error::TransformError;
use crate::ir::{
    IrAliasSchema, IrEnumSchema, IrField, IrObjectSchema, IrSchema, IrType, NormalizedName,
    SchemaRef,
};
use crate::parse::ref_resolve::ref_target;
use crate::parse::schema::{ObjectSchema, ScalarSchema, ScalarType, SchemaKind, SchemaNode};

use super::hooks::SchemaHooks;
use super::name_normalizer::{class_name, normalize_name, split_schema_name};

/// Whether a named schema becomes a declaration of its own.
///
/// Objects with properties (or with no shape at all) and string enums are
/// models; everything else is a root model that can be inlined at its uses.
pub fn is_model(node: &SchemaNode) -> bool {
    match &node.kind {
        SchemaKind::Object(obj) => {
            !obj.properties.is_empty()
                || (obj.additional_properties.is_none()
                    && !node.extensions.preserve_unknown_fields())
        }
        SchemaKind::Scalar(scalar) => string_enum_variants(scalar).is_some(),
        _ => false,
    }
}

/// Translates the named schemas of one merged document.
pub struct SchemaResolver<'a> {
    bucket: &'a str,
    nodes: &'a IndexMap<String, SchemaNode>,
    hooks: &'a dyn SchemaHooks,
    collapse_root_models: bool,
    /// Schema currently being translated, for error messages.
    current: String,
    /// Root models being inlined, to stop on reference cycles.
    inlining: Vec<String>,
}

impl<'a> SchemaResolver<'a> {
    pub fn new(
        bucket: &'a str,
        nodes: &'a IndexMap<String, SchemaNode>,
        hooks: &'a dyn SchemaHooks,
        collapse_root_models: bool,
    ) -> Self {
        Self {
            bucket,
            nodes,
            hooks,
            collapse_root_models,
            current: String::new(),
            inlining: Vec::new(),
        }
    }

    /// Module and class a schema name maps to, with the bucket as the first
    /// namespace segment.
    pub fn schema_ref(&self, name: &str) -> SchemaRef {
        let (segments, class) = split_schema_name(name);
        let mut namespace = Vec::with_capacity(segments.len() + 1);
        namespace.push(self.bucket.to_string());
        namespace.extend(segments);
        SchemaRef {
            namespace,
            name: class,
        }
    }

    /// Translate one named schema. Returns `None` for root models that are
    /// inlined at their uses instead of declared.
    pub fn resolve_schema(&mut self, name: &str) -> Result<Option<IrSchema>, TransformError> {
        let nodes = self.nodes;
        let Some(node) = nodes.get(name) else {
            return Err(TransformError::UnresolvedRef {
                schema: name.to_string(),
                reference: name.to_string(),
            });
        };
        if self.collapse_root_models && !is_model(node) {
            log::debug!("Collapsing root model {name}");
            return Ok(None);
        }

        self.current = name.to_string();
        let class = self.schema_ref(name).name;
        let schema = match &node.kind {
            SchemaKind::Object(obj) if is_model(node) => {
                IrSchema::Object(self.resolve_object(class_name(&class), node, obj)?)
            }
            SchemaKind::Scalar(scalar) if string_enum_variants(scalar).is_some() => {
                IrSchema::Enum(enum_schema(class_name(&class), node, scalar))
            }
            _ => IrSchema::Alias(IrAliasSchema {
                name: class_name(&class),
                description: node.description.clone(),
                target: self.resolve_type(node, &class)?,
            }),
        };
        Ok(Some(schema))
    }

    /// Convert a schema node to an `IrType`. `context` is the class name
    /// suggested for anything inline that ends up promoted.
    pub fn resolve_type(
        &mut self,
        node: &SchemaNode,
        context: &str,
    ) -> Result<IrType, TransformError> {
        match &node.kind {
            SchemaKind::Reference(ref_path) => self.resolve_reference(ref_path, context),
            SchemaKind::Array(items) => Ok(IrType::Array(Box::new(
                self.resolve_type(items, &format!("{context}Item"))?,
            ))),
            SchemaKind::Scalar(scalar) => Ok(match string_enum_variants(scalar) {
                Some(_) => IrType::Enum(enum_schema(class_name(context), node, scalar)),
                None => scalar_type(scalar),
            }),
            SchemaKind::Object(obj) if !obj.properties.is_empty() => Ok(IrType::Object(Box::new(
                self.resolve_object(class_name(context), node, obj)?,
            ))),
            SchemaKind::Object(obj) => match &obj.additional_properties {
                Some(values) => Ok(IrType::Map(Box::new(self.resolve_type(values, context)?))),
                None => Ok(IrType::Map(Box::new(IrType::Any))),
            },
            SchemaKind::Union(variants) => {
                let mut resolved = Vec::with_capacity(variants.len());
                for variant in variants {
                    match self.resolve_type(variant, context)? {
                        IrType::Union(nested) => {
                            for t in nested {
                                push_unique(&mut resolved, t);
                            }
                        }
                        t => push_unique(&mut resolved, t),
                    }
                }
                if resolved.len() == 1 {
                    return Ok(resolved.remove(0));
                }
                Ok(IrType::Union(resolved))
            }
            SchemaKind::Any => Ok(IrType::Any),
        }
    }

    fn resolve_reference(&mut self, ref_path: &str, context: &str) -> Result<IrType, TransformError> {
        let target = ref_target(ref_path)?;
        let nodes = self.nodes;
        let Some(node) = nodes.get(target) else {
            return Err(TransformError::UnresolvedRef {
                schema: self.current.clone(),
                reference: ref_path.to_string(),
            });
        };

        if !self.collapse_root_models || is_model(node) {
            return Ok(IrType::Ref(self.schema_ref(target)));
        }
        if self.inlining.iter().any(|name| name == target) {
            return Ok(IrType::Any);
        }

        self.inlining.push(target.to_string());
        let resolved = self.resolve_type(node, context);
        self.inlining.pop();
        resolved
    }

    fn resolve_object(
        &mut self,
        name: NormalizedName,
        node: &SchemaNode,
        obj: &ObjectSchema,
    ) -> Result<IrObjectSchema, TransformError> {
        let mut fields = Vec::with_capacity(obj.properties.len());
        for (prop_name, prop) in &obj.properties {
            let mut field = IrField {
                name: normalize_name(prop_name),
                original_name: prop_name.clone(),
                field_type: self.resolve_type(prop, &suggested_class_name(prop_name))?,
                required: obj.required.contains(prop_name),
                nullable: prop.nullable,
                description: prop.description.clone(),
                default: prop.default.clone(),
                read_only: prop.read_only,
            };
            self.hooks.on_field(&mut field);
            fields.push(field);
        }
        Ok(IrObjectSchema {
            name,
            description: node.description.clone(),
            fields,
        })
    }
}

/// Class name for something inline under a property: `from` → `From`.
fn suggested_class_name(property: &str) -> String {
    let pascal = normalize_name(property).pascal_case;
    if pascal.is_empty() || pascal.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("Model{pascal}");
    }
    pascal
}

fn string_enum_variants(scalar: &ScalarSchema) -> Option<Vec<String>> {
    if scalar.scalar_type != ScalarType::String {
        return None;
    }
    let variants: Vec<String> = scalar
        .enum_values
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    (!variants.is_empty()).then_some(variants)
}

fn enum_schema(name: NormalizedName, node: &SchemaNode, scalar: &ScalarSchema) -> IrEnumSchema {
    IrEnumSchema {
        name,
        description: node.description.clone(),
        variants: string_enum_variants(scalar).unwrap_or_default(),
    }
}

fn scalar_type(scalar: &ScalarSchema) -> IrType {
    match scalar.scalar_type {
        ScalarType::String => match scalar.format.as_deref() {
            Some("date-time") => IrType::DateTime,
            Some("date") => IrType::Date,
            Some("binary") => IrType::Binary,
            _ => IrType::String,
        },
        ScalarType::Integer => IrType::Integer,
        ScalarType::Number => IrType::Number,
        ScalarType::Boolean => IrType::Boolean,
        ScalarType::Null => IrType::Null,
    }
}

fn push_unique(types: &mut Vec<IrType>, t: IrType) {
    if !types.contains(&t) {
        types.push(t);
    }
}
