use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::extensions::Extensions;

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
    #[serde(other)]
    Unknown,
}

/// The `type` field can be a single type or an array of types.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaNode>),
}

/// Scalar JSON types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarSchema {
    pub scalar_type: ScalarType,
    pub format: Option<String>,
    pub enum_values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    pub properties: IndexMap<String, SchemaNode>,
    pub required: Vec<String>,
    /// Value schema for open-ended keys; `additionalProperties: true` maps to `Any`.
    pub additional_properties: Option<Box<SchemaNode>>,
}

/// Shape of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Object(ObjectSchema),
    Array(Box<SchemaNode>),
    Scalar(ScalarSchema),
    Reference(String),
    Union(Vec<SchemaNode>),
    Any,
}

/// A schema node with its common annotations and vendor extensions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "WireSchema")]
pub struct SchemaNode {
    pub kind: SchemaKind,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub nullable: bool,
    pub read_only: bool,
    pub extensions: Extensions,
}

impl SchemaNode {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
            default: None,
            nullable: false,
            read_only: false,
            extensions: Extensions::new(),
        }
    }

    pub fn scalar(scalar_type: ScalarType) -> Self {
        Self::new(SchemaKind::Scalar(ScalarSchema {
            scalar_type,
            format: None,
            enum_values: Vec::new(),
        }))
    }

    pub fn reference(ref_path: impl Into<String>) -> Self {
        Self::new(SchemaKind::Reference(ref_path.into()))
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match &self.kind {
            SchemaKind::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectSchema> {
        match &mut self.kind {
            SchemaKind::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Visit this node and every nested node, children before parents.
    pub fn walk_mut(&mut self, visit: &mut dyn FnMut(&mut SchemaNode)) {
        match &mut self.kind {
            SchemaKind::Object(obj) => {
                for prop in obj.properties.values_mut() {
                    prop.walk_mut(visit);
                }
                if let Some(additional) = obj.additional_properties.as_mut() {
                    additional.walk_mut(visit);
                }
            }
            SchemaKind::Array(items) => items.walk_mut(visit),
            SchemaKind::Union(variants) => {
                for variant in variants {
                    variant.walk_mut(visit);
                }
            }
            SchemaKind::Scalar(_) | SchemaKind::Reference(_) | SchemaKind::Any => {}
        }
        visit(self);
    }
}

/// The schema object as it appears on the wire (OpenAPI 3.x superset).
#[derive(Debug, Default, Deserialize)]
struct WireSchema {
    #[serde(rename = "$ref")]
    ref_path: Option<String>,

    #[serde(rename = "type")]
    schema_type: Option<TypeSet>,

    format: Option<String>,

    description: Option<String>,

    #[serde(rename = "default")]
    default_value: Option<Value>,

    nullable: Option<bool>,

    #[serde(default)]
    properties: IndexMap<String, SchemaNode>,

    #[serde(default)]
    required: Vec<String>,

    #[serde(rename = "additionalProperties")]
    additional_properties: Option<AdditionalProperties>,

    items: Option<Box<SchemaNode>>,

    #[serde(rename = "allOf", default)]
    all_of: Vec<SchemaNode>,

    #[serde(rename = "oneOf", default)]
    one_of: Vec<SchemaNode>,

    #[serde(rename = "anyOf", default)]
    any_of: Vec<SchemaNode>,

    #[serde(rename = "enum", default)]
    enum_values: Vec<Value>,

    #[serde(rename = "readOnly")]
    read_only: Option<bool>,

    #[serde(flatten)]
    rest: IndexMap<String, Value>,
}

impl From<WireSchema> for SchemaNode {
    fn from(mut wire: WireSchema) -> Self {
        let extensions: Extensions = std::mem::take(&mut wire.rest).into_iter().collect();
        let description = wire.description.take();
        let default = wire.default_value.take();
        let nullable = wire.nullable.unwrap_or(false);
        let read_only = wire.read_only.unwrap_or(false);

        // `allOf: [{$ref}]` is how v3 documents attach a description or
        // default to a reference; the wrapper adds nothing else.
        if wire.all_of.len() == 1 && wire.ref_path.is_none() {
            let inner = wire.all_of.remove(0);
            return SchemaNode {
                kind: inner.kind,
                description: description.or(inner.description),
                default: default.or(inner.default),
                nullable: nullable || inner.nullable,
                read_only: read_only || inner.read_only,
                extensions: if extensions.is_empty() {
                    inner.extensions
                } else {
                    extensions
                },
            };
        }

        let (kind, type_nullable) = wire_kind(wire, &extensions);
        SchemaNode {
            kind,
            description,
            default,
            nullable: nullable || type_nullable,
            read_only,
            extensions,
        }
    }
}

fn wire_kind(wire: WireSchema, extensions: &Extensions) -> (SchemaKind, bool) {
    if let Some(ref_path) = wire.ref_path {
        return (SchemaKind::Reference(ref_path), false);
    }
    if extensions.int_or_string() {
        return (
            SchemaKind::Union(vec![
                SchemaNode::scalar(ScalarType::Integer),
                SchemaNode::scalar(ScalarType::String),
            ]),
            false,
        );
    }
    if !wire.one_of.is_empty() {
        return (SchemaKind::Union(wire.one_of), false);
    }
    if !wire.any_of.is_empty() {
        return (SchemaKind::Union(wire.any_of), false);
    }
    if !wire.all_of.is_empty() {
        return (merge_all_of(wire.all_of), false);
    }

    match wire.schema_type.clone() {
        Some(TypeSet::Single(t)) => (kind_for_type(t, wire), false),
        Some(TypeSet::Multiple(types)) => {
            let has_null = types.contains(&SchemaType::Null);
            let non_null: Vec<SchemaType> = types
                .into_iter()
                .filter(|t| *t != SchemaType::Null)
                .collect();
            match non_null.as_slice() {
                [] => (kind_for_type(SchemaType::Null, wire), false),
                [single] => (kind_for_type(*single, wire), has_null),
                _ => {
                    let variants = non_null
                        .iter()
                        .map(|t| SchemaNode::new(kind_for_type(*t, WireSchema::default())))
                        .collect();
                    (SchemaKind::Union(variants), has_null)
                }
            }
        }
        None if !wire.properties.is_empty() || wire.additional_properties.is_some() => {
            (kind_for_type(SchemaType::Object, wire), false)
        }
        None if wire.items.is_some() => (kind_for_type(SchemaType::Array, wire), false),
        None if !wire.enum_values.is_empty() => (kind_for_type(SchemaType::String, wire), false),
        None => (SchemaKind::Any, false),
    }
}

fn kind_for_type(schema_type: SchemaType, wire: WireSchema) -> SchemaKind {
    let scalar = |scalar_type| {
        SchemaKind::Scalar(ScalarSchema {
            scalar_type,
            format: wire.format.clone(),
            enum_values: wire.enum_values.clone(),
        })
    };
    match schema_type {
        SchemaType::String => scalar(ScalarType::String),
        SchemaType::Integer => scalar(ScalarType::Integer),
        SchemaType::Number => scalar(ScalarType::Number),
        SchemaType::Boolean => scalar(ScalarType::Boolean),
        SchemaType::Null => scalar(ScalarType::Null),
        SchemaType::Array => SchemaKind::Array(
            wire.items
                .unwrap_or_else(|| Box::new(SchemaNode::new(SchemaKind::Any))),
        ),
        SchemaType::Object => SchemaKind::Object(ObjectSchema {
            properties: wire.properties,
            required: wire.required,
            additional_properties: match wire.additional_properties {
                Some(AdditionalProperties::Schema(s)) => Some(s),
                Some(AdditionalProperties::Bool(true)) => {
                    Some(Box::new(SchemaNode::new(SchemaKind::Any)))
                }
                Some(AdditionalProperties::Bool(false)) | None => None,
            },
        }),
        SchemaType::Unknown => SchemaKind::Any,
    }
}

/// Flatten a multi-member `allOf` into one object from its inline object
/// members. Without any object member the first member's shape is kept.
fn merge_all_of(members: Vec<SchemaNode>) -> SchemaKind {
    let mut merged = ObjectSchema::default();
    let mut found_object = false;
    let mut fallback = None;

    for member in members {
        match member.kind {
            SchemaKind::Object(obj) => {
                found_object = true;
                merged.properties.extend(obj.properties);
                for name in obj.required {
                    if !merged.required.contains(&name) {
                        merged.required.push(name);
                    }
                }
                if obj.additional_properties.is_some() {
                    merged.additional_properties = obj.additional_properties;
                }
            }
            other => {
                fallback.get_or_insert(other);
            }
        }
    }

    if found_object {
        SchemaKind::Object(merged)
    } else {
        fallback.unwrap_or(SchemaKind::Any)
    }
}
