use serde_json::Value;

use super::types::{NormalizedName, SchemaRef};

/// A resolved schema in the IR.
#[derive(Debug, Clone, PartialEq)]
pub enum IrSchema {
    Object(IrObjectSchema),
    Enum(IrEnumSchema),
    Alias(IrAliasSchema),
}

impl IrSchema {
    pub fn name(&self) -> &NormalizedName {
        match self {
            IrSchema::Object(o) => &o.name,
            IrSchema::Enum(e) => &e.name,
            IrSchema::Alias(a) => &a.name,
        }
    }

    /// The class name as written in the target module.
    pub fn class_name(&self) -> &str {
        &self.name().original
    }
}

/// An object schema with typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct IrObjectSchema {
    pub name: NormalizedName,
    pub description: Option<String>,
    pub fields: Vec<IrField>,
}

/// A field on an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct IrField {
    pub name: NormalizedName,
    /// Property name as it appears on the wire.
    pub original_name: String,
    pub field_type: IrType,
    pub required: bool,
    pub nullable: bool,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub read_only: bool,
}

impl IrField {
    /// Whether the target type must admit `None`.
    pub fn is_optional(&self) -> bool {
        !self.required || self.nullable || self.field_type.is_nullable()
    }
}

/// A string enum schema.
#[derive(Debug, Clone, PartialEq)]
pub struct IrEnumSchema {
    pub name: NormalizedName,
    pub description: Option<String>,
    pub variants: Vec<String>,
}

/// A named non-object schema kept as its own declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct IrAliasSchema {
    pub name: NormalizedName,
    pub description: Option<String>,
    pub target: IrType,
}

/// A resolved type reference.
#[derive(Debug, Clone, PartialEq)]
pub enum IrType {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    DateTime,
    Date,
    Binary,
    Array(Box<IrType>),
    /// Mapping from string keys to values of the inner type.
    Map(Box<IrType>),
    Ref(SchemaRef),
    Union(Vec<IrType>),
    /// Inline object awaiting promotion; `name` holds the suggested class name.
    Object(Box<IrObjectSchema>),
    /// Inline string enum awaiting promotion.
    Enum(IrEnumSchema),
    Any,
}

impl IrType {
    pub fn is_map(&self) -> bool {
        matches!(self, IrType::Map(_))
    }

    /// A union that admits null, or null itself.
    pub fn is_nullable(&self) -> bool {
        match self {
            IrType::Null => true,
            IrType::Union(variants) => variants.iter().any(|v| *v == IrType::Null),
            _ => false,
        }
    }

    /// Every schema reference inside this type.
    pub fn refs(&self) -> Vec<&SchemaRef> {
        let mut out = Vec::new();
        self.collect_refs(&mut out);
        out
    }

    fn collect_refs<'a>(&'a self, out: &mut Vec<&'a SchemaRef>) {
        match self {
            IrType::Ref(r) => out.push(r),
            IrType::Array(inner) | IrType::Map(inner) => inner.collect_refs(out),
            IrType::Union(variants) => {
                for v in variants {
                    v.collect_refs(out);
                }
            }
            IrType::Object(obj) => {
                for field in &obj.fields {
                    field.field_type.collect_refs(out);
                }
            }
            _ => {}
        }
    }
}
