use std::collections::{BTreeSet, HashMap, HashSet};

use kubemodel_core::GeneratorOptions;
use kubemodel_core::error::GeneratorError;
use kubemodel_core::ir::{
    IrAliasSchema, IrEnumSchema, IrField, IrModule, IrObjectSchema, IrSchema, IrType, SchemaRef,
};
use minijinja::{Environment, context};
use serde::Serialize;
use serde_json::Value;

use super::template_error;
use crate::layout::{Arg, Layout};
use crate::literal::{python_value, quote};
use crate::names::{enum_member_name, field_name};
use crate::type_mapper::TypeMapper;

const TEMPLATE: &str = "models.py.j2";

const BODY_INDENT: usize = 4;

/// Template environment holding the module template.
pub fn environment() -> Result<Environment<'static>, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template(TEMPLATE, include_str!("../../templates/models.py.j2"))
        .map_err(template_error)?;
    Ok(env)
}

#[derive(Debug, Serialize)]
struct ClassContext {
    name: String,
    lines: Vec<String>,
}

/// Render one IR module as a Pydantic v2 source unit.
///
/// Classes are declared in `rank` order; schemas missing from it go last.
pub fn emit_module(
    env: &Environment<'_>,
    module: &IrModule,
    rank: &HashMap<SchemaRef, usize>,
    options: &GeneratorOptions,
) -> Result<String, GeneratorError> {
    let mut schemas: Vec<&IrSchema> = module.schemas.iter().collect();
    schemas.sort_by_key(|schema| {
        let key = SchemaRef {
            namespace: module.namespace.clone(),
            name: schema.class_name().to_string(),
        };
        rank.get(&key).copied().unwrap_or(usize::MAX)
    });

    let referenced: BTreeSet<&[String]> = module
        .schemas
        .iter()
        .flat_map(schema_types)
        .flat_map(IrType::refs)
        .map(|r| r.namespace.as_slice())
        .collect();

    let mut emitter = ModuleEmitter {
        mapper: TypeMapper::new(&module.namespace, referenced),
        layout: Layout {
            line_length: options.line_length,
            prefer_double: options.use_double_quotes,
            wrap_strings: options.wrap_string_literal,
        },
        use_default_kwarg: options.use_default_kwarg,
        pydantic: BTreeSet::new(),
        uses_enum: false,
    };
    let classes: Vec<ClassContext> = schemas.into_iter().map(|s| emitter.class(s)).collect();

    let mut import_groups = vec![emitter.mapper.stdlib_imports(emitter.uses_enum)];
    if !emitter.pydantic.is_empty() {
        let names: Vec<&str> = emitter.pydantic.iter().copied().collect();
        import_groups.push(vec![format!("from pydantic import {}", names.join(", "))]);
    }
    import_groups.push(emitter.mapper.relative_imports());
    import_groups.retain(|group| !group.is_empty());

    let tmpl = env.get_template(TEMPLATE).map_err(template_error)?;
    tmpl.render(context! {
        import_groups => import_groups,
        classes => classes,
    })
    .map_err(template_error)
}

fn schema_types(schema: &IrSchema) -> Vec<&IrType> {
    match schema {
        IrSchema::Object(obj) => obj.fields.iter().map(|f| &f.field_type).collect(),
        IrSchema::Alias(alias) => vec![&alias.target],
        IrSchema::Enum(_) => Vec::new(),
    }
}

struct ModuleEmitter {
    mapper: TypeMapper,
    layout: Layout,
    use_default_kwarg: bool,
    pydantic: BTreeSet<&'static str>,
    uses_enum: bool,
}

impl ModuleEmitter {
    fn class(&mut self, schema: &IrSchema) -> ClassContext {
        let lines = match schema {
            IrSchema::Object(obj) => self.object(obj),
            IrSchema::Enum(e) => self.enumeration(e),
            IrSchema::Alias(alias) => self.root_model(alias),
        };
        ClassContext {
            name: schema.class_name().to_string(),
            lines,
        }
    }

    fn object(&mut self, obj: &IrObjectSchema) -> Vec<String> {
        self.pydantic.insert("BaseModel");
        let mut lines = vec![format!("class {}(BaseModel):", obj.name.original)];
        if obj.fields.is_empty() {
            lines.push(format!("{}pass", " ".repeat(BODY_INDENT)));
        }
        for field in &obj.fields {
            lines.extend(self.field(field));
        }
        lines
    }

    fn field(&mut self, field: &IrField) -> Vec<String> {
        let (attr, alias) = field_name(&field.original_name);
        let mut hint = self.mapper.python_type(&field.field_type);
        if field.is_optional() {
            hint = self.mapper.optional(&hint);
        }
        let target = format!("{attr}: {hint}");

        let prefer_double = self.layout.prefer_double;
        let default = match (&field.default, field.required) {
            (None, true) => None,
            (value, _) => Some(python_value(value.as_ref().unwrap_or(&Value::Null), prefer_double)),
        };

        let mut args = Vec::new();
        if let Some(alias) = &alias {
            args.push(Arg::code("alias", quote(alias, prefer_double)));
        }
        if let Some(description) = &field.description {
            args.push(Arg::text("description", description.clone()));
        }

        if args.is_empty() {
            return self.layout.assignment(BODY_INDENT, &target, default.as_deref());
        }

        let leading = match default {
            None => Arg::positional("..."),
            Some(value) if self.use_default_kwarg => Arg::code("default", value),
            Some(value) => Arg::positional(value),
        };
        args.insert(0, leading);
        self.pydantic.insert("Field");
        self.layout.field_call(BODY_INDENT, &target, &args)
    }

    fn enumeration(&mut self, e: &IrEnumSchema) -> Vec<String> {
        self.uses_enum = true;
        let mut lines = vec![format!("class {}(Enum):", e.name.original)];
        if e.variants.is_empty() {
            lines.push(format!("{}pass", " ".repeat(BODY_INDENT)));
        }

        let mut taken: HashSet<String> = HashSet::new();
        for value in &e.variants {
            let base = enum_member_name(value);
            let mut member = base.clone();
            let mut n = 1;
            while !taken.insert(member.clone()) {
                member = format!("{base}_{n}");
                n += 1;
            }
            lines.push(format!(
                "{}{member} = {}",
                " ".repeat(BODY_INDENT),
                quote(value, self.layout.prefer_double)
            ));
        }
        lines
    }

    fn root_model(&mut self, alias: &IrAliasSchema) -> Vec<String> {
        self.pydantic.insert("RootModel");
        let hint = self.mapper.python_type(&alias.target);
        let mut lines = vec![format!("class {}(RootModel[{hint}]):", alias.name.original)];
        let target = format!("root: {hint}");
        match &alias.description {
            Some(description) => {
                self.pydantic.insert("Field");
                lines.extend(self.layout.field_call(
                    BODY_INDENT,
                    &target,
                    &[Arg::positional("..."), Arg::text("description", description.clone())],
                ));
            }
            None => lines.extend(self.layout.assignment(BODY_INDENT, &target, None)),
        }
        lines
    }
}
