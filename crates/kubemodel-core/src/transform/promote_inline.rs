use std::collections::HashSet;

use crate::ir::{IrModule, IrSchema, IrType, SchemaRef};

use super::name_normalizer::class_name;

/// Promote inline `IrType::Object` and `IrType::Enum` values into named
/// schemas of the same module, replacing them with `IrType::Ref`.
///
/// Promoted schemas are placed before the schema that uses them, nested ones
/// first. A name already taken in the module gets a `Model` suffix, then
/// `Model1`, `Model2` and so on.
pub fn promote_inline_types(module: &mut IrModule) {
    let mut used_names: HashSet<String> = module
        .schemas
        .iter()
        .map(|s| s.class_name().to_string())
        .collect();

    let mut ordered: Vec<IrSchema> = Vec::with_capacity(module.schemas.len());

    for mut schema in std::mem::take(&mut module.schemas) {
        match &mut schema {
            IrSchema::Object(obj) => {
                for field in &mut obj.fields {
                    promote_type(
                        &mut field.field_type,
                        &module.namespace,
                        &mut ordered,
                        &mut used_names,
                    );
                }
            }
            IrSchema::Alias(alias) => {
                promote_type(
                    &mut alias.target,
                    &module.namespace,
                    &mut ordered,
                    &mut used_names,
                );
            }
            IrSchema::Enum(_) => {}
        }
        ordered.push(schema);
    }

    module.schemas = ordered;
}

/// Recursively walk an `IrType`, promoting inline objects and enums.
fn promote_type(
    ir_type: &mut IrType,
    namespace: &[String],
    new_schemas: &mut Vec<IrSchema>,
    used_names: &mut HashSet<String>,
) {
    match ir_type {
        IrType::Object(obj) => {
            let name = unique_name(&obj.name.original, used_names);
            for field in &mut obj.fields {
                promote_type(&mut field.field_type, namespace, new_schemas, used_names);
            }

            let mut promoted = (**obj).clone();
            promoted.name = class_name(&name);
            new_schemas.push(IrSchema::Object(promoted));

            *ir_type = IrType::Ref(SchemaRef {
                namespace: namespace.to_vec(),
                name,
            });
        }
        IrType::Enum(inline) => {
            let name = unique_name(&inline.name.original, used_names);
            let mut promoted = inline.clone();
            promoted.name = class_name(&name);
            new_schemas.push(IrSchema::Enum(promoted));

            *ir_type = IrType::Ref(SchemaRef {
                namespace: namespace.to_vec(),
                name,
            });
        }
        IrType::Array(inner) | IrType::Map(inner) => {
            promote_type(inner, namespace, new_schemas, used_names);
        }
        IrType::Union(variants) => {
            for variant in variants {
                promote_type(variant, namespace, new_schemas, used_names);
            }
        }
        _ => {}
    }
}

/// `base`, else `baseModel`, else `baseModel1`, `baseModel2`...
fn unique_name(base: &str, used_names: &mut HashSet<String>) -> String {
    if used_names.insert(base.to_string()) {
        return base.to_string();
    }
    let model = format!("{base}Model");
    if used_names.insert(model.clone()) {
        return model;
    }
    let mut i = 1;
    loop {
        let candidate = format!("{base}Model{i}");
        if used_names.insert(candidate.clone()) {
            return candidate;
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::*;
    use crate::transform::name_normalizer::normalize_name;

    fn field(name: &str, field_type: IrType) -> IrField {
        IrField {
            name: normalize_name(name),
            original_name: name.to_string(),
            field_type,
            required: false,
            nullable: false,
            description: None,
            default: None,
            read_only: false,
        }
    }

    fn object(name: &str, fields: Vec<IrField>) -> IrObjectSchema {
        IrObjectSchema {
            name: class_name(name),
            description: None,
            fields,
        }
    }

    fn inline_enum(name: &str, variants: &[&str]) -> IrType {
        IrType::Enum(IrEnumSchema {
            name: class_name(name),
            description: None,
            variants: variants.iter().map(|v| v.to_string()).collect(),
        })
    }

    fn module(schemas: Vec<IrSchema>) -> IrModule {
        IrModule {
            namespace: vec!["crd".to_string(), "io".to_string(), "v1".to_string()],
            schemas,
        }
    }

    fn names(module: &IrModule) -> Vec<&str> {
        module.schemas.iter().map(|s| s.class_name()).collect()
    }

    #[test]
    fn promotes_inline_object_in_field() {
        let mut m = module(vec![IrSchema::Object(object(
            "Rule",
            vec![field(
                "from",
                IrType::Array(Box::new(IrType::Object(Box::new(object(
                    "FromItem",
                    vec![field("source", IrType::String)],
                ))))),
            )],
        ))]);
        promote_inline_types(&mut m);

        assert_eq!(names(&m), vec!["FromItem", "Rule"]);
        let IrSchema::Object(rule) = &m.schemas[1] else {
            panic!("expected object");
        };
        match &rule.fields[0].field_type {
            IrType::Array(inner) => {
                assert!(matches!(inner.as_ref(), IrType::Ref(r) if r.name == "FromItem" && r.namespace == m.namespace));
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn nested_promotions_come_first() {
        let source = IrType::Object(Box::new(object("Source", vec![field("ip", IrType::String)])));
        let from = IrType::Object(Box::new(object("From", vec![field("source", source)])));
        let mut m = module(vec![IrSchema::Object(object("Rule", vec![field("from", from)]))]);
        promote_inline_types(&mut m);
        assert_eq!(names(&m), vec!["Source", "From", "Rule"]);
    }

    #[test]
    fn collisions_take_model_suffix() {
        let mut m = module(vec![
            IrSchema::Object(object(
                "DaemonSetUpdateStrategy",
                vec![field("type", inline_enum("Type", &["OnDelete", "RollingUpdate"]))],
            )),
            IrSchema::Object(object(
                "DeploymentStrategy",
                vec![field("type", inline_enum("Type", &["Recreate", "RollingUpdate"]))],
            )),
            IrSchema::Object(object(
                "StatefulSetUpdateStrategy",
                vec![field("type", inline_enum("Type", &["OnDelete", "RollingUpdate"]))],
            )),
        ]);
        promote_inline_types(&mut m);
        assert_eq!(
            names(&m),
            vec![
                "Type",
                "DaemonSetUpdateStrategy",
                "TypeModel",
                "DeploymentStrategy",
                "TypeModel1",
                "StatefulSetUpdateStrategy"
            ]
        );
    }

    #[test]
    fn existing_names_are_reserved() {
        let mut m = module(vec![
            IrSchema::Object(object(
                "Policy",
                vec![field(
                    "spec",
                    IrType::Object(Box::new(object("Spec", vec![field("a", IrType::String)]))),
                )],
            )),
            IrSchema::Object(object("Spec", vec![])),
        ]);
        promote_inline_types(&mut m);
        assert_eq!(names(&m), vec!["SpecModel", "Policy", "Spec"]);
    }

    #[test]
    fn union_variants_share_base_name() {
        let mut m = module(vec![IrSchema::Object(object(
            "Policy",
            vec![field(
                "spec",
                IrType::Union(vec![
                    IrType::Object(Box::new(object("Spec", vec![field("a", IrType::String)]))),
                    IrType::Object(Box::new(object("Spec", vec![field("b", IrType::String)]))),
                ]),
            )],
        ))]);
        promote_inline_types(&mut m);
        assert_eq!(names(&m), vec!["Spec", "SpecModel", "Policy"]);
    }

    #[test]
    fn scalars_untouched() {
        let mut m = module(vec![IrSchema::Object(object(
            "Plain",
            vec![field("labels", IrType::Map(Box::new(IrType::String)))],
        ))]);
        let before = m.schemas.clone();
        promote_inline_types(&mut m);
        assert_eq!(m.schemas, before);
    }
}
