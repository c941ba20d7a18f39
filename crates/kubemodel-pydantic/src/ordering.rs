use std::collections::{HashMap, HashSet};

use kubemodel_core::ir::{IrModelSet, IrSchema, IrType, SchemaRef};

/// Schemas a declaration refers to, other than itself.
fn dependencies(owner: &SchemaRef, schema: &IrSchema) -> Vec<SchemaRef> {
    let types: Vec<&IrType> = match schema {
        IrSchema::Object(obj) => obj.fields.iter().map(|f| &f.field_type).collect(),
        IrSchema::Alias(alias) => vec![&alias.target],
        IrSchema::Enum(_) => Vec::new(),
    };
    types
        .into_iter()
        .flat_map(IrType::refs)
        .filter(|r| *r != owner)
        .cloned()
        .collect()
}

/// Declaration rank of every schema in the set.
///
/// Schemas are taken in passes over the whole set: a schema is placed once
/// everything it references has been placed, otherwise it waits for the
/// next pass. Schemas left over by a reference cycle keep their order.
pub fn declaration_order(models: &IrModelSet) -> HashMap<SchemaRef, usize> {
    let mut pending: Vec<(SchemaRef, Vec<SchemaRef>)> = Vec::new();
    for module in &models.modules {
        for schema in &module.schemas {
            let owner = SchemaRef {
                namespace: module.namespace.clone(),
                name: schema.class_name().to_string(),
            };
            let deps = dependencies(&owner, schema);
            pending.push((owner, deps));
        }
    }
    let declared: HashSet<SchemaRef> = pending.iter().map(|(r, _)| r.clone()).collect();

    let mut rank: HashMap<SchemaRef, usize> = HashMap::with_capacity(pending.len());
    while !pending.is_empty() {
        let before = pending.len();
        let mut waiting = Vec::new();
        for (owner, deps) in pending {
            let ready = deps
                .iter()
                .all(|d| rank.contains_key(d) || !declared.contains(d));
            if ready {
                let next = rank.len();
                rank.insert(owner, next);
            } else {
                waiting.push((owner, deps));
            }
        }
        if waiting.len() == before {
            for (owner, _) in waiting {
                let next = rank.len();
                rank.entry(owner).or_insert(next);
            }
            break;
        }
        pending = waiting;
    }
    rank
}
