use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::TransformError;
use crate::ir::{IrModelSet, IrModule};
use crate::parse;
use crate::parse::schema::SchemaNode;
use crate::parse::spec::RawDocument;

use super::hooks::{SchemaHooks, apply_object_hooks};
use super::promote_inline::promote_inline_types;
use super::schema_resolver::SchemaResolver;

/// Options controlling how schemas are translated.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Inline non-object schemas at their uses instead of declaring them.
    pub collapse_root_models: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            collapse_root_models: true,
        }
    }
}

/// Load merged documents from disk and translate them into one model set.
///
/// Each file's stem names the bucket its schemas are placed under.
pub fn transform(
    paths: &[PathBuf],
    hooks: &dyn SchemaHooks,
    options: &TransformOptions,
) -> Result<IrModelSet, TransformError> {
    let mut modules: IndexMap<Vec<String>, IrModule> = IndexMap::new();

    for path in paths {
        let doc = load_document(path)?;
        let bucket = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        for module in transform_document(&bucket, &doc, hooks, options)? {
            match modules.get_mut(&module.namespace) {
                Some(existing) => existing.schemas.extend(module.schemas),
                None => {
                    modules.insert(module.namespace.clone(), module);
                }
            }
        }
    }

    let mut modules: Vec<IrModule> = modules.into_values().collect();
    modules.sort_by(|a, b| a.namespace.cmp(&b.namespace));
    Ok(IrModelSet { modules })
}

/// Translate one merged document whose schemas belong to `bucket`.
pub fn transform_document(
    bucket: &str,
    doc: &RawDocument,
    hooks: &dyn SchemaHooks,
    options: &TransformOptions,
) -> Result<Vec<IrModule>, TransformError> {
    // Phase 1: Parse schema nodes and let the hooks adjust them
    let mut nodes: IndexMap<String, SchemaNode> = IndexMap::new();
    for (name, value) in &doc.components.schemas {
        let mut node: SchemaNode =
            serde_json::from_value(value.clone()).map_err(|source| {
                TransformError::InvalidSchema {
                    name: name.clone(),
                    source,
                }
            })?;
        apply_object_hooks(&mut node, hooks);
        nodes.insert(name.clone(), node);
    }

    // Phase 2: Translate named schemas, grouped by module
    let mut resolver = SchemaResolver::new(bucket, &nodes, hooks, options.collapse_root_models);
    let mut modules: IndexMap<Vec<String>, IrModule> = IndexMap::new();
    for name in nodes.keys() {
        let Some(schema) = resolver.resolve_schema(name)? else {
            continue;
        };
        let namespace = resolver.schema_ref(name).namespace;
        modules
            .entry(namespace.clone())
            .or_insert_with(|| IrModule::new(namespace))
            .schemas
            .push(schema);
    }

    // Phase 3: Promote inline objects and enums to named schemas
    for module in modules.values_mut() {
        promote_inline_types(module);
    }

    log::debug!(
        "Translated {} schemas of bucket {bucket} into {} modules",
        nodes.len(),
        modules.len()
    );
    Ok(modules.into_values().collect())
}

fn load_document(path: &Path) -> Result<RawDocument, TransformError> {
    let text = fs::read_to_string(path).map_err(|source| TransformError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |source| TransformError::Parse {
        path: path.to_path_buf(),
        source,
    };
    let doc = parse::from_json(&text).map_err(parse_error)?;
    parse::validate_version(&doc).map_err(parse_error)?;
    Ok(doc)
}
