use std::collections::{BTreeMap, BTreeSet, HashSet};

use kubemodel_core::ir::{IrType, SchemaRef};

use crate::emitters::python_namespace;

/// A `from <dots><package> import <name> [as <alias>]` statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RelativeImport {
    pub dots: usize,
    pub package: String,
    pub name: String,
    pub alias: Option<String>,
}

impl RelativeImport {
    /// Import of module `target` as seen from module `current`. Segments
    /// are rewritten into importable Python names.
    pub fn between(current: &[String], target: &[String]) -> Self {
        let current = python_namespace(current);
        let target = python_namespace(target);
        let current_package = &current[..current.len().saturating_sub(1)];
        let (target_package, name) = match target.split_last() {
            Some((name, package)) => (package, name.clone()),
            None => (target.as_slice(), String::new()),
        };
        let common = current_package
            .iter()
            .zip(target_package)
            .take_while(|(a, b)| a == b)
            .count();
        Self {
            dots: current_package.len() - common + 1,
            package: target_package[common..].join("."),
            name,
            alias: None,
        }
    }

    fn from_clause(&self) -> String {
        format!("{}{}", ".".repeat(self.dots), self.package)
    }

    /// The name the module is bound to in the importing file.
    pub fn binding(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Maps IR types to Python type hints for one module and records what the
/// module has to import for them.
pub struct TypeMapper {
    namespace: Vec<String>,
    modules: BTreeMap<Vec<String>, RelativeImport>,
    typing: BTreeSet<&'static str>,
    datetime: BTreeSet<&'static str>,
}

impl TypeMapper {
    /// `referenced` lists every other module the types will point into;
    /// bindings are assigned in import order, repeated names get `_1`, `_2`...
    pub fn new<'a>(namespace: &[String], referenced: impl IntoIterator<Item = &'a [String]>) -> Self {
        let mut imports: Vec<(Vec<String>, RelativeImport)> = referenced
            .into_iter()
            .filter(|target| *target != namespace)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|target| (target.to_vec(), RelativeImport::between(namespace, target)))
            .collect();
        imports.sort_by(|(_, a), (_, b)| {
            b.dots
                .cmp(&a.dots)
                .then_with(|| a.package.cmp(&b.package))
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut bound: HashSet<String> = HashSet::new();
        for (_, import) in &mut imports {
            if !bound.insert(import.name.clone()) {
                let alias = (1..)
                    .map(|n| format!("{}_{n}", import.name))
                    .find(|candidate| !bound.contains(candidate))
                    .unwrap_or_default();
                bound.insert(alias.clone());
                import.alias = Some(alias);
            }
        }

        Self {
            namespace: namespace.to_vec(),
            modules: imports.into_iter().collect(),
            typing: BTreeSet::new(),
            datetime: BTreeSet::new(),
        }
    }

    /// Python type hint for `ir_type`.
    pub fn python_type(&mut self, ir_type: &IrType) -> String {
        match ir_type {
            IrType::String => "str".to_string(),
            IrType::Number => "float".to_string(),
            IrType::Integer => "int".to_string(),
            IrType::Boolean => "bool".to_string(),
            IrType::Null => "None".to_string(),
            IrType::DateTime => {
                self.datetime.insert("datetime");
                "datetime".to_string()
            }
            IrType::Date => {
                self.datetime.insert("date");
                "date".to_string()
            }
            IrType::Binary => "bytes".to_string(),
            IrType::Any => self.typing_name("Any"),
            IrType::Ref(target) => self.reference(target),
            IrType::Array(inner) => {
                let inner = self.python_type(inner);
                format!("{}[{inner}]", self.typing_name("List"))
            }
            IrType::Map(values) => {
                let values = self.python_type(values);
                format!("{}[str, {values}]", self.typing_name("Dict"))
            }
            // Inline shapes are promoted before emission; these are fallbacks.
            IrType::Object(_) => {
                let any = self.typing_name("Any");
                format!("{}[str, {any}]", self.typing_name("Dict"))
            }
            IrType::Enum(_) => "str".to_string(),
            IrType::Union(variants) => {
                let nullable = variants.contains(&IrType::Null);
                let hints: Vec<String> = variants
                    .iter()
                    .filter(|v| **v != IrType::Null)
                    .map(|v| self.python_type(v))
                    .collect();
                let hint = match hints.len() {
                    0 => return "None".to_string(),
                    1 => hints.into_iter().next().unwrap_or_default(),
                    _ => format!("{}[{}]", self.typing_name("Union"), hints.join(", ")),
                };
                if nullable { self.optional(&hint) } else { hint }
            }
        }
    }

    /// `Optional[hint]`, unless it already is.
    pub fn optional(&mut self, hint: &str) -> String {
        if hint.starts_with("Optional[") || hint == "None" {
            return hint.to_string();
        }
        format!("{}[{hint}]", self.typing_name("Optional"))
    }

    fn typing_name(&mut self, name: &'static str) -> String {
        self.typing.insert(name);
        name.to_string()
    }

    fn reference(&self, target: &SchemaRef) -> String {
        if target.namespace == self.namespace {
            return target.name.clone();
        }
        match self.modules.get(&target.namespace) {
            Some(import) => format!("{}.{}", import.binding(), target.name),
            None => target.name.clone(),
        }
    }

    /// Standard library import lines, sorted by module.
    pub fn stdlib_imports(&self, uses_enum: bool) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.datetime.is_empty() {
            lines.push(format!("from datetime import {}", join(&self.datetime)));
        }
        if uses_enum {
            lines.push("from enum import Enum".to_string());
        }
        if !self.typing.is_empty() {
            lines.push(format!("from typing import {}", join(&self.typing)));
        }
        lines
    }

    /// Relative imports, deepest first. Plain names from the same package
    /// share a line; aliased ones get their own.
    pub fn relative_imports(&self) -> Vec<String> {
        let mut imports: Vec<&RelativeImport> = self.modules.values().collect();
        imports.sort_by(|a, b| {
            b.dots
                .cmp(&a.dots)
                .then_with(|| a.package.cmp(&b.package))
                .then_with(|| a.alias.is_some().cmp(&b.alias.is_some()))
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut groups: Vec<(String, Vec<&str>)> = Vec::new();
        let mut lines: Vec<String> = Vec::new();
        for import in imports {
            let clause = import.from_clause();
            if let Some(alias) = &import.alias {
                flush(&mut groups, &mut lines);
                lines.push(format!("from {clause} import {} as {alias}", import.name));
                continue;
            }
            let same_package = matches!(groups.last(), Some((from, _)) if *from == clause);
            if !same_package {
                flush(&mut groups, &mut lines);
                groups.push((clause, Vec::new()));
            }
            if let Some((_, names)) = groups.last_mut() {
                names.push(import.name.as_str());
            }
        }
        flush(&mut groups, &mut lines);
        lines
    }
}

fn flush(groups: &mut Vec<(String, Vec<&str>)>, lines: &mut Vec<String>) {
    for (from, names) in groups.drain(..) {
        lines.push(format!("from {from} import {}", names.join(", ")));
    }
}

fn join(names: &BTreeSet<&'static str>) -> String {
    names.iter().copied().collect::<Vec<_>>().join(", ")
}
