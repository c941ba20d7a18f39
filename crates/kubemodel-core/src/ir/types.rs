use std::fmt;

use super::schemas::IrSchema;

/// Every model produced from a set of merged documents, grouped by module.
#[derive(Debug, Clone, Default)]
pub struct IrModelSet {
    /// Sorted by namespace.
    pub modules: Vec<IrModule>,
}

impl IrModelSet {
    pub fn module(&self, namespace: &[&str]) -> Option<&IrModule> {
        self.modules
            .iter()
            .find(|m| m.namespace.iter().map(String::as_str).eq(namespace.iter().copied()))
    }

    pub fn schema_count(&self) -> usize {
        self.modules.iter().map(|m| m.schemas.len()).sum()
    }
}

/// One output unit: the schemas sharing a namespace, in emission order.
///
/// The first namespace segment is the bucket the schemas were merged into,
/// e.g. `["k8s", "io", "k8s", "api", "apps", "v1"]`.
#[derive(Debug, Clone)]
pub struct IrModule {
    pub namespace: Vec<String>,
    pub schemas: Vec<IrSchema>,
}

impl IrModule {
    pub fn new(namespace: Vec<String>) -> Self {
        Self {
            namespace,
            schemas: Vec::new(),
        }
    }

    pub fn get(&self, class_name: &str) -> Option<&IrSchema> {
        self.schemas.iter().find(|s| s.class_name() == class_name)
    }
}

/// Where a named schema ends up: its module plus its class name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaRef {
    pub namespace: Vec<String>,
    pub name: String,
}

impl fmt::Display for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace.join("."), self.name)
    }
}

/// A name with multiple casing variants pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
    pub snake_case: String,
    pub screaming_snake: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
