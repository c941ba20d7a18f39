pub mod models;
pub mod packages;

use kubemodel_core::error::GeneratorError;

use crate::names::module_segment;

/// Namespace with every segment made importable from Python.
pub fn python_namespace(namespace: &[String]) -> Vec<String> {
    namespace.iter().map(|s| module_segment(s)).collect()
}

fn template_error(err: minijinja::Error) -> GeneratorError {
    GeneratorError::Template(err.to_string())
}
