use std::collections::BTreeSet;

use kubemodel_core::GeneratedModule;

/// Final namespace segment marking a package initializer.
pub const INIT_MODULE: &str = "__init__";

/// An empty `__init__` unit for every package enclosing one of `modules`,
/// the bucket-level package included.
pub fn package_inits<'a>(modules: impl IntoIterator<Item = &'a [String]>) -> Vec<GeneratedModule> {
    let mut packages: BTreeSet<Vec<String>> = BTreeSet::new();
    for namespace in modules {
        for end in 1..namespace.len() {
            packages.insert(namespace[..end].to_vec());
        }
    }

    packages
        .into_iter()
        .map(|mut namespace| {
            namespace.push(INIT_MODULE.to_string());
            GeneratedModule {
                namespace,
                body: String::new(),
            }
        })
        .collect()
}
