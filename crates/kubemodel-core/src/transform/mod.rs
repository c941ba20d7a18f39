pub mod hooks;
pub mod kubernetes;
pub mod name_normalizer;
pub mod promote_inline;
pub mod schema_resolver;
pub mod spec_to_ir;

pub use hooks::{NoHooks, SchemaHooks};
pub use kubernetes::KubernetesHooks;
pub use spec_to_ir::{TransformOptions, transform, transform_document};
