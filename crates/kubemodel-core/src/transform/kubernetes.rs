use serde_json::Value;

use super::hooks::SchemaHooks;
use crate::ir::IrField;
use crate::parse::extensions::Extensions;
use crate::parse::schema::ObjectSchema;

/// Kubernetes conventions for resource schemas.
///
/// Resource objects get `kind` and `apiVersion` defaults from their
/// `x-kubernetes-group-version-kind` extension, and fields whose only
/// default is `{}` lose it unless they are mappings.
#[derive(Debug, Clone, Copy, Default)]
pub struct KubernetesHooks;

impl SchemaHooks for KubernetesHooks {
    fn on_object(&self, object: &mut ObjectSchema, extensions: &Extensions) {
        let gvk = extensions.group_version_kind();

        if !gvk.kind.is_empty() {
            if let Some(kind) = object.properties.get_mut("kind") {
                log::debug!("Defaulting kind to {}", gvk.kind);
                kind.default = Some(Value::String(gvk.kind.clone()));
            }
        }

        // Core-group resources have no group; their apiVersion is left alone.
        if let Some(api_version) = gvk.api_version() {
            if let Some(prop) = object.properties.get_mut("apiVersion") {
                log::debug!("Defaulting apiVersion to {api_version}");
                prop.default = Some(Value::String(api_version));
            }
        }
    }

    fn on_field(&self, field: &mut IrField) {
        let empty_mapping = matches!(&field.default, Some(Value::Object(map)) if map.is_empty());
        if empty_mapping && !field.field_type.is_map() {
            field.default = None;
        }
    }
}
