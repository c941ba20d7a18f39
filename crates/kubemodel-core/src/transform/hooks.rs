use crate::ir::IrField;
use crate::parse::extensions::Extensions;
use crate::parse::schema::{ObjectSchema, SchemaKind, SchemaNode};

/// Adjustments applied while schemas are translated into the IR.
///
/// `on_object` sees every object-shaped node (named or nested) after its
/// properties are parsed and before any of them is translated. `on_field`
/// sees every field once its type is known. Neither can fail; a hook that
/// finds nothing to do leaves its input untouched.
pub trait SchemaHooks {
    fn on_object(&self, _object: &mut ObjectSchema, _extensions: &Extensions) {}

    fn on_field(&self, _field: &mut IrField) {}
}

/// Translate schemas as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl SchemaHooks for NoHooks {}

/// Run `on_object` over `node` and every object nested below it.
pub fn apply_object_hooks(node: &mut SchemaNode, hooks: &dyn SchemaHooks) {
    node.walk_mut(&mut |n| {
        if let SchemaKind::Object(object) = &mut n.kind {
            hooks.on_object(object, &n.extensions);
        }
    });
}
