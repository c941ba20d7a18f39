use kubemodel_core::error::GeneratorError;
use kubemodel_core::ir::IrModelSet;
use kubemodel_core::{CodeGenerator, GeneratedModule, GeneratorOptions};

use crate::emitters::{self, models as model_emitter, packages};
use crate::ordering;

/// Pydantic v2 model generator.
///
/// Emits one unit per IR module plus an empty `__init__` for every package
/// above them, all sorted by namespace.
#[derive(Debug, Default, Clone, Copy)]
pub struct PydanticGenerator;

impl CodeGenerator for PydanticGenerator {
    fn file_extension(&self) -> &str {
        "py"
    }

    fn generate(
        &self,
        models: &IrModelSet,
        options: &GeneratorOptions,
    ) -> Result<Vec<GeneratedModule>, GeneratorError> {
        let env = model_emitter::environment()?;
        let rank = ordering::declaration_order(models);

        let mut units = Vec::with_capacity(models.modules.len());
        for module in &models.modules {
            let body = model_emitter::emit_module(&env, module, &rank, options)?;
            log::debug!(
                "Rendered {} ({} classes)",
                module.namespace.join("."),
                module.schemas.len()
            );
            units.push(GeneratedModule {
                namespace: emitters::python_namespace(&module.namespace),
                body,
            });
        }

        let inits = packages::package_inits(units.iter().map(|u| u.namespace.as_slice()));
        units.extend(inits);
        units.sort_by(|a, b| a.namespace.cmp(&b.namespace));
        Ok(units)
    }
}
