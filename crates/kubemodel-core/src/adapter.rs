use std::path::PathBuf;

use crate::error::PipelineError;
use crate::transform::{self, KubernetesHooks, SchemaHooks, TransformOptions};
use crate::{CodeGenerator, GeneratedModule, GeneratorOptions};

/// Wires a [`CodeGenerator`] to the schema translation with fixed options
/// and the hooks that adjust schemas on the way.
pub struct GeneratorAdapter<G> {
    generator: G,
    hooks: Box<dyn SchemaHooks>,
    options: GeneratorOptions,
}

impl<G: CodeGenerator> GeneratorAdapter<G> {
    /// Default options with the Kubernetes hooks installed.
    pub fn new(generator: G) -> Self {
        Self::with_hooks(generator, Box::new(KubernetesHooks))
    }

    pub fn with_hooks(generator: G, hooks: Box<dyn SchemaHooks>) -> Self {
        Self {
            generator,
            hooks,
            options: GeneratorOptions::default(),
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Translate the merged documents at `sources` and render every module.
    pub fn parse(&self, sources: &[PathBuf]) -> Result<Vec<GeneratedModule>, PipelineError> {
        let transform_options = TransformOptions {
            collapse_root_models: self.options.collapse_root_models,
        };
        let models = transform::transform(sources, self.hooks.as_ref(), &transform_options)?;
        log::debug!(
            "Loaded {} schemas in {} modules",
            models.schema_count(),
            models.modules.len()
        );
        Ok(self.generator.generate(&models, &self.options)?)
    }
}
