use std::fs;
use std::path::{Path, PathBuf};

use crate::adapter::GeneratorAdapter;
use crate::error::PipelineError;
use crate::extract::Extractor;
use crate::fetch::SchemaSource;
use crate::{CodeGenerator, GeneratedModule};

/// Namespace segments identifying the bucket, dropped from output paths.
pub const BUCKET_SEGMENTS: usize = 1;

/// Runs extraction, generation and the final write-out.
pub struct Orchestrator<S, G> {
    extractor: Extractor<S>,
    adapter: GeneratorAdapter<G>,
}

impl<S: SchemaSource, G: CodeGenerator> Orchestrator<S, G> {
    pub fn new(extractor: Extractor<S>, adapter: GeneratorAdapter<G>) -> Self {
        Self { extractor, adapter }
    }

    pub fn extractor(&self) -> &Extractor<S> {
        &self.extractor
    }

    /// Extract (or reuse) merged documents under `specs_dir`, generate models
    /// from them and write each unit below `models_dir`.
    ///
    /// Extraction failures abort before anything is written. Units are
    /// written in namespace order; a failed write stops the run but leaves
    /// earlier files in place. Returns the written paths.
    pub fn generate(
        &self,
        models_dir: &Path,
        specs_dir: &Path,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let sources = self.extractor.extract(specs_dir)?;
        let mut modules = self.adapter.parse(&sources)?;
        modules.sort_by(|a, b| a.namespace.cmp(&b.namespace));

        let extension = self.adapter.generator().file_extension();
        let mut written = Vec::with_capacity(modules.len());
        for module in &modules {
            let Some(path) = output_path(models_dir, &module.namespace, extension) else {
                log::warn!("Skipping unit without a module path: {:?}", module.namespace);
                continue;
            };
            write_module(&path, module)?;
            written.push(path);
        }
        Ok(written)
    }
}

/// `root/<namespace minus the bucket>.<extension>`, or `None` when nothing
/// is left after dropping the bucket.
pub fn output_path(root: &Path, namespace: &[String], extension: &str) -> Option<PathBuf> {
    let segments = namespace.get(BUCKET_SEGMENTS..)?;
    if segments.is_empty() {
        return None;
    }
    let mut path = root.to_path_buf();
    path.extend(segments);
    let mut file = path.file_name()?.to_os_string();
    file.push(".");
    file.push(extension);
    path.set_file_name(file);
    Some(path)
}

fn write_module(path: &Path, module: &GeneratedModule) -> Result<(), PipelineError> {
    log::info!("Generating {}", path.display());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PipelineError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, &module.body).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })
}
