pub mod adapter;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod ir;
pub mod parse;
pub mod pipeline;
pub mod transform;

use error::GeneratorError;

/// One generated source unit and the namespace it belongs to.
///
/// The namespace keeps the bucket as its first segment; a final segment of
/// `__init__` marks a package initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    pub namespace: Vec<String>,
    pub body: String,
}

/// Style switches for generated code. Fixed by the tool, not user-facing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Split long string literals into parenthesised concatenations.
    pub wrap_string_literal: bool,
    pub use_double_quotes: bool,
    /// Inline non-object schemas instead of declaring root models.
    pub collapse_root_models: bool,
    /// Write `Field(default=...)` instead of a positional default.
    pub use_default_kwarg: bool,
    pub line_length: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            wrap_string_literal: true,
            use_double_quotes: true,
            collapse_root_models: true,
            use_default_kwarg: true,
            line_length: 88,
        }
    }
}

/// Trait for code generators that produce source units from the model IR.
pub trait CodeGenerator {
    /// Extension given to written units, without the dot.
    fn file_extension(&self) -> &str;

    fn generate(
        &self,
        models: &ir::IrModelSet,
        options: &GeneratorOptions,
    ) -> Result<Vec<GeneratedModule>, GeneratorError>;
}
