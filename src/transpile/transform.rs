//! TypeScript to JavaScript transform.
//!
//! The middleware only sees the [`Transform`] trait. [`OxcTransform`] is the
//! production implementation: parse, semantic check, lower to the configured
//! target, print, and optionally append an inline source map.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use oxc_transformer::{TransformOptions, Transformer};

use crate::config::{Dialect, SourceMapMode, TransformConfig};

/// Content type sent with compiled output.
pub const JAVASCRIPT_CONTENT_TYPE: &str = "text/javascript; charset=utf-8";

/// Compiled text and its declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledOutput {
    pub code: String,
    pub content_type: &'static str,
}

impl CompiledOutput {
    pub fn javascript(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            content_type: JAVASCRIPT_CONTENT_TYPE,
        }
    }
}

/// Errors produced while compiling a source file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("syntax error in {source_name}: {}", diagnostics.join("; "))]
    Syntax {
        source_name: String,
        diagnostics: Vec<String>,
    },
    #[error("cannot transform {source_name}: {}", diagnostics.join("; "))]
    Unsupported {
        source_name: String,
        diagnostics: Vec<String>,
    },
    #[error("invalid transform target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },
    #[error("transform interrupted: {0}")]
    Interrupted(String),
}

/// Source-to-source compiler used by the transpile middleware.
///
/// Implementations are synchronous and CPU-bound; callers run them on a
/// blocking worker.
pub trait Transform: Send + Sync + 'static {
    /// Compile `source`. `source_name` is the path recorded in source maps
    /// and error messages.
    fn transform(&self, source: &str, source_name: &Path) -> Result<CompiledOutput, TransformError>;
}

/// Build transformer options for an output target such as `es2015` or `es2020`.
pub fn transform_options(target: &str) -> Result<TransformOptions, TransformError> {
    TransformOptions::from_target(target).map_err(|reason| TransformError::InvalidTarget {
        target: target.to_string(),
        reason,
    })
}

/// [`Transform`] backed by the oxc toolchain.
pub struct OxcTransform {
    source_type: SourceType,
    options: TransformOptions,
    source_maps: SourceMapMode,
}

impl OxcTransform {
    pub fn new(config: &TransformConfig) -> Result<Self, TransformError> {
        let source_type = match config.dialect {
            Dialect::TypeScript => SourceType::ts(),
            Dialect::Tsx => SourceType::tsx(),
        };
        Ok(Self {
            source_type,
            options: transform_options(&config.target)?,
            source_maps: config.source_maps,
        })
    }
}

impl Transform for OxcTransform {
    fn transform(&self, source: &str, source_name: &Path) -> Result<CompiledOutput, TransformError> {
        let allocator = Allocator::default();

        let parsed = Parser::new(&allocator, source, self.source_type).parse();
        if parsed.panicked || !parsed.errors.is_empty() {
            return Err(TransformError::Syntax {
                source_name: source_name.display().to_string(),
                diagnostics: messages(&parsed.errors),
            });
        }
        let mut program = parsed.program;

        let semantic = SemanticBuilder::new()
            .with_check_syntax_error(true)
            .build(&program);
        if !semantic.errors.is_empty() {
            return Err(TransformError::Syntax {
                source_name: source_name.display().to_string(),
                diagnostics: messages(&semantic.errors),
            });
        }
        let scoping = semantic.semantic.into_scoping();

        let transformed = Transformer::new(&allocator, source_name, &self.options)
            .build_with_scoping(scoping, &mut program);
        if !transformed.errors.is_empty() {
            return Err(TransformError::Unsupported {
                source_name: source_name.display().to_string(),
                diagnostics: messages(&transformed.errors),
            });
        }

        let source_map_path = match self.source_maps {
            SourceMapMode::Inline => Some(source_name.to_path_buf()),
            SourceMapMode::None => None,
        };
        let generated = Codegen::new()
            .with_options(CodegenOptions {
                source_map_path,
                ..CodegenOptions::default()
            })
            .build(&program);

        let mut code = generated.code;
        if let Some(map) = generated.map {
            if !code.ends_with('\n') {
                code.push('\n');
            }
            code.push_str("//# sourceMappingURL=");
            code.push_str(&map.to_data_url());
            code.push('\n');
        }

        Ok(CompiledOutput::javascript(code))
    }
}

fn messages<E: std::fmt::Display>(diagnostics: &[E]) -> Vec<String> {
    diagnostics.iter().map(ToString::to_string).collect()
}
