//! Per-request transpile decision.
//!
//! # State Machine
//! ```text
//! Received ──no match──────────▶ Delegate
//!    │
//! Matched ──no source file─────▶ Delegate
//!    │
//! Found ──read error───────────▶ Fail(Read)
//!    │
//! Loaded ──compile error───────▶ Fail(Transform)
//!    │
//! Transformed ─────────────────▶ Respond(CompiledOutput)
//! ```
//!
//! # Design Decisions
//! - Stateless between requests: every hit re-reads and recompiles
//! - The transform runs on the blocking pool so the reactor keeps serving
//! - No logging here; the host adapter reports outcomes

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::StaticConfig;
use crate::transpile::error::TranspileError;
use crate::transpile::locator::{classify, PathClass, SourceLocator};
use crate::transpile::transform::{CompiledOutput, Transform, TransformError};

/// What the host should do with a request.
#[derive(Debug)]
pub enum Outcome {
    /// Hand the request to the next handler untouched.
    Delegate,
    /// Send the compiled output as the full response.
    Respond(CompiledOutput),
    /// Forward the failure to the host error layer.
    Fail(TranspileError),
}

impl Outcome {
    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Delegate => "delegated",
            Outcome::Respond(_) => "compiled",
            Outcome::Fail(_) => "failed",
        }
    }
}

/// Compiles TypeScript sources in place of requested scripts.
pub struct Transpiler {
    mount_path: String,
    locator: SourceLocator,
    transform: Arc<dyn Transform>,
}

impl Transpiler {
    pub fn new(config: &StaticConfig, transform: Arc<dyn Transform>) -> io::Result<Self> {
        Ok(Self {
            mount_path: config.mount_path.clone(),
            locator: SourceLocator::new(&config.root)?,
            transform,
        })
    }

    /// Absolute static root this transpiler reads from.
    pub fn root(&self) -> &Path {
        self.locator.root()
    }

    /// Whether `request_path` names a script under the mount path.
    /// No filesystem access.
    pub fn is_candidate(&self, request_path: &str) -> bool {
        matches!(
            classify(request_path, &self.mount_path),
            PathClass::CandidateSource(_)
        )
    }

    /// Decide how to answer a request for `request_path`.
    pub async fn handle(&self, request_path: &str) -> Outcome {
        let candidate = match classify(request_path, &self.mount_path) {
            PathClass::NotApplicable => return Outcome::Delegate,
            PathClass::CandidateSource(candidate) => candidate,
        };

        let Some(path) = self.locator.locate(&candidate).await else {
            return Outcome::Delegate;
        };

        match self.compile(&path, candidate).await {
            Ok(output) => Outcome::Respond(output),
            Err(e) => Outcome::Fail(e),
        }
    }

    async fn compile(&self, path: &Path, source_name: PathBuf) -> Result<CompiledOutput, TranspileError> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| TranspileError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let transform = Arc::clone(&self.transform);
        let output = tokio::task::spawn_blocking(move || transform.transform(&source, &source_name))
            .await
            .map_err(|e| TransformError::Interrupted(e.to_string()))??;

        Ok(output)
    }
}
