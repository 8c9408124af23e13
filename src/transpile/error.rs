//! Failures surfaced by the transpile middleware.

use std::path::PathBuf;

use crate::transpile::transform::TransformError;

/// A matched source file could not be turned into a response.
///
/// A request that does not match is not an error; it is delegated.
#[derive(Debug, thiserror::Error)]
pub enum TranspileError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Transform(#[from] TransformError),
}
