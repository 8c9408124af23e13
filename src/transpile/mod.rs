//! On-request TypeScript compilation.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → locator.rs (classify: not applicable | candidate `.ts` path)
//!     → locator.rs (existence check under the static root)
//!     → middleware.rs (read source, run transform)
//!     → transform.rs (oxc: parse → check → lower → print + source map)
//!     → Outcome { Delegate | Respond | Fail } for the host to interpret
//! ```
//!
//! # Design Decisions
//! - Nothing is cached and nothing is written to disk
//! - The root and transform options are fixed when the transpiler is built
//! - No dependency on a particular middleware convention; see `http::middleware`

pub mod error;
pub mod locator;
pub mod middleware;
pub mod transform;

pub use error::TranspileError;
pub use locator::{classify, PathClass, SourceLocator};
pub use middleware::{Outcome, Transpiler};
pub use transform::{CompiledOutput, OxcTransform, Transform, TransformError, JAVASCRIPT_CONTENT_TYPE};
