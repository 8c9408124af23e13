//! TypeScript development server library.
//!
//! A request for `foo.js` under the static root is answered with the compiled
//! output of a sibling `foo.ts` when one exists; every other request falls
//! through to plain static file serving.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod transpile;

pub use config::schema::ServerConfig;
pub use http::{DevServer, ServerHandle};
pub use lifecycle::Shutdown;
pub use transpile::{Outcome, Transform, Transpiler};
