//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (assign / propagate request ID)
//!     → middleware/transpile.rs (compile `.ts` sources, or call through)
//!     → ServeDir (static files under the root, 404 otherwise)
//!     → error.rs (500 for read / transform failures)
//!     → Send to client
//! ```

pub mod error;
pub mod middleware;
pub mod request;
pub mod server;

pub use error::AppError;
pub use request::X_REQUEST_ID;
pub use server::{DevServer, ServerError, ServerHandle};
