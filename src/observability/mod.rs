//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Host layers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (transpile counters, histograms)
//!     → spans.rs (per-request spans with request IDs)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - The transpile core emits nothing; the HTTP adapter reports its outcomes
//! - Request ID flows through every span

pub mod logging;
pub mod metrics;
pub mod spans;
