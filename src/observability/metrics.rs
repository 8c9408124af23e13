//! Metrics collection and exposition.
//!
//! # Metrics
//! - `transpile_requests_total` (counter): `GET`/`HEAD` requests for a `.js`
//!   or `.ts` path under the mount, by outcome (`compiled`, `delegated`,
//!   `failed`). Other requests are not counted
//! - `transpile_duration_seconds` (histogram): time spent deciding and compiling
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - The Prometheus exporter is opt-in for a dev tool

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const TRANSPILE_REQUESTS_TOTAL: &str = "transpile_requests_total";
pub const TRANSPILE_DURATION_SECONDS: &str = "transpile_duration_seconds";

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one transpile decision.
pub fn record_transpile(outcome: &'static str, start: Instant) {
    metrics::counter!(TRANSPILE_REQUESTS_TOTAL, "outcome" => outcome).increment(1);
    metrics::histogram!(TRANSPILE_DURATION_SECONDS, "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
