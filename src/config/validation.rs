//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, value ranges and the transform target
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::{SocketAddr, ToSocketAddrs};

use tracing_subscriber::EnvFilter;

use crate::config::schema::ServerConfig;
use crate::transpile::transform::transform_options;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid {field} '{value}'")]
    InvalidAddress { field: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("static_files.root must not be empty")]
    EmptyRoot,
    #[error("static_files.mount_path '{0}' must start with '/'")]
    MountPath(String),
    #[error("unsupported transform.target '{0}'")]
    Target(String),
    #[error("invalid observability.log_level '{0}'")]
    LogLevel(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // The listener resolves host names, so `localhost:3000` is fine here.
    if config.listener.bind_address.to_socket_addrs().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::Zero("listener.max_connections"));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("listener.max_body_bytes"));
    }

    if config.static_files.root.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyRoot);
    }
    if !config.static_files.mount_path.starts_with('/') {
        errors.push(ValidationError::MountPath(
            config.static_files.mount_path.clone(),
        ));
    }

    if transform_options(&config.transform.target).is_err() {
        errors.push(ValidationError::Target(config.transform.target.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }

    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::LogLevel(
            config.observability.log_level.clone(),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
