//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dev server.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the dev server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, limits).
    pub listener: ListenerConfig,

    /// Static asset root and the URL it is served under.
    pub static_files: StaticConfig,

    /// TypeScript transform options.
    pub transform: TransformConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address as `host:port` (e.g., "127.0.0.1:3000" or "localhost:3000").
    pub bind_address: String,

    /// Maximum requests handled concurrently (backpressure).
    pub max_connections: usize,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            max_connections: 1024,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Static file serving configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticConfig {
    /// Directory holding the servable assets and TypeScript sources.
    /// Relative paths are resolved against the working directory.
    pub root: PathBuf,

    /// URL prefix the root is served under.
    pub mount_path: String,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            mount_path: "/".to_string(),
        }
    }
}

/// Source dialect accepted by the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    TypeScript,
    /// TypeScript with JSX.
    Tsx,
}

/// How source maps are emitted alongside compiled output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceMapMode {
    /// Appended to the output as a `data:` URL comment.
    #[default]
    Inline,
    None,
}

/// Transform configuration, fixed for the lifetime of a server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransformConfig {
    pub dialect: Dialect,

    /// Output language level (e.g. "es2015", "es2020", "esnext").
    pub target: String,

    pub source_maps: SourceMapMode,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::TypeScript,
            target: "es2015".to_string(),
            source_maps: SourceMapMode::Inline,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address. Must be an IP literal with a port.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.listener.bind_address, "127.0.0.1:3000");
        assert_eq!(config.static_files.root, PathBuf::from("public"));
        assert_eq!(config.static_files.mount_path, "/");
        assert_eq!(config.transform.dialect, Dialect::TypeScript);
        assert_eq!(config.transform.target, "es2015");
        assert_eq!(config.transform.source_maps, SourceMapMode::Inline);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [static_files]
            root = "www"

            [transform]
            dialect = "tsx"
            source_maps = "none"
            "#,
        )
        .unwrap();

        assert_eq!(config.static_files.root, PathBuf::from("www"));
        assert_eq!(config.static_files.mount_path, "/");
        assert_eq!(config.transform.dialect, Dialect::Tsx);
        assert_eq!(config.transform.target, "es2015");
        assert_eq!(config.transform.source_maps, SourceMapMode::None);
        assert_eq!(config.timeouts.request_secs, 30);
    }
}
