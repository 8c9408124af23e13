//! Shared utilities for integration tests.

use std::path::Path;

use tempfile::TempDir;
use ts_dev_server::{DevServer, ServerConfig, ServerHandle};

/// Create a scratch project with a `public/` root holding `files`.
#[allow(dead_code)]
pub fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("public");
    std::fs::create_dir_all(&root).unwrap();
    for (name, contents) in files {
        write(&root, name, contents);
    }
    dir
}

/// Write `contents` to `root/name`, creating parent directories.
#[allow(dead_code)]
pub fn write(root: &Path, name: &str, contents: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// Start a dev server for `project`'s `public/` directory on an ephemeral port.
#[allow(dead_code)]
pub async fn start_server(project: &TempDir) -> ServerHandle {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.static_files.root = project.path().join("public");

    DevServer::new(config).unwrap().start().await.unwrap()
}

/// HTTP client that never reuses connections, so `stop` drains quickly.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
