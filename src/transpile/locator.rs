//! Request path classification and source lookup.
//!
//! # Responsibilities
//! - Decide whether a request path names a script under the static root
//! - Map `foo.js` to its TypeScript sibling `foo.ts`
//! - Check that the candidate exists on disk
//!
//! # Design Decisions
//! - Classification is pure string work; it never touches the filesystem
//! - Any `..` segment rejects the path outright, so lookups cannot escape the root
//! - Extension matching is case-insensitive, the rest of the path is not

use std::io;
use std::path::{Path, PathBuf};

/// Result of classifying a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathClass {
    /// Not a script request under the static root.
    NotApplicable,
    /// Script request; holds the TypeScript path relative to the root.
    CandidateSource(PathBuf),
}

/// Classify `request_path` against the URL prefix the static root is mounted at.
pub fn classify(request_path: &str, mount_path: &str) -> PathClass {
    let Some(relative) = strip_mount(request_path, mount_path) else {
        return PathClass::NotApplicable;
    };
    if relative.contains('\\') {
        return PathClass::NotApplicable;
    }

    let mut segments: Vec<&str> = relative.split('/').collect();
    if segments.iter().any(|segment| *segment == "..") {
        return PathClass::NotApplicable;
    }

    let Some(source_name) = segments.pop().and_then(source_file_name) else {
        return PathClass::NotApplicable;
    };

    let mut candidate: PathBuf = segments
        .into_iter()
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();
    candidate.push(source_name);
    PathClass::CandidateSource(candidate)
}

/// Strip the mount prefix, requiring it to end on a segment boundary.
fn strip_mount<'a>(request_path: &'a str, mount_path: &str) -> Option<&'a str> {
    let mount = mount_path.trim_end_matches('/');
    if mount.is_empty() {
        return request_path.strip_prefix('/');
    }
    request_path.strip_prefix(mount)?.strip_prefix('/')
}

/// `foo.js` → `foo.ts`, `foo.ts` unchanged, anything else rejected.
fn source_file_name(file_name: &str) -> Option<String> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    match extension.as_bytes() {
        [b'j', s @ (b's' | b'S')] => Some(format!("{stem}.t{}", *s as char)),
        [b'J', s @ (b's' | b'S')] => Some(format!("{stem}.T{}", *s as char)),
        [b't' | b'T', b's' | b'S'] => Some(file_name.to_string()),
        _ => None,
    }
}

/// Resolves candidate sources against the static root.
#[derive(Debug, Clone)]
pub struct SourceLocator {
    root: PathBuf,
}

impl SourceLocator {
    /// Create a locator for `root`, resolving relative roots against the
    /// current working directory.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref();
        let root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()?.join(root)
        };
        Ok(Self { root })
    }

    /// Absolute static root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `candidate` under the root.
    pub fn resolve(&self, candidate: &Path) -> PathBuf {
        self.root.join(candidate)
    }

    /// Return the absolute path of `candidate` if it is an existing regular file.
    pub async fn locate(&self, candidate: &Path) -> Option<PathBuf> {
        let path = self.resolve(candidate);
        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Some(path),
            _ => None,
        }
    }
}
