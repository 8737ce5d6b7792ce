//! Source artifacts and mapping of analyzer-reported paths onto them

use std::path::{Path, PathBuf};

use super::UNKNOWN_ARTIFACT;

/// One unit of source code subject to analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Logical name: path below the artifact root, without extension ("Foo", "tokens/Bar")
    pub name: String,

    /// Path relative to the project root ("contracts/tokens/Bar.sol")
    pub path: PathBuf,

    /// Raw file contents
    pub contents: String,
}

impl Artifact {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// The discovered artifacts for one run
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    /// Artifact root relative to the project ("contracts")
    root: String,
    artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    pub fn new(root: impl AsRef<Path>, artifacts: Vec<Artifact>) -> Self {
        Self {
            root: normalize(&root.as_ref().to_string_lossy()),
            artifacts,
        }
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.artifacts.iter().map(|a| a.path.clone()).collect()
    }

    /// Map a path as printed by an analyzer to a logical artifact name
    ///
    /// Known artifacts are matched by path suffix. Otherwise the artifact
    /// root prefix and the file extension are stripped, so
    /// `contracts/Foo.sol` becomes `Foo` even when discovery found nothing.
    pub fn resolve(&self, reported: &str) -> String {
        let reported = normalize(reported);
        if reported.is_empty() {
            return UNKNOWN_ARTIFACT.to_string();
        }

        for artifact in &self.artifacts {
            let full = normalize(&artifact.path.to_string_lossy());
            if matches_suffix(&reported, &full) {
                return artifact.name.clone();
            }
            let below_root = strip_root(&full, &self.root);
            if below_root != full && matches_suffix(&reported, below_root) {
                return artifact.name.clone();
            }
        }

        let below_root = strip_root(&reported, &self.root);
        let name = strip_extension(below_root);
        if name.is_empty() {
            UNKNOWN_ARTIFACT.to_string()
        } else {
            name.to_string()
        }
    }
}

fn normalize(path: &str) -> String {
    let mut p = path.trim().replace('\\', "/");
    while let Some(rest) = p.strip_prefix("./") {
        p = rest.to_string();
    }
    p.trim_end_matches('/').to_string()
}

fn matches_suffix(reported: &str, candidate: &str) -> bool {
    if candidate.is_empty() {
        return false;
    }
    reported == candidate
        || reported
            .strip_suffix(candidate)
            .is_some_and(|head| head.ends_with('/'))
}

/// Part of `path` after the last `<root>/` segment, or `path` itself
fn strip_root<'a>(path: &'a str, root: &str) -> &'a str {
    if root.is_empty() {
        return path;
    }
    if let Some(rest) = path.strip_prefix(&format!("{}/", root)) {
        return rest;
    }
    match path.rfind(&format!("/{}/", root)) {
        Some(idx) => &path[idx + root.len() + 2..],
        None => path,
    }
}

fn strip_extension(path: &str) -> &str {
    let file_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[file_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..file_start + dot],
        _ => path,
    }
}
