//! Source artifact discovery

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::ArtifactSettings;
use crate::{Artifact, ArtifactSet};

/// Collect the artifacts under `<project>/<settings.root>` matching `settings.include`
///
/// Artifacts are sorted by path. A missing artifact root is not an error;
/// analyzers still run and the report shows zero artifacts.
pub fn discover(project: &Path, settings: &ArtifactSettings) -> Result<ArtifactSet> {
    let root = project.join(&settings.root);
    if !root.is_dir() {
        warn!(root = %root.display(), "Artifact root not found");
        return Ok(ArtifactSet::new(&settings.root, Vec::new()));
    }

    // The root is a literal path; only `include` carries glob syntax
    let escaped_root = PathBuf::from(glob::Pattern::escape(&root.to_string_lossy()));
    let mut paths = BTreeSet::new();
    for pattern in &settings.include {
        let full = escaped_root.join(pattern);
        let full = full.to_string_lossy();
        let entries =
            glob::glob(&full).with_context(|| format!("Invalid artifact pattern: {}", pattern))?;
        for entry in entries.flatten() {
            if entry.is_file() {
                paths.insert(entry);
            }
        }
    }

    let mut artifacts = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = std::fs::read(&path)
            .with_context(|| format!("Failed to read artifact: {}", path.display()))?;
        let relative = path.strip_prefix(project).unwrap_or(&path).to_path_buf();
        let name = artifact_name(&path, &root);
        debug!(name = %name, path = %relative.display(), "Discovered artifact");
        artifacts.push(Artifact::new(
            name,
            relative,
            String::from_utf8_lossy(&bytes).into_owned(),
        ));
    }

    Ok(ArtifactSet::new(&settings.root, artifacts))
}

/// Path below `root` without extension, `/`-separated
fn artifact_name(path: &Path, root: &Path) -> String {
    let below: PathBuf = path.strip_prefix(root).unwrap_or(path).with_extension("");
    below
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
