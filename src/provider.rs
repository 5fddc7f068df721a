use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::graph::Package;

/// Resolves package metadata for an import path relative to a resolution
/// root. The rest of the tool treats this as a black box, so tests can
/// swap in a synthetic in-memory graph.
pub trait MetadataProvider {
    fn resolve(&self, import_path: &str, root: &Path) -> Result<Package>;
}

/// Manifest file expected in every package directory.
pub const MANIFEST_NAME: &str = "pkg.json";

/// Extensions that mark a package as carrying foreign-language sources.
const FOREIGN_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "h", "hpp", "s"];

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    imports: Vec<String>,
    #[serde(default)]
    platform: bool,
}

/// Resolves packages from directories on disk: an import path maps to the
/// directory `<root>/<import-path>` holding a [`MANIFEST_NAME`] manifest.
/// Packages found only under the platform root are platform-provided.
pub struct FsProvider {
    platform_root: Option<PathBuf>,
}

impl FsProvider {
    pub fn new() -> Self {
        Self {
            platform_root: None,
        }
    }

    pub fn with_platform_root(mut self, dir: PathBuf) -> Self {
        self.platform_root = Some(dir);
        self
    }

    fn locate(&self, import_path: &str, root: &Path) -> Option<(PathBuf, bool)> {
        let local = root.join(import_path);
        if local.join(MANIFEST_NAME).is_file() {
            return Some((local, false));
        }
        if let Some(platform) = &self.platform_root {
            let dir = platform.join(import_path);
            if dir.join(MANIFEST_NAME).is_file() {
                return Some((dir, true));
            }
        }
        None
    }
}

impl Default for FsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataProvider for FsProvider {
    fn resolve(&self, import_path: &str, root: &Path) -> Result<Package> {
        let Some((dir, from_platform)) = self.locate(import_path, root) else {
            bail!("no package directory for {import_path}");
        };

        let manifest_path = dir.join(MANIFEST_NAME);
        let raw = fs::read_to_string(&manifest_path)
            .with_context(|| format!("failed to read {}", manifest_path.display()))?;
        let manifest: Manifest = serde_json::from_str(&raw)
            .with_context(|| format!("malformed manifest {}", manifest_path.display()))?;

        Ok(Package {
            import_path: import_path.trim_matches('/').to_string(),
            is_platform: from_platform || manifest.platform,
            has_foreign_source: has_foreign_source(&dir),
            imports: manifest.imports,
        })
    }
}

fn has_foreign_source(dir: &Path) -> bool {
    WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .any(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| FOREIGN_EXTENSIONS.contains(&ext))
                .unwrap_or(false)
        })
}
