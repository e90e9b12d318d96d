//! Model catalog enumeration and dependency resolution.
//!
//! The catalog is the Ollama store on disk: `manifests/` holds one metadata
//! file per installed model at `<registry>/<namespace>/<name>/<tag>`, and
//! `blobs/` holds the content-addressed layer files the manifests reference.
//! This module is read-only with respect to the store.

pub mod digest;
pub mod manifest;

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::utils::errors::{BackupError, Result};
use self::digest::Digest;
use self::manifest::Manifest;

/// Registry and namespace segments `ollama list` elides from model names.
const DEFAULT_REGISTRY: &str = "registry.ollama.ai";
const DEFAULT_NAMESPACE: &str = "library";

/// One installed model, enumerated once at startup and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    /// Display name matching Ollama's own convention, e.g. `llama3:8b`.
    pub name: String,

    /// Absolute path of the manifest file.
    pub manifest_path: PathBuf,

    /// Manifest path relative to the `manifests/` subtree; also its location
    /// in the staging tree and the archive.
    pub relative_path: PathBuf,
}

/// The full file dependency closure of one model.
#[derive(Debug, Clone)]
pub struct ModelDependencies {
    pub manifest_path: PathBuf,
    pub manifest_relative: PathBuf,
    /// Config digest first, then layers, in manifest order.
    pub digests: Vec<Digest>,
}

/// Walk the catalog's `manifests/` tree and produce one entry per manifest
/// file, sorted by display name.
///
/// An absent root or a root with no manifest files is a `CatalogNotFound`
/// error, never an empty listing: the caller must be able to tell "no models"
/// apart from "looking in the wrong place".
pub fn enumerate_models(catalog_root: &Path) -> Result<Vec<ModelEntry>> {
    let manifests_root = catalog_root.join("manifests");
    if !manifests_root.is_dir() {
        return Err(BackupError::CatalogNotFound(format!(
            "manifests directory not found at {}",
            manifests_root.display()
        )));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(&manifests_root) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative_path = entry
            .path()
            .strip_prefix(&manifests_root)
            .unwrap_or(entry.path())
            .to_path_buf();
        entries.push(ModelEntry {
            name: display_name(&relative_path),
            manifest_path: entry.path().to_path_buf(),
            relative_path,
        });
    }

    if entries.is_empty() {
        return Err(BackupError::CatalogNotFound(format!(
            "no model manifests under {}",
            manifests_root.display()
        )));
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Reconstruct the display name from a manifest's relative path segments
/// `<registry>/<namespace>/<name>/<tag>`. The default registry and namespace
/// are elided, remaining directories joined with `/`, and the tag appended
/// after `:` — matching what `ollama list` prints.
fn display_name(relative_path: &Path) -> String {
    let segments: Vec<&str> = relative_path
        .iter()
        .filter_map(|s| s.to_str())
        .collect();

    let Some((tag, dirs)) = segments.split_last() else {
        return String::new();
    };

    let mut dirs = &dirs[..];
    if dirs.first() == Some(&DEFAULT_REGISTRY) {
        dirs = &dirs[1..];
        if dirs.first() == Some(&DEFAULT_NAMESPACE) {
            dirs = &dirs[1..];
        }
    }

    if dirs.is_empty() {
        (*tag).to_string()
    } else {
        format!("{}:{}", dirs.join("/"), tag)
    }
}

/// Parse `entry`'s manifest and map every referenced digest to its expected
/// blob file, verifying each one exists.
///
/// A digest with no blob file on disk means the store is corrupt for this
/// model; resolution aborts with `DependencyMissing` naming the digest. The
/// run policy is to abort entirely — a model with a missing layer is not
/// restorable, so archiving the rest would produce a broken backup.
pub fn resolve_dependencies(catalog_root: &Path, entry: &ModelEntry) -> Result<ModelDependencies> {
    let manifest = Manifest::load(&entry.manifest_path)?;

    let mut digests = Vec::new();
    for raw in manifest.digests() {
        let digest: Digest = raw.parse()?;
        let blob_path = digest.blob_path(catalog_root);
        if !blob_path.is_file() {
            return Err(BackupError::DependencyMissing {
                model: entry.name.clone(),
                digest: digest.to_string(),
                path: blob_path,
            });
        }
        digests.push(digest);
    }

    Ok(ModelDependencies {
        manifest_path: entry.manifest_path.clone(),
        manifest_relative: entry.relative_path.clone(),
        digests,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn hex(c: char) -> String {
        std::iter::repeat(c).take(64).collect()
    }

    fn manifest_json(digests: &[String]) -> String {
        let layers: Vec<String> = digests
            .iter()
            .map(|d| format!(r#"{{"mediaType":"application/vnd.ollama.image.model","digest":"sha256:{d}","size":10}}"#))
            .collect();
        format!(r#"{{"schemaVersion":2,"layers":[{}]}}"#, layers.join(","))
    }

    /// Store with llama3:8b and phi3:mini sharing a blob, plus one custom-registry model.
    fn fixture_catalog() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let library = root.join("manifests/registry.ollama.ai/library");

        fs::create_dir_all(library.join("llama3")).unwrap();
        fs::create_dir_all(library.join("phi3")).unwrap();
        fs::create_dir_all(root.join("manifests/example.com/team/custom")).unwrap();
        fs::create_dir_all(root.join("blobs")).unwrap();

        fs::write(
            library.join("llama3/8b"),
            manifest_json(&[hex('a'), hex('b')]),
        )
        .unwrap();
        fs::write(
            library.join("phi3/mini"),
            manifest_json(&[hex('b'), hex('c')]),
        )
        .unwrap();
        fs::write(
            root.join("manifests/example.com/team/custom/latest"),
            manifest_json(&[hex('d')]),
        )
        .unwrap();

        for c in ['a', 'b', 'c', 'd'] {
            fs::write(root.join("blobs").join(format!("sha256-{}", hex(c))), [c as u8]).unwrap();
        }

        temp_dir
    }

    #[test]
    fn test_enumerate_one_entry_per_manifest() {
        let catalog = fixture_catalog();
        let entries = enumerate_models(catalog.path()).unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["example.com/team/custom:latest", "llama3:8b", "phi3:mini"]
        );
    }

    #[test]
    fn test_enumerate_missing_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = enumerate_models(&temp_dir.path().join("nowhere"));
        assert!(matches!(result, Err(BackupError::CatalogNotFound(_))));
    }

    #[test]
    fn test_enumerate_empty_tree_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("manifests/registry.ollama.ai/library")).unwrap();

        let result = enumerate_models(temp_dir.path());
        assert!(matches!(result, Err(BackupError::CatalogNotFound(_))));
    }

    #[test]
    fn test_display_name_reconstruction() {
        assert_eq!(
            display_name(Path::new("registry.ollama.ai/library/llama3/8b")),
            "llama3:8b"
        );
        assert_eq!(
            display_name(Path::new("registry.ollama.ai/jmorgan/llama3/8b")),
            "jmorgan/llama3:8b"
        );
        assert_eq!(
            display_name(Path::new("example.com/team/custom/latest")),
            "example.com/team/custom:latest"
        );
        assert_eq!(display_name(Path::new("stray")), "stray");
    }

    #[test]
    fn test_resolve_collects_all_digests() {
        let catalog = fixture_catalog();
        let entries = enumerate_models(catalog.path()).unwrap();
        let llama = entries.iter().find(|e| e.name == "llama3:8b").unwrap();

        let deps = resolve_dependencies(catalog.path(), llama).unwrap();
        assert_eq!(deps.digests.len(), 2);
        assert_eq!(
            deps.manifest_relative,
            Path::new("registry.ollama.ai/library/llama3/8b")
        );
        for digest in &deps.digests {
            assert!(digest.blob_path(catalog.path()).is_file());
        }
    }

    #[test]
    fn test_resolve_missing_blob_is_fatal() {
        let catalog = fixture_catalog();
        fs::remove_file(
            catalog
                .path()
                .join("blobs")
                .join(format!("sha256-{}", hex('c'))),
        )
        .unwrap();

        let entries = enumerate_models(catalog.path()).unwrap();
        let phi = entries.iter().find(|e| e.name == "phi3:mini").unwrap();

        let result = resolve_dependencies(catalog.path(), phi);
        match result {
            Err(BackupError::DependencyMissing { model, digest, .. }) => {
                assert_eq!(model, "phi3:mini");
                assert_eq!(digest, format!("sha256:{}", hex('c')));
            }
            other => panic!("expected DependencyMissing, got {other:?}"),
        }
    }
}
