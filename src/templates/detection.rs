//! Repository language detection from manifest files

use anyhow::{bail, Result};
use ignore::{overrides::OverrideBuilder, WalkBuilder};
use std::path::Path;
use tracing::{debug, info, warn};

const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "target",
    "bin",
    "obj",
    "dist",
    "build",
    "venv",
    ".venv",
    "__pycache__",
    ".git",
];

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub max_depth: usize,
    pub max_files: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            max_files: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDetection {
    pub language: &'static str,
    /// Manifest path relative to the scanned folder
    pub manifest_path: String,
    pub depth: usize,
}

/// Maps a manifest file name to the language it signals
pub fn language_for_manifest(filename: &str) -> Option<&'static str> {
    match filename {
        "package.json" => Some("node"),
        "requirements.txt" | "pyproject.toml" | "setup.py" | "Pipfile" => Some("python"),
        "pom.xml" | "build.gradle" | "build.gradle.kts" => Some("java"),
        "Cargo.toml" => Some("rust"),
        name if name.ends_with(".csproj") || name.ends_with(".fsproj") || name.ends_with(".sln") => {
            Some("dotnet")
        }
        _ => None,
    }
}

/// Scans `repo_path` and returns each detected language once, shallowest manifest first
pub fn detect_languages(repo_path: &Path, config: &ScanConfig) -> Result<Vec<LanguageDetection>> {
    if !repo_path.is_dir() {
        bail!("Repository path is not a directory: {}", repo_path.display());
    }

    let mut override_builder = OverrideBuilder::new(repo_path);
    for excluded in EXCLUDED_DIRS {
        override_builder.add(&format!("!{}/", excluded))?;
    }
    let overrides = override_builder.build()?;

    let mut detections: Vec<LanguageDetection> = Vec::new();
    let mut files_scanned = 0;

    for result in WalkBuilder::new(repo_path)
        .max_depth(Some(config.max_depth))
        .hidden(false)
        .git_ignore(true)
        .overrides(overrides)
        .build()
    {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "Failed to read directory entry");
                continue;
            }
        };
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }

        if files_scanned >= config.max_files {
            warn!(files_scanned, "Reached file limit, stopping scan");
            break;
        }
        files_scanned += 1;

        let Some(filename) = entry.file_name().to_str() else {
            continue;
        };
        let Some(language) = language_for_manifest(filename) else {
            continue;
        };

        let rel_path = entry
            .path()
            .strip_prefix(repo_path)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");
        let depth = rel_path.matches('/').count();
        debug!(path = %rel_path, language, "Detected manifest");

        match detections.iter_mut().find(|d| d.language == language) {
            Some(existing) if existing.depth > depth => {
                existing.depth = depth;
                existing.manifest_path = rel_path;
            }
            Some(_) => {}
            None => detections.push(LanguageDetection {
                language,
                manifest_path: rel_path,
                depth,
            }),
        }
    }

    detections.sort_by(|a, b| {
        a.depth
            .cmp(&b.depth)
            .then_with(|| a.manifest_path.cmp(&b.manifest_path))
    });
    info!(
        languages = detections.len(),
        files_scanned, "Language detection complete"
    );
    Ok(detections)
}
