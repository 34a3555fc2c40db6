//! Asset listing: the source of raw filenames fed to the extractor.

use crate::error::PipelineError;
use std::path::Path;
use walkdir::WalkDir;

pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "svg"];

/// Lists asset filenames in a directory.
pub trait AssetLister: Send + Sync {
    fn list(&self, directory: &Path) -> Result<Vec<String>, PipelineError>;
}

/// Lists image files directly inside a directory (no recursion).
#[derive(Debug, Clone)]
pub struct DirAssetLister {
    extensions: Vec<String>,
}

impl Default for DirAssetLister {
    fn default() -> Self {
        Self::new(
            DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        )
    }
}

impl DirAssetLister {
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    fn is_allowed(&self, file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .map(|(_, ext)| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

impl AssetLister for DirAssetLister {
    /// Returns allow-listed filenames sorted for determinism.
    fn list(&self, directory: &Path) -> Result<Vec<String>, PipelineError> {
        if !directory.is_dir() {
            return Err(PipelineError::Config(format!(
                "Asset directory does not exist: {}",
                directory.display()
            )));
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                PipelineError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to list assets: {}", e),
                ))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().to_string();
            if self.is_allowed(&file_name) {
                names.push(file_name);
            }
        }

        names.sort();
        Ok(names)
    }
}
