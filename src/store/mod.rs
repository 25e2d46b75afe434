//! Staging area for uploaded, not-yet-indexed documents

use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use tracing::debug;
use tracing::info;

use crate::errors::DocChatError;
use crate::errors::Result;

/// File extensions accepted by the upload UI
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "txt", "doc", "docx", "csv"];

/// A file sitting in the staging directory
#[derive(Debug, Clone, Serialize)]
pub struct StagedDocument {
    pub name: String,
    pub size: u64,
    pub human_size: String,
    pub modified: DateTime<Utc>,
}

/// Manager for the staging directory
///
/// The directory is created on first use; all operations work on flat
/// file names within it.
#[derive(Debug, Clone)]
pub struct StagingStore {
    root: PathBuf,
}

impl StagingStore {
    /// Open the staging directory, creating it if absent (idempotent)
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.exists() {
            std::fs::create_dir_all(&root)?;
            info!("Created staging directory: {}", root.display());
        }
        Ok(Self { root })
    }

    /// Path of the staging directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List staged documents, sorted by name
    pub fn list(&self) -> Result<Vec<StagedDocument>> {
        let mut docs = Vec::new();

        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let size = metadata.len();
            let modified: DateTime<Utc> = metadata.modified()?.into();

            docs.push(StagedDocument {
                name,
                size,
                human_size: format_size(size),
                modified,
            });
        }

        docs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(docs)
    }

    /// Write an uploaded file into the staging directory
    ///
    /// Overwrites silently if the name already exists. Names containing
    /// path separators or `..` are rejected since they arrive from a
    /// network client.
    pub fn save(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let name = validated_name(name)?;
        let path = self.root.join(name);
        std::fs::write(&path, bytes)?;
        debug!("Saved {} ({} bytes) to staging", name, bytes.len());
        Ok(path)
    }

    /// Remove a named file from the staging directory
    ///
    /// # Errors
    /// Surfaces the underlying filesystem error to the caller; a failed
    /// delete in a batch does not roll back earlier ones.
    pub fn delete(&self, name: &str) -> Result<()> {
        let name = validated_name(name)?;
        let path = self.root.join(name);
        std::fs::remove_file(&path)?;
        info!("Deleted staged file: {name}");
        Ok(())
    }

    /// Whether the staging directory holds no files
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.list()?.is_empty())
    }

    /// Fingerprint of the current staging contents
    ///
    /// Hashes the sorted (name, size, mtime) listing; used to detect a
    /// persisted index that has gone stale relative to the staging area.
    pub fn fingerprint(&self) -> Result<String> {
        let mut hasher = Sha256::new();
        for doc in self.list()? {
            hasher.update(doc.name.as_bytes());
            hasher.update(doc.size.to_le_bytes());
            hasher.update(doc.modified.timestamp().to_le_bytes());
        }
        Ok(hex::encode(hasher.finalize()))
    }
}

fn validated_name(name: &str) -> Result<&str> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.starts_with('.')
    {
        return Err(DocChatError::InvalidFileName(name.to_string()));
    }
    Ok(name)
}

/// Extension of a file name, lowercased
pub fn file_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

/// Whether a file name carries an allow-listed extension
pub fn is_allowed_type(name: &str) -> bool {
    file_extension(name)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Human readable file size with binary units and two-decimal precision
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.2} GB")
}
