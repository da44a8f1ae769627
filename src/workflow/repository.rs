//! Generated file persistence
//!
//! The workflow needs to save a file, look one up, list what was saved and
//! record that a file was sent to the bank. The host decides where files live.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::{GeneratedFile, GeneratedFileSummary};

/// Errors that can occur while persisting generated files
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("File I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("A file named {0} already exists")]
    AlreadyExists(String),

    #[error("No file named {0}")]
    NotFound(String),

    #[error("Stored metadata at {path} is unreadable: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Repository lock poisoned")]
    Poisoned,
}

impl RepositoryError {
    /// I/O failures may succeed on retry, the rest will not
    pub fn is_retryable(&self) -> bool {
        matches!(self, RepositoryError::Io { .. })
    }
}

/// Storage for generated NACHA files.
pub trait FileRepository: Send + Sync {
    fn save(&self, file: &GeneratedFile) -> Result<(), RepositoryError>;

    fn get(&self, filename: &str) -> Result<GeneratedFile, RepositoryError>;

    fn list(&self) -> Result<Vec<GeneratedFileSummary>, RepositoryError>;

    /// Record that the file was handed to the bank. Marking twice is a no-op.
    fn mark_transmitted(&self, filename: &str) -> Result<GeneratedFileSummary, RepositoryError>;
}

/// Keeps files in memory, newest last.
#[derive(Debug, Default)]
pub struct InMemoryFileRepository {
    files: Mutex<Vec<GeneratedFile>>,
}

impl InMemoryFileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileRepository for InMemoryFileRepository {
    fn save(&self, file: &GeneratedFile) -> Result<(), RepositoryError> {
        let mut files = self.files.lock().map_err(|_| RepositoryError::Poisoned)?;
        if files.iter().any(|f| f.filename == file.filename) {
            return Err(RepositoryError::AlreadyExists(file.filename.clone()));
        }
        files.push(file.clone());
        Ok(())
    }

    fn get(&self, filename: &str) -> Result<GeneratedFile, RepositoryError> {
        let files = self.files.lock().map_err(|_| RepositoryError::Poisoned)?;
        files
            .iter()
            .find(|f| f.filename == filename)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(filename.to_string()))
    }

    fn list(&self) -> Result<Vec<GeneratedFileSummary>, RepositoryError> {
        let files = self.files.lock().map_err(|_| RepositoryError::Poisoned)?;
        Ok(files.iter().map(GeneratedFile::summary).collect())
    }

    fn mark_transmitted(&self, filename: &str) -> Result<GeneratedFileSummary, RepositoryError> {
        let mut files = self.files.lock().map_err(|_| RepositoryError::Poisoned)?;
        let file = files
            .iter_mut()
            .find(|f| f.filename == filename)
            .ok_or_else(|| RepositoryError::NotFound(filename.to_string()))?;
        file.transmitted = true;
        Ok(file.summary())
    }
}

/// Metadata kept next to each file on disk.
#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    #[serde(flatten)]
    summary: GeneratedFileSummary,
    content_sha256: String,
    file_id_modifier: u8,
}

/// Writes each file's content to `{directory}/{filename}` and its metadata to
/// `{directory}/{filename}.json`.
#[derive(Debug, Clone)]
pub struct DirectoryFileRepository {
    directory: PathBuf,
}

impl DirectoryFileRepository {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn io_error(path: &Path, source: std::io::Error) -> RepositoryError {
        RepositoryError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn manifest_path(&self, filename: &str) -> PathBuf {
        self.directory.join(format!("{filename}.json"))
    }

    /// Write-then-rename so a crash never leaves a half-written file.
    fn write_atomic(path: &Path, content: &str) -> Result<(), RepositoryError> {
        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);
        fs::write(&temp_path, content).map_err(|e| Self::io_error(&temp_path, e))?;
        fs::rename(&temp_path, path).map_err(|e| Self::io_error(path, e))
    }

    fn read_manifest(&self, filename: &str) -> Result<Manifest, RepositoryError> {
        let path = self.manifest_path(filename);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RepositoryError::NotFound(filename.to_string()))
            }
            Err(e) => return Err(Self::io_error(&path, e)),
        };
        serde_json::from_str(&raw).map_err(|e| RepositoryError::Corrupt {
            path,
            reason: e.to_string(),
        })
    }

    fn write_manifest(&self, manifest: &Manifest) -> Result<(), RepositoryError> {
        let path = self.manifest_path(&manifest.summary.filename);
        let json = serde_json::to_string_pretty(manifest).map_err(|e| RepositoryError::Corrupt {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Self::write_atomic(&path, &json)
    }
}

impl FileRepository for DirectoryFileRepository {
    fn save(&self, file: &GeneratedFile) -> Result<(), RepositoryError> {
        fs::create_dir_all(&self.directory).map_err(|e| Self::io_error(&self.directory, e))?;

        let path = self.directory.join(&file.filename);
        if path.exists() {
            return Err(RepositoryError::AlreadyExists(file.filename.clone()));
        }

        // content first: a manifest only ever points at a complete file
        Self::write_atomic(&path, &file.content)?;
        self.write_manifest(&Manifest {
            summary: file.summary(),
            content_sha256: file.content_sha256.clone(),
            file_id_modifier: file.file_id_modifier,
        })?;

        tracing::info!(path = %path.display(), "Saved NACHA file");
        Ok(())
    }

    fn get(&self, filename: &str) -> Result<GeneratedFile, RepositoryError> {
        let manifest = self.read_manifest(filename)?;
        let path = self.directory.join(filename);
        let content = fs::read_to_string(&path).map_err(|e| Self::io_error(&path, e))?;
        let summary = manifest.summary;

        Ok(GeneratedFile {
            id: summary.id,
            filename: summary.filename,
            content,
            entry_count: summary.entry_count,
            total_amount: summary.total_amount,
            effective_date: summary.effective_date,
            direction: summary.direction,
            file_id_modifier: manifest.file_id_modifier,
            created_at: summary.created_at,
            content_sha256: manifest.content_sha256,
            transmitted: summary.transmitted,
        })
    }

    /// Files without a manifest are not listed.
    fn list(&self) -> Result<Vec<GeneratedFileSummary>, RepositoryError> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Self::io_error(&self.directory, e)),
        };

        let mut summaries = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Self::io_error(&self.directory, e))?;
            let name = entry.file_name();
            let Some(filename) = name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                continue;
            };
            if !filename.starts_with("ACH_") {
                continue;
            }
            summaries.push(self.read_manifest(filename)?.summary);
        }
        summaries.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(summaries)
    }

    fn mark_transmitted(&self, filename: &str) -> Result<GeneratedFileSummary, RepositoryError> {
        let mut manifest = self.read_manifest(filename)?;
        if !manifest.summary.transmitted {
            manifest.summary.transmitted = true;
            self.write_manifest(&manifest)?;
            tracing::info!(filename, "Marked NACHA file as transmitted");
        }
        Ok(manifest.summary)
    }
}
