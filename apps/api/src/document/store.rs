//! Document store: pluggable, trait-based persistence for document blobs.
//!
//! Default: `FsDocumentStore` (UTF-8 files under a root directory).
//! `AppState` holds an `Arc<dyn DocumentStore>`.
//!
//! Outcomes mirror a native file dialog round trip: a missing path on open is a
//! cancellation, a missing path on save picks a fresh file name, and I/O
//! failures come back inside the outcome rather than as an HTTP error.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;

const DOCUMENT_EXTENSION: &str = "json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenOutcome {
    pub canceled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OpenOutcome {
    fn canceled(error: Option<String>) -> Self {
        OpenOutcome {
            canceled: true,
            content: None,
            file_path: None,
            error,
        }
    }
}

/// Persists and loads document blobs. Implement this to swap backends without
/// touching the handlers.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes `content`. `None` means "save as": a new path is chosen.
    async fn save(&self, content: &str, path: Option<&str>) -> Result<SaveOutcome, AppError>;

    /// Reads the blob at `path`. `None` means the user dismissed the picker.
    async fn open(&self, path: Option<&str>) -> Result<OpenOutcome, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Filesystem implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsDocumentStore { root: root.into() }
    }

    /// Creates the root directory if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Resolves a client path under the root. Only plain relative paths are
    /// accepted; the `.json` extension is added when missing.
    fn resolve(&self, relative: &str) -> Result<(String, PathBuf), AppError> {
        let trimmed = relative.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("File path is empty".to_string()));
        }
        let mut rel = PathBuf::from(trimmed);
        if !rel.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(AppError::Validation(format!(
                "File path '{trimmed}' must stay inside the documents directory"
            )));
        }
        if rel.extension().is_none() {
            rel.set_extension(DOCUMENT_EXTENSION);
        }
        let display = rel.to_string_lossy().replace('\\', "/");
        Ok((display, self.root.join(rel)))
    }

    fn untitled() -> String {
        format!("untitled-{}.{DOCUMENT_EXTENSION}", Uuid::new_v4())
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn save(&self, content: &str, path: Option<&str>) -> Result<SaveOutcome, AppError> {
        let requested = path.map(str::to_string).unwrap_or_else(Self::untitled);
        let (rel_path, full) = self.resolve(&requested)?;

        match write_file(&full, content).await {
            Ok(()) => {
                info!(path = %rel_path, bytes = content.len(), "Saved document");
                Ok(SaveOutcome {
                    success: true,
                    file_path: Some(rel_path),
                    error: None,
                    saved_at: Some(Utc::now()),
                })
            }
            Err(e) => {
                error!("Failed to save file {}: {e}", full.display());
                Ok(SaveOutcome {
                    success: false,
                    file_path: None,
                    error: Some(e.to_string()),
                    saved_at: None,
                })
            }
        }
    }

    async fn open(&self, path: Option<&str>) -> Result<OpenOutcome, AppError> {
        let Some(path) = path else {
            return Ok(OpenOutcome::canceled(None));
        };
        let (rel_path, full) = self.resolve(path)?;

        match tokio::fs::read_to_string(&full).await {
            Ok(content) => {
                info!(path = %rel_path, bytes = content.len(), "Opened document");
                Ok(OpenOutcome {
                    canceled: false,
                    content: Some(content),
                    file_path: Some(rel_path),
                    error: None,
                })
            }
            Err(e) => {
                error!("Failed to open file {}: {e}", full.display());
                Ok(OpenOutcome::canceled(Some(e.to_string())))
            }
        }
    }
}

async fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content.as_bytes()).await
}
