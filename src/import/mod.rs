//! Dashboard file importer.
//!
//! Fetches previously uploaded files from the vault API and accumulates them
//! in memory with metadata and a content checksum. One batch walks the file
//! list strictly sequentially: file *i+1* is never requested before file *i*
//! settles, so progress callbacks observe monotonic indices.
//!
//! Failure handling per file: transient-looking errors are retried with a
//! linear backoff, other errors skip the file, and errors whose text marks
//! them as authentication or network failures abort the whole batch.

use std::cell::RefCell;
use std::collections::BTreeMap;

use bytes::Bytes;
use futures_util::StreamExt;
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};

use crate::api::{FileScope, RemoteFile, VaultSource};
use crate::errors::ImportError;
use crate::utils::files::{file_extension, is_genomic_file, mime_type};
use crate::utils::time::now_millis;

pub mod cancel;
pub mod events;

pub use cancel::CancelHandle;
pub use events::{ChannelReporter, ImportEvent};

/// Error-text fragments that mark a failure as worth retrying.
const RETRYABLE_KEYWORDS: [&str; 7] = [
    "network",
    "timeout",
    "connection",
    "temporary",
    "502",
    "503",
    "504",
];

fn is_retryable(error: &ImportError) -> bool {
    let message = error.to_string().to_lowercase();
    RETRYABLE_KEYWORDS
        .iter()
        .any(|keyword| message.contains(keyword))
}

/// Authentication and network failures invalidate the whole batch, not just
/// the current file.
fn is_critical(error: &ImportError) -> bool {
    let message = error.to_string().to_lowercase();
    message.contains("authentication") || message.contains("network")
}

/// Linear backoff before retry attempt `attempt + 1`, not jittered.
async fn backoff_delay(attempt: u32) {
    let millis = u64::from(attempt) * 1000;
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::TimeoutFuture::new(millis as u32).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(std::time::Duration::from_millis(millis)).await;
}

fn sha256_hex(payload: &[u8]) -> String {
    let digest = Sha256::digest(payload);
    digest.iter().fold(String::with_capacity(64), |mut out, b| {
        use std::fmt::Write;
        let _ = write!(out, "{:02x}", b);
        out
    })
}

/// A file downloaded into memory for the current session.
#[derive(Debug, Clone)]
pub struct ImportedFile {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub bytes: Bytes,
    pub owner: Option<String>,
    pub biosample_serial: Option<String>,
    pub source: FileScope,
    pub remote_path: String,
    /// Milliseconds since the UNIX epoch.
    pub imported_at: u64,
    /// SHA-256 over the assembled payload, hex encoded.
    pub checksum: Option<String>,
    pub extension: String,
    pub is_genomic: bool,
}

/// Tunables for one importer instance.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Attempts per file before the error is surfaced.
    pub max_retries: u32,
    /// Byte-progress reporting granularity.
    pub progress_interval_bytes: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            progress_interval_bytes: 1024 * 1024,
        }
    }
}

/// Lifecycle of an import batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportState {
    Idle,
    Listing,
    Downloading { index: usize, total: usize },
    Complete,
    Cancelled,
    Failed,
}

impl ImportState {
    pub fn is_active(&self) -> bool {
        matches!(self, ImportState::Listing | ImportState::Downloading { .. })
    }
}

/// Caller-supplied progress sink. All methods default to no-ops.
///
/// Ordering guarantees: progress for a file arrives before its completion,
/// and each file produces exactly one completion or error callback.
pub trait ImportObserver {
    fn on_progress(&self, _message: &str, _current: u64, _total: u64) {}
    fn on_file_imported(&self, _file: &ImportedFile, _index: usize, _total: usize) {}
    fn on_error(&self, _error: &ImportError, _file: Option<&RemoteFile>) {}
    fn on_complete(&self, _files: &[ImportedFile], _message: &str) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl ImportObserver for NoopObserver {}

/// Aggregate numbers over the accumulated imports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub total_files: usize,
    pub total_bytes: u64,
    pub genomic_files: usize,
    pub by_extension: BTreeMap<String, usize>,
    pub by_source: BTreeMap<String, usize>,
}

/// Imports dashboard files through a [`VaultSource`].
///
/// Each instance owns its file list and abort flag; instances share nothing.
/// Only one batch may be active per instance, and starting a second one
/// fails immediately instead of queueing.
pub struct FileImporter<S> {
    source: S,
    config: ImportConfig,
    state: RefCell<ImportState>,
    cancel: RefCell<Option<CancelHandle>>,
    imported: RefCell<Vec<ImportedFile>>,
}

impl<S: VaultSource> FileImporter<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, ImportConfig::default())
    }

    pub fn with_config(source: S, config: ImportConfig) -> Self {
        Self {
            source,
            config,
            state: RefCell::new(ImportState::Idle),
            cancel: RefCell::new(None),
            imported: RefCell::new(Vec::new()),
        }
    }

    pub fn state(&self) -> ImportState {
        self.state.borrow().clone()
    }

    pub fn is_importing(&self) -> bool {
        self.cancel.borrow().is_some()
    }

    /// Request cancellation of the active batch. Takes effect at the next
    /// request dispatch or chunk read.
    pub fn cancel(&self) {
        if let Some(handle) = self.cancel.borrow().as_ref() {
            handle.cancel();
        }
    }

    /// Copy of the files accumulated across finished batches.
    pub fn imported_files(&self) -> Vec<ImportedFile> {
        self.imported.borrow().clone()
    }

    pub fn clear_imported(&self) {
        self.imported.borrow_mut().clear();
    }

    /// Drop one accumulated file by display name.
    pub fn remove_imported(&self, name: &str) -> bool {
        let mut files = self.imported.borrow_mut();
        let before = files.len();
        files.retain(|f| f.name != name);
        files.len() != before
    }

    pub fn stats(&self) -> ImportStats {
        let files = self.imported.borrow();
        let mut stats = ImportStats {
            total_files: files.len(),
            ..ImportStats::default()
        };
        for file in files.iter() {
            stats.total_bytes += file.size;
            if file.is_genomic {
                stats.genomic_files += 1;
            }
            let ext = if file.extension.is_empty() {
                "unknown".to_string()
            } else {
                file.extension.clone()
            };
            *stats.by_extension.entry(ext).or_default() += 1;
            *stats
                .by_source
                .entry(file.source.as_str().to_string())
                .or_default() += 1;
        }
        stats
    }

    /// Import every file visible in `scope`.
    ///
    /// `token` is the bearer credential of the logged-in user. Progress and
    /// per-file outcomes are reported through `observer`; the returned list
    /// only covers this batch.
    pub async fn import(
        &self,
        token: &str,
        scope: FileScope,
        observer: &dyn ImportObserver,
    ) -> Result<Vec<ImportedFile>, ImportError> {
        if token.is_empty() {
            return Err(ImportError::TokenRequired);
        }
        if self.is_importing() {
            return Err(ImportError::BatchInFlight);
        }

        let cancel = CancelHandle::new();
        *self.cancel.borrow_mut() = Some(cancel.clone());
        *self.state.borrow_mut() = ImportState::Listing;

        let result = self.run_batch(token, scope, observer, &cancel).await;

        *self.cancel.borrow_mut() = None;
        if let Err(err) = &result {
            *self.state.borrow_mut() = if matches!(err, ImportError::Cancelled) {
                ImportState::Cancelled
            } else {
                ImportState::Failed
            };
            observer.on_error(err, None);
        }

        result
    }

    async fn run_batch(
        &self,
        token: &str,
        scope: FileScope,
        observer: &dyn ImportObserver,
        cancel: &CancelHandle,
    ) -> Result<Vec<ImportedFile>, ImportError> {
        let dashboard = match scope {
            FileScope::Personal => "user dashboard",
            FileScope::Shared => "lab dashboard",
        };
        observer.on_progress(&format!("Connecting to {}...", dashboard), 0, 0);

        let files = self.source.list(token, scope).await?;
        let total = files.len();
        info!("Found {} files in {}", total, dashboard);

        if total == 0 {
            *self.state.borrow_mut() = ImportState::Complete;
            observer.on_complete(&[], &format!("No files found in {}", dashboard));
            return Ok(Vec::new());
        }

        observer.on_progress(&format!("Found {} files", total), 0, total as u64);

        let mut imported = Vec::new();
        for (index, file) in files.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(ImportError::Cancelled);
            }

            let position = index + 1;
            *self.state.borrow_mut() = ImportState::Downloading {
                index: position,
                total,
            };
            observer.on_progress(
                &format!("Importing {}...", file.display_name()),
                position as u64,
                total as u64,
            );

            match self
                .download_with_retry(file, token, scope, observer, cancel)
                .await
            {
                Ok(imported_file) => {
                    observer.on_file_imported(&imported_file, position, total);
                    self.imported.borrow_mut().push(imported_file.clone());
                    imported.push(imported_file);
                }
                Err(ImportError::Cancelled) => return Err(ImportError::Cancelled),
                Err(err) => {
                    error!("Failed to import {}: {}", file.display_name(), err);
                    observer.on_error(&err, Some(file));
                    if is_critical(&err) {
                        return Err(err);
                    }
                }
            }
        }

        *self.state.borrow_mut() = ImportState::Complete;
        let message = format!("Successfully imported {}/{} files", imported.len(), total);
        observer.on_complete(&imported, &message);
        Ok(imported)
    }

    async fn download_with_retry(
        &self,
        file: &RemoteFile,
        token: &str,
        scope: FileScope,
        observer: &dyn ImportObserver,
        cancel: &CancelHandle,
    ) -> Result<ImportedFile, ImportError> {
        let mut attempt = 1;
        loop {
            match self
                .download_file(file, token, scope, observer, cancel)
                .await
            {
                Ok(imported) => return Ok(imported),
                Err(ImportError::Cancelled) => return Err(ImportError::Cancelled),
                Err(err) => {
                    if attempt < self.config.max_retries && is_retryable(&err) {
                        warn!(
                            "Attempt {} failed for {}, retrying: {}",
                            attempt,
                            file.display_name(),
                            err
                        );
                        backoff_delay(attempt).await;
                        attempt += 1;
                    } else {
                        return Err(err);
                    }
                }
            }
        }
    }

    async fn download_file(
        &self,
        file: &RemoteFile,
        token: &str,
        scope: FileScope,
        observer: &dyn ImportObserver,
        cancel: &CancelHandle,
    ) -> Result<ImportedFile, ImportError> {
        if cancel.is_cancelled() {
            return Err(ImportError::Cancelled);
        }

        let stream = self.source.fetch(file, token, scope).await?;
        let declared_size = stream.declared_size;
        let mut body = stream.bytes;

        let interval = self.config.progress_interval_bytes.max(1);
        let mut chunks: Vec<Bytes> = Vec::new();
        let mut received: u64 = 0;
        let mut last_reported: u64 = 0;

        while let Some(chunk) = body.next().await {
            if cancel.is_cancelled() {
                return Err(ImportError::Cancelled);
            }
            let chunk = chunk?;
            received += chunk.len() as u64;
            chunks.push(chunk);

            if let Some(total) = declared_size {
                if received / interval > last_reported / interval {
                    last_reported = received;
                    let percent = (received as f64 / total as f64 * 100.0).round();
                    observer.on_progress(
                        &format!("Downloading {}: {}%", file.display_name(), percent),
                        received,
                        total,
                    );
                }
            }
        }

        if let Some(total) = declared_size {
            if total != received {
                // Import the file anyway; the caller sees it as unverified.
                warn!(
                    "Size mismatch for {}: expected {} bytes, received {}",
                    file.display_name(),
                    total,
                    received
                );
            }
        }

        let mut payload = Vec::with_capacity(received as usize);
        for chunk in &chunks {
            payload.extend_from_slice(chunk);
        }
        let payload = Bytes::from(payload);

        let name = file.display_name().to_string();
        let extension = file_extension(&name);
        Ok(ImportedFile {
            mime_type: mime_type(&name).to_string(),
            is_genomic: is_genomic_file(&name),
            checksum: Some(sha256_hex(&payload)),
            size: received,
            bytes: payload,
            owner: file.owner.clone(),
            biosample_serial: file.biosample_serial.clone(),
            source: scope,
            remote_path: file.path.clone(),
            imported_at: now_millis(),
            extension,
            name,
        })
    }
}
