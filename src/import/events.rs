//! Channel-based progress reporting.
//!
//! Reactive consumers (hook adapters, status views) often prefer draining an
//! event stream over implementing the observer trait. [`ChannelReporter`]
//! bridges the two: it implements [`ImportObserver`] and forwards everything
//! into an unbounded channel.

use tokio::sync::mpsc;

use super::{ImportObserver, ImportedFile};
use crate::api::RemoteFile;
use crate::errors::ImportError;

/// Progress notifications emitted during an import batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportEvent {
    Progress {
        message: String,
        current: u64,
        total: u64,
    },
    FileImported {
        name: String,
        size: u64,
        index: usize,
        total: usize,
    },
    FileFailed {
        name: Option<String>,
        error: String,
    },
    Completed {
        imported: usize,
        message: String,
    },
}

/// Observer that forwards import events into an mpsc channel.
pub struct ChannelReporter {
    tx: mpsc::UnboundedSender<ImportEvent>,
}

impl ChannelReporter {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ImportEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, event: ImportEvent) {
        // A dropped receiver just means nobody is watching anymore.
        let _ = self.tx.send(event);
    }
}

impl ImportObserver for ChannelReporter {
    fn on_progress(&self, message: &str, current: u64, total: u64) {
        self.emit(ImportEvent::Progress {
            message: message.to_string(),
            current,
            total,
        });
    }

    fn on_file_imported(&self, file: &ImportedFile, index: usize, total: usize) {
        self.emit(ImportEvent::FileImported {
            name: file.name.clone(),
            size: file.size,
            index,
            total,
        });
    }

    fn on_error(&self, error: &ImportError, file: Option<&RemoteFile>) {
        self.emit(ImportEvent::FileFailed {
            name: file.map(|f| f.display_name().to_string()),
            error: error.to_string(),
        });
    }

    fn on_complete(&self, files: &[ImportedFile], message: &str) {
        self.emit(ImportEvent::Completed {
            imported: files.len(),
            message: message.to_string(),
        });
    }
}
