//! Core types shared by the backup pipeline

use crate::config::Product;
use std::path::PathBuf;

/// What to ask the server to back up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackupRequest {
    /// Target product
    pub product: Product,
    /// Include attachments in the archive
    pub include_attachments: bool,
    /// Produce an archive that can be restored in the cloud
    pub export_to_cloud: bool,
}

impl BackupRequest {
    /// JSON body for the start-backup call.
    ///
    /// The remote API expects both flags as the strings `"true"`/`"false"`,
    /// not JSON booleans, in exactly this layout.
    pub fn body(&self) -> String {
        format!(
            r#"{{"cbAttachments": "{}", "exportToCloud": "{}" }}"#,
            flag(self.include_attachments),
            flag(self.export_to_cloud)
        )
    }
}

fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// One polled read of the remote backup status
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Status label reported by the server
    pub status: String,
    /// Human-readable progress, e.g. "45%"
    pub progress: String,
    /// Server-side file identifier, present once the archive is ready
    pub file_id: Option<String>,
    /// Another backup is already running on the server
    pub concurrent_backup: bool,
}

impl ProgressSnapshot {
    /// Whether this snapshot ends the poll loop
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.file_id.is_some()
    }
}

/// Outcome of a finished download
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadResult {
    /// Where the archive was written
    pub path: PathBuf,
    /// Number of bytes written
    pub bytes_written: u64,
}
