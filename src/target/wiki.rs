//! Confluence backup endpoints

use super::{BackupTarget, get_progress_resource};
use crate::error::Result;
use crate::session::Session;
use crate::types::ProgressSnapshot;
use async_trait::async_trait;
use serde::Deserialize;

const TRIGGER_PATH: &str = "/wiki/rest/obm/1.0/runbackup.json";
const PROGRESS_PATH: &str = "/wiki/rest/obm/1.0/getprogress.json";
const DOWNLOAD_PATH: &str = "/wiki/download";

/// Confluence (wiki-type) backup target
#[derive(Clone, Copy, Debug, Default)]
pub struct WikiTarget;

/// Progress document returned by `getprogress.json`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WikiProgress {
    #[serde(default)]
    file_name: Option<String>,
    #[serde(default)]
    current_status: Option<String>,
    #[serde(default)]
    alternative_percentage: Option<String>,
    #[serde(default)]
    concurrent_backup_in_progress: Option<bool>,
}

impl WikiTarget {
    /// Decode a progress response.
    ///
    /// The archive is ready once `fileName` is non-empty; its value is the
    /// file identifier verbatim.
    pub fn decode_progress(body: &[u8]) -> Result<ProgressSnapshot> {
        let progress: WikiProgress = serde_json::from_slice(body)?;

        Ok(ProgressSnapshot {
            status: progress.current_status.unwrap_or_default(),
            progress: progress.alternative_percentage.unwrap_or_default(),
            file_id: progress.file_name.filter(|name| !name.is_empty()),
            concurrent_backup: progress.concurrent_backup_in_progress.unwrap_or(false),
        })
    }
}

#[async_trait]
impl BackupTarget for WikiTarget {
    fn name(&self) -> &'static str {
        "confluence"
    }

    fn trigger_path(&self) -> &'static str {
        TRIGGER_PATH
    }

    fn download_path(&self, file_id: &str) -> String {
        format!("{DOWNLOAD_PATH}/{file_id}")
    }

    async fn fetch_progress(&self, session: &Session) -> Result<ProgressSnapshot> {
        let response =
            get_progress_resource(session, PROGRESS_PATH, "retrieve backup progress").await?;
        let body = response.bytes().await?;
        Self::decode_progress(&body)
    }
}
